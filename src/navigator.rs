//! Navigation state machine.
//!
//! Owns the document session and the current page; every page mutation in
//! the crate funnels through the transitions here, which makes the state
//! single-writer even when buttons, voice and uploads race in wall-clock
//! time. Targets outside the document are clamped, never an error.

use crate::chapters::ChapterTable;
use crate::error::{Result, TourneurError};
use crate::intent::NavigationIntent;
use tracing::debug;

/// The currently loaded document: identifier, display name, page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSession {
    pub doc_id: String,
    pub filename: String,
    /// Always at least 1; enforced by [`Navigator::load_document`].
    pub total_pages: u32,
}

/// Outcome of a navigation transition.
///
/// None of these are errors: clamped-at-boundary and no-document cases are
/// ordinary results the caller may log or ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The current page changed.
    Moved { from: u32, to: u32 },
    /// Already at the target, or clamped back onto the current page.
    Unchanged,
    /// Navigation attempted with no document loaded; a no-op, not a
    /// user-facing error.
    NoDocument,
    /// Command could not be acted on (unknown chapter, unrecognized
    /// transcript). Logged and dropped.
    Ignored,
}

/// State machine over `{NoDocument, DocumentLoaded(currentPage, totalPages)}`.
///
/// Initial state is `NoDocument`; the only way in to `DocumentLoaded` is
/// [`Navigator::load_document`], and sessions can be replaced indefinitely.
#[derive(Debug, Default)]
pub struct Navigator {
    session: Option<DocumentSession>,
    current_page: u32,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new document session, replacing any prior one.
    ///
    /// Requires `total_pages >= 1`. Resets the current page to 0. The
    /// caller is responsible for invalidating any in-flight page fetch for
    /// the replaced session (the loader's generation token handles this).
    pub fn load_document(
        &mut self,
        doc_id: impl Into<String>,
        filename: impl Into<String>,
        total_pages: u32,
    ) -> Result<()> {
        if total_pages < 1 {
            return Err(TourneurError::InvalidPageCount { pages: total_pages });
        }
        self.session = Some(DocumentSession {
            doc_id: doc_id.into(),
            filename: filename.into(),
            total_pages,
        });
        self.current_page = 0;
        Ok(())
    }

    /// Drop the session and return to `NoDocument`.
    pub fn reset(&mut self) {
        self.session = None;
        self.current_page = 0;
    }

    /// Move to `target`, clamped into `[0, total_pages - 1]`.
    ///
    /// `target` is signed because spoken "page 0" converts to -1; clamping
    /// maps it to the first page rather than failing.
    pub fn go_to(&mut self, target: i64) -> Transition {
        let Some(session) = &self.session else {
            debug!("navigation ignored: no document loaded");
            return Transition::NoDocument;
        };
        let last = i64::from(session.total_pages - 1);
        // total_pages >= 1 so the range is never empty
        let clamped = target.clamp(0, last) as u32;
        if clamped == self.current_page {
            return Transition::Unchanged;
        }
        let from = self.current_page;
        self.current_page = clamped;
        Transition::Moved { from, to: clamped }
    }

    /// Advance one page; clamps at the last page, never wraps.
    pub fn next(&mut self) -> Transition {
        self.go_to(i64::from(self.current_page) + 1)
    }

    /// Go back one page; clamps at the first page, never wraps.
    pub fn previous(&mut self) -> Transition {
        self.go_to(i64::from(self.current_page) - 1)
    }

    /// Jump to the first page.
    pub fn first(&mut self) -> Transition {
        self.go_to(0)
    }

    /// Jump to the last page.
    pub fn last(&mut self) -> Transition {
        self.go_to(i64::MAX)
    }

    /// Jump to the page a chapter starts on, via the injected table.
    ///
    /// An unknown chapter behaves like an unrecognized command: logged,
    /// no state change.
    pub fn go_to_chapter(&mut self, chapter: u32, table: &dyn ChapterTable) -> Transition {
        match table.page_for_chapter(chapter) {
            Some(page) => self.go_to(i64::from(page)),
            None => {
                debug!(chapter, "chapter not in table, ignoring");
                Transition::Ignored
            }
        }
    }

    /// Apply a [`NavigationIntent`] produced by the command interpreter.
    ///
    /// Buttons and voice both land here, so the two input modalities share
    /// one authoritative transition path.
    pub fn apply(&mut self, intent: NavigationIntent, table: &dyn ChapterTable) -> Transition {
        match intent {
            NavigationIntent::NextPage => self.next(),
            NavigationIntent::PreviousPage => self.previous(),
            NavigationIntent::GoToPage(target) => self.go_to(target),
            NavigationIntent::GoToChapter(chapter) => self.go_to_chapter(chapter, table),
            NavigationIntent::GoToFirst => self.first(),
            NavigationIntent::GoToLast => self.last(),
            NavigationIntent::Unrecognized => {
                debug!("unrecognized command ignored");
                Transition::Ignored
            }
        }
    }

    /// Current page, if a document is loaded.
    pub fn current_page(&self) -> Option<u32> {
        self.session.as_ref().map(|_| self.current_page)
    }

    pub fn session(&self) -> Option<&DocumentSession> {
        self.session.as_ref()
    }

    pub fn has_document(&self) -> bool {
        self.session.is_some()
    }
}
