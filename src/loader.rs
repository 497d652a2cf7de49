//! Page content loader with last-wins fetch ordering.
//!
//! The loader reacts to `(doc_id, page)` pairs chosen by the navigator and
//! tracks exactly one in-flight fetch at a time, guarded by a generation
//! token: [`PageLoader::request`] hands out a ticket stamped with the current
//! generation, and [`PageLoader::apply`] drops any result whose ticket is
//! stale. That guarantee — the renderer never flashes content for a page the
//! user already navigated away from — is a correctness invariant, not an
//! optimization. Cancelling the underlying HTTP request is best-effort at
//! most and never relied on.
//!
//! Image payloads live in [`ImageHandle`]s, scoped resources released
//! deterministically on supersession and teardown rather than left to
//! collection timing.

use crate::error::TourneurError;
use crate::store::PageContent;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::debug;

/// Owned image payload for one fetched page.
///
/// Dropping the handle is the release; [`ImageHandle::probe`] hands out a
/// witness so tests (or a renderer keeping weak references) can observe that
/// release actually happened.
#[derive(Debug)]
pub struct ImageHandle {
    data: Vec<u8>,
    released: Arc<AtomicBool>,
}

impl ImageHandle {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Witness for this handle's release.
    pub fn probe(&self) -> ReleaseProbe {
        ReleaseProbe(Arc::clone(&self.released))
    }
}

impl Drop for ImageHandle {
    fn drop(&mut self) {
        self.released.store(true, Ordering::Release);
    }
}

/// Observes whether the [`ImageHandle`] it was taken from has been released.
#[derive(Debug, Clone)]
pub struct ReleaseProbe(Arc<AtomicBool>);

impl ReleaseProbe {
    pub fn is_released(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Loader status for the currently selected page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// Cached content of the most recently loaded page. Ephemeral; superseded
/// whenever the selected page changes.
#[derive(Debug)]
pub struct PageEntry {
    pub page: u32,
    pub image: ImageHandle,
    pub text: Option<String>,
    pub fetched_at: Instant,
}

/// Ticket for one fetch, stamped with the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub doc_id: String,
    pub page: u32,
}

/// Tracks fetch state for the currently selected `(doc_id, page)` pair.
#[derive(Debug, Default)]
pub struct PageLoader {
    generation: u64,
    target: Option<(String, u32)>,
    status: FetchStatus,
    entry: Option<PageEntry>,
}

impl PageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a `(doc_id, page)` pair, returning the fetch ticket to run.
    ///
    /// Returns `None` when that exact pair is already loading or loaded —
    /// each distinct pair gets exactly one fetch. A pair whose fetch failed
    /// may be requested again (re-issuing the transition is the retry).
    pub fn request(&mut self, doc_id: &str, page: u32) -> Option<FetchRequest> {
        if self.target.as_ref().is_some_and(|(d, p)| d == doc_id && *p == page)
            && !matches!(self.status, FetchStatus::Error(_))
        {
            return None;
        }
        self.generation += 1;
        self.target = Some((doc_id.to_string(), page));
        self.status = FetchStatus::Loading;
        Some(FetchRequest {
            generation: self.generation,
            doc_id: doc_id.to_string(),
            page,
        })
    }

    /// Apply a resolved fetch.
    ///
    /// Returns `false` when the ticket is stale (the selection moved on
    /// while the fetch was in flight); stale results are discarded without
    /// touching any state, however late they arrive. On success the previous
    /// image handle is released before the new entry is retained.
    pub fn apply(
        &mut self,
        request: &FetchRequest,
        outcome: Result<PageContent, TourneurError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!(
                page = request.page,
                stale = request.generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            return false;
        }
        match outcome {
            Ok(content) => {
                // Release the superseded handle before retaining the new one.
                self.entry = None;
                self.entry = Some(PageEntry {
                    page: request.page,
                    image: ImageHandle::new(content.image),
                    text: content.text,
                    fetched_at: Instant::now(),
                });
                self.status = FetchStatus::Loaded;
            }
            Err(err) => {
                // Nothing to display for the selected page; clear the stale
                // image rather than showing the previous page under an
                // error banner.
                self.entry = None;
                self.status = FetchStatus::Error(err.to_string());
            }
        }
        true
    }

    /// Invalidate everything: pending tickets go stale and the cached entry
    /// is released. Used on new uploads and on teardown.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.target = None;
        self.entry = None;
        self.status = FetchStatus::Idle;
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Last fetch error message, if the current status is an error.
    pub fn last_error(&self) -> Option<&str> {
        match &self.status {
            FetchStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Content of the most recently loaded page, if any.
    pub fn entry(&self) -> Option<&PageEntry> {
        self.entry.as_ref()
    }
}
