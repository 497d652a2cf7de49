//! Composition root: upload flow, navigation, and fetch driving.
//!
//! `PageTurner` owns the navigator, the page loader and the store handle,
//! and is the single writer of navigation state. Button handlers call the
//! transition methods directly; the voice session forwards intents over a
//! channel drained by [`PageTurner::drain_intents`]. Both paths converge on
//! the same navigator transitions, then a refresh step drives the loader
//! for whatever page is now current.
//!
//! Page-fetch failures do not bubble out of transitions: they surface as
//! the loader's `Error` status with a human-readable message, leaving the
//! session itself intact (the caller retries by re-issuing the transition).

use crate::chapters::{ChapterTable, NoChapters};
use crate::error::Result;
use crate::intent::NavigationIntent;
use crate::loader::{FetchStatus, PageEntry, PageLoader};
use crate::navigator::{DocumentSession, Navigator, Transition};
use crate::store::DocumentStore;
use crossbeam_channel::Receiver;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct PageTurner {
    store: Arc<dyn DocumentStore>,
    navigator: Navigator,
    loader: PageLoader,
    chapters: Box<dyn ChapterTable>,
}

impl PageTurner {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            navigator: Navigator::new(),
            loader: PageLoader::new(),
            chapters: Box::new(NoChapters),
        }
    }

    /// Supply the chapter table used by chapter commands.
    pub fn with_chapters(mut self, chapters: Box<dyn ChapterTable>) -> Self {
        self.chapters = chapters;
        self
    }

    /// One-shot upload flow: send the file to the store, then initialize
    /// navigation on the returned document and fetch its first page.
    ///
    /// On upload failure the error is returned and nothing is mutated: a
    /// document already being viewed stays viewable. A missing page count
    /// in the receipt defaults to a single page.
    pub async fn upload(&mut self, filename: &str, payload: Vec<u8>) -> Result<()> {
        let receipt = self.store.upload(filename, payload).await?;
        let pages = receipt.page_count_or_default();
        debug!(doc_id = %receipt.doc_id, pages, "document uploaded");

        // load_document validates before mutating, so a nonsensical receipt
        // (pages = 0) leaves both the old session and its content intact.
        self.navigator
            .load_document(receipt.doc_id, receipt.filename, pages)?;
        // Pending fetches for the previous document go stale here.
        self.loader.invalidate();
        self.refresh().await;
        Ok(())
    }

    pub async fn next(&mut self) -> Transition {
        let transition = self.navigator.next();
        self.refresh().await;
        transition
    }

    pub async fn previous(&mut self) -> Transition {
        let transition = self.navigator.previous();
        self.refresh().await;
        transition
    }

    pub async fn go_to(&mut self, page: i64) -> Transition {
        let transition = self.navigator.go_to(page);
        self.refresh().await;
        transition
    }

    pub async fn first(&mut self) -> Transition {
        let transition = self.navigator.first();
        self.refresh().await;
        transition
    }

    pub async fn last(&mut self) -> Transition {
        let transition = self.navigator.last();
        self.refresh().await;
        transition
    }

    pub async fn go_to_chapter(&mut self, chapter: u32) -> Transition {
        let transition = self.navigator.go_to_chapter(chapter, self.chapters.as_ref());
        self.refresh().await;
        transition
    }

    /// Apply one interpreted intent (the voice path's entry point).
    pub async fn apply(&mut self, intent: NavigationIntent) -> Transition {
        let transition = self.navigator.apply(intent, self.chapters.as_ref());
        self.refresh().await;
        transition
    }

    /// Drain and apply all queued intents from a voice session channel.
    ///
    /// Returns how many intents were applied.
    pub async fn drain_intents(&mut self, intents: &Receiver<NavigationIntent>) -> usize {
        let mut applied = 0;
        while let Ok(intent) = intents.try_recv() {
            self.apply(intent).await;
            applied += 1;
        }
        applied
    }

    /// Fetch content for the current `(doc_id, page)` pair if it is not
    /// already loading or loaded.
    ///
    /// Fetch failures land in the loader's status; the stale-ticket check
    /// in the loader keeps any late result from overwriting newer content.
    async fn refresh(&mut self) {
        let Some(session) = self.navigator.session() else {
            return;
        };
        let doc_id = session.doc_id.clone();
        let Some(page) = self.navigator.current_page() else {
            return;
        };
        let Some(request) = self.loader.request(&doc_id, page) else {
            return;
        };
        let outcome = self.store.fetch_page(&request.doc_id, request.page).await;
        if let Err(err) = &outcome {
            warn!(page = request.page, %err, "page fetch failed");
        }
        self.loader.apply(&request, outcome);
    }

    /// Teardown: release cached content and return to `NoDocument`.
    pub fn reset(&mut self) {
        self.loader.invalidate();
        self.navigator.reset();
    }

    pub fn document(&self) -> Option<&DocumentSession> {
        self.navigator.session()
    }

    pub fn current_page(&self) -> Option<u32> {
        self.navigator.current_page()
    }

    pub fn page_count(&self) -> Option<u32> {
        self.navigator.session().map(|s| s.total_pages)
    }

    pub fn status(&self) -> &FetchStatus {
        self.loader.status()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.loader.last_error()
    }

    /// Displayed page content, if the current page has loaded.
    pub fn page(&self) -> Option<&PageEntry> {
        self.loader.entry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::StaticChapterTable;
    use crate::store::MockDocumentStore;

    fn turner(store: MockDocumentStore) -> (PageTurner, Arc<MockDocumentStore>) {
        let store = Arc::new(store);
        (PageTurner::new(store.clone()), store)
    }

    #[tokio::test]
    async fn upload_initializes_session_and_fetches_first_page() {
        let (mut turner, store) = turner(MockDocumentStore::new("doc-1", Some(5)));
        turner.upload("livre.pdf", b"pdf bytes".to_vec()).await.unwrap();

        assert_eq!(turner.current_page(), Some(0));
        assert_eq!(turner.page_count(), Some(5));
        assert_eq!(turner.status(), &FetchStatus::Loaded);
        assert_eq!(
            turner.page().unwrap().image.as_bytes(),
            MockDocumentStore::image_bytes("doc-1", 0)
        );
        assert_eq!(store.fetches(), vec![("doc-1".to_string(), 0)]);
    }

    #[tokio::test]
    async fn missing_page_count_defaults_to_single_page() {
        let (mut turner, _store) = turner(MockDocumentStore::new("img-1", None));
        turner.upload("photo.png", b"png".to_vec()).await.unwrap();
        assert_eq!(turner.page_count(), Some(1));
        assert_eq!(turner.next().await, Transition::Unchanged);
    }

    #[tokio::test]
    async fn upload_failure_leaves_loaded_document_untouched() {
        let (mut turner, store) = turner(MockDocumentStore::new("doc-1", Some(4)));
        turner.upload("livre.pdf", b"pdf".to_vec()).await.unwrap();
        turner.go_to(2).await;

        store.set_upload_failure(true);
        let err = turner.upload("autre.pdf", b"pdf".to_vec()).await.unwrap_err();
        assert!(err.to_string().contains("mock upload failure"));

        // The document being viewed stays exactly where it was.
        assert_eq!(turner.document().unwrap().doc_id, "doc-1");
        assert_eq!(turner.current_page(), Some(2));
        assert_eq!(turner.status(), &FetchStatus::Loaded);
        assert!(turner.page().is_some());
    }

    #[tokio::test]
    async fn each_distinct_page_is_fetched_once() {
        let (mut turner, store) = turner(MockDocumentStore::new("doc-1", Some(3)));
        turner.upload("livre.pdf", b"pdf".to_vec()).await.unwrap();
        turner.next().await;
        // Clamped transitions do not re-fetch the already-loaded page.
        turner.go_to(1).await;
        turner.next().await;
        turner.next().await;
        turner.next().await;

        assert_eq!(
            store.fetches(),
            vec![
                ("doc-1".to_string(), 0),
                ("doc-1".to_string(), 1),
                ("doc-1".to_string(), 2),
            ]
        );
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_as_error_status_and_is_retryable() {
        let (mut turner, store) = turner(MockDocumentStore::new("doc-1", Some(3)).with_failing_page(1));
        turner.upload("livre.pdf", b"pdf".to_vec()).await.unwrap();

        assert_eq!(turner.next().await, Transition::Moved { from: 0, to: 1 });
        assert!(matches!(turner.status(), FetchStatus::Error(_)));
        assert!(turner.last_error().unwrap().contains("page 1"));
        assert!(turner.page().is_none());

        // Re-issuing the same transition re-triggers the fetch.
        turner.go_to(1).await;
        assert_eq!(
            store.fetches(),
            vec![
                ("doc-1".to_string(), 0),
                ("doc-1".to_string(), 1),
                ("doc-1".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn navigation_without_document_is_inert() {
        let (mut turner, store) = turner(MockDocumentStore::new("doc-1", Some(3)));
        assert_eq!(turner.next().await, Transition::NoDocument);
        assert_eq!(turner.go_to(5).await, Transition::NoDocument);
        assert_eq!(turner.status(), &FetchStatus::Idle);
        assert!(store.fetches().is_empty());
    }

    #[tokio::test]
    async fn chapter_commands_use_the_injected_table() {
        let store = Arc::new(MockDocumentStore::new("doc-1", Some(40)));
        let mut turner = PageTurner::new(store.clone())
            .with_chapters(Box::new(StaticChapterTable::from_pairs([(3, 29)])));
        turner.upload("livre.pdf", b"pdf".to_vec()).await.unwrap();

        assert_eq!(
            turner.go_to_chapter(3).await,
            Transition::Moved { from: 0, to: 29 }
        );
        assert_eq!(turner.go_to_chapter(9).await, Transition::Ignored);
        assert_eq!(turner.current_page(), Some(29));
    }

    #[tokio::test]
    async fn intents_apply_like_buttons() {
        let (mut turner, _store) = turner(MockDocumentStore::new("doc-1", Some(12)));
        turner.upload("livre.pdf", b"pdf".to_vec()).await.unwrap();

        assert_eq!(
            turner.apply(NavigationIntent::GoToPage(11)).await,
            Transition::Moved { from: 0, to: 11 }
        );
        assert_eq!(
            turner.apply(NavigationIntent::PreviousPage).await,
            Transition::Moved { from: 11, to: 10 }
        );
        assert_eq!(
            turner.apply(NavigationIntent::Unrecognized).await,
            Transition::Ignored
        );
        assert_eq!(turner.current_page(), Some(10));
    }

    #[tokio::test]
    async fn new_upload_supersedes_previous_document() {
        let (mut turner, store) = turner(MockDocumentStore::new("doc-1", Some(5)));
        turner.upload("livre.pdf", b"pdf".to_vec()).await.unwrap();
        turner.go_to(4).await;
        let probe = turner.page().unwrap().image.probe();

        turner.upload("autre.pdf", b"pdf2".to_vec()).await.unwrap();
        assert_eq!(turner.current_page(), Some(0));
        assert!(probe.is_released(), "old document's handle released");
        assert_eq!(
            store.fetches().last(),
            Some(&("doc-1".to_string(), 0)),
            "fresh fetch for the new session's first page"
        );
    }

    #[tokio::test]
    async fn reset_tears_down_session_and_content() {
        let (mut turner, _store) = turner(MockDocumentStore::new("doc-1", Some(5)));
        turner.upload("livre.pdf", b"pdf".to_vec()).await.unwrap();
        let probe = turner.page().unwrap().image.probe();

        turner.reset();
        assert!(probe.is_released());
        assert_eq!(turner.current_page(), None);
        assert_eq!(turner.status(), &FetchStatus::Idle);
        assert_eq!(turner.next().await, Transition::NoDocument);
    }
}
