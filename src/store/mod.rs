//! Document store boundary.
//!
//! The store is an opaque network service: it accepts an uploaded file and
//! hands back an identifier plus page count, and serves rendered page
//! content on demand. Everything behind the [`DocumentStore`] trait is
//! swappable (real HTTP backend vs mock).

pub mod http;

pub use http::HttpDocumentStore;

use crate::defaults;
use crate::error::{Result, TourneurError};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// What the store returns for a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub doc_id: String,
    pub filename: String,
    /// `None` when the store could not determine a page count (bare image
    /// uploads). See [`UploadReceipt::page_count_or_default`].
    pub pages: Option<u32>,
}

impl UploadReceipt {
    /// Page count with the single-page fallback applied.
    ///
    /// The fallback conflates "unknown" with "exactly one page"; the raw
    /// `pages` field stays available for callers that care.
    pub fn page_count_or_default(&self) -> u32 {
        self.pages.unwrap_or(defaults::DEFAULT_PAGE_COUNT)
    }
}

/// Rendered content of one page: binary image payload plus any extracted
/// text delivered out-of-band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub image: Vec<u8>,
    pub text: Option<String>,
}

/// Remote document store.
///
/// Implementations own transport details; failures map into
/// [`TourneurError::Upload`] / [`TourneurError::PageFetch`] with a
/// human-readable message, and no retry logic lives behind this trait.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Upload a file payload; returns the stored document's receipt.
    async fn upload(&self, filename: &str, payload: Vec<u8>) -> Result<UploadReceipt>;

    /// Fetch the rendered content of one page of a stored document.
    async fn fetch_page(&self, doc_id: &str, page: u32) -> Result<PageContent>;
}

/// Mock store for testing.
///
/// Page content is synthesized as `image:<doc>:<page>` bytes so tests can
/// assert exactly which page's content ended up displayed.
#[derive(Debug)]
pub struct MockDocumentStore {
    doc_id: String,
    pages: Option<u32>,
    fail_upload: AtomicBool,
    failing_pages: Vec<u32>,
    with_text: bool,
    fetch_log: Mutex<Vec<(String, u32)>>,
}

impl MockDocumentStore {
    /// Create a mock that accepts uploads as document `doc_id` with the
    /// given reported page count (`None` mimics a bare image upload).
    pub fn new(doc_id: &str, pages: Option<u32>) -> Self {
        Self {
            doc_id: doc_id.to_string(),
            pages,
            fail_upload: AtomicBool::new(false),
            failing_pages: Vec::new(),
            with_text: false,
            fetch_log: Mutex::new(Vec::new()),
        }
    }

    /// Configure the mock to reject uploads.
    pub fn with_upload_failure(self) -> Self {
        self.set_upload_failure(true);
        self
    }

    /// Flip upload failure at runtime (usable through a shared reference,
    /// e.g. after the store has been handed to a consumer).
    pub fn set_upload_failure(&self, fail: bool) {
        self.fail_upload.store(fail, Ordering::SeqCst);
    }

    /// Configure one page to fail on fetch.
    pub fn with_failing_page(mut self, page: u32) -> Self {
        self.failing_pages.push(page);
        self
    }

    /// Attach synthesized extracted text to every page.
    pub fn with_page_text(mut self) -> Self {
        self.with_text = true;
        self
    }

    /// Every `(doc_id, page)` pair fetched so far, in order.
    pub fn fetches(&self) -> Vec<(String, u32)> {
        self.fetch_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Expected image bytes for a page, for assertions.
    pub fn image_bytes(doc_id: &str, page: u32) -> Vec<u8> {
        format!("image:{doc_id}:{page}").into_bytes()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn upload(&self, filename: &str, _payload: Vec<u8>) -> Result<UploadReceipt> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(TourneurError::Upload {
                message: "mock upload failure".to_string(),
            });
        }
        Ok(UploadReceipt {
            doc_id: self.doc_id.clone(),
            filename: filename.to_string(),
            pages: self.pages,
        })
    }

    async fn fetch_page(&self, doc_id: &str, page: u32) -> Result<PageContent> {
        if let Ok(mut log) = self.fetch_log.lock() {
            log.push((doc_id.to_string(), page));
        }
        if self.failing_pages.contains(&page) {
            return Err(TourneurError::PageFetch {
                page,
                message: "mock fetch failure".to_string(),
            });
        }
        Ok(PageContent {
            image: Self::image_bytes(doc_id, page),
            text: self
                .with_text
                .then(|| format!("texte de la page {}", page + 1)),
        })
    }
}
