//! Default constants for tourneur.
//!
//! Shared across the store client, the navigator and the voice session to
//! keep the wire format and defaults in one place.

/// Page count assumed when the document store reports none.
///
/// A bare image upload has no page structure, so the store may return a null
/// page count. Treating it as a single page keeps navigation well defined,
/// at the cost of conflating "unknown" with "exactly one".
pub const DEFAULT_PAGE_COUNT: u32 = 1;

/// Response header carrying the extracted text of a fetched page.
///
/// The store delivers page text out-of-band so the body can stay a plain
/// binary image payload.
pub const PAGE_TEXT_HEADER: &str = "X-Page-Text";

/// Path of the document upload endpoint, relative to the store base URL.
pub const UPLOAD_PATH: &str = "/api/documents/upload";

/// Recognition locale the phrase table is tuned for.
///
/// French-Canadian with a few English synonyms; capture implementations
/// should configure their recognizer accordingly.
pub const RECOGNITION_LOCALE: &str = "fr-CA";

/// Bound for the capture event channel between a speech capture
/// implementation and the voice session worker.
///
/// Transcripts arrive at human speaking pace; a small bound is plenty and
/// keeps a runaway capture from buffering without limit.
pub const CAPTURE_EVENT_BUFFER: usize = 64;

/// Multipart field name the store expects the uploaded file under.
pub const UPLOAD_FIELD: &str = "file";
