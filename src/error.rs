//! Error types for tourneur.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TourneurError {
    // Document store errors (network boundary)
    #[error("Upload failed: {message}")]
    Upload { message: String },

    #[error("Failed to fetch page {page}: {message}")]
    PageFetch { page: u32, message: String },

    #[error("Document store returned an invalid response: {message}")]
    StoreResponse { message: String },

    // Navigation errors
    #[error("Invalid page count: {pages} (a document has at least one page)")]
    InvalidPageCount { pages: u32 },

    // Speech capture errors
    #[error("Speech capture unavailable: {message}")]
    CapabilityUnavailable { message: String },

    #[error("Speech capture failed: {message}")]
    Capture { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TourneurError>;
