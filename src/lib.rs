//! tourneur - Voice-driven page navigation for document viewing
//!
//! The navigation core of a "page turner" viewer: upload a document to a
//! remote store, then flip through its pages by button or by spoken command
//! (French-Canadian phrases plus a few English synonyms). Rendering,
//! animation and speech recognition stay outside; this crate owns the state
//! machine, the command interpreter and the fetch ordering.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod chapters;
pub mod defaults;
pub mod error;
pub mod intent;
pub mod loader;
pub mod navigator;
pub mod store;
pub mod turner;
pub mod voice;

// Core traits (capture → interpret → navigate → fetch)
pub use chapters::{ChapterTable, NoChapters, StaticChapterTable};
pub use store::{DocumentStore, HttpDocumentStore, MockDocumentStore, PageContent, UploadReceipt};
pub use voice::{
    CaptureEvent, ScriptedCapture, ScriptedHandle, SpeechCapture, UnsupportedCapture,
    VoiceObserver, VoiceSession,
};

// Navigation
pub use intent::{NavigationIntent, interpret};
pub use loader::{FetchStatus, ImageHandle, PageEntry, PageLoader, ReleaseProbe};
pub use navigator::{DocumentSession, Navigator, Transition};
pub use turner::PageTurner;

// Error handling
pub use error::{Result, TourneurError};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }
}
