//! Voice input: speech capture seam and the session that turns transcripts
//! into navigation intents.

pub mod capture;
pub mod session;

pub use capture::{CaptureEvent, ScriptedCapture, ScriptedHandle, SpeechCapture, UnsupportedCapture};
pub use session::{TracingObserver, VoiceObserver, VoiceSession};
