//! Speech capture capability seam.
//!
//! Recognition is an external capability (a platform recognizer, a remote
//! STT service, a test script); this crate only consumes transcript strings.
//! Implementations deliver events over a channel handed to [`SpeechCapture::start`]
//! so the session side needs no knowledge of the capture's threading.

use crate::defaults;
use crate::error::{Result, TourneurError};
use crossbeam_channel::Sender;
use std::sync::{Arc, Mutex};

/// One event from a capture implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A recognized utterance, as raw transcript text.
    Transcript(String),
    /// A transient recognition error. Does not imply the capture stopped.
    Error(String),
}

/// Continuous speech capture.
///
/// Implementations listen until [`SpeechCapture::stop`] and must drop their
/// copy of the event sender on stop so consumers observe end-of-stream.
pub trait SpeechCapture: Send {
    /// Begin listening, delivering events on `events`.
    ///
    /// Returns [`TourneurError::CapabilityUnavailable`] when the runtime has
    /// no speech recognition; the caller's session stays inert in that case.
    fn start(&mut self, events: Sender<CaptureEvent>) -> Result<()>;

    /// Stop listening. Safe to call when not started.
    fn stop(&mut self);

    /// BCP 47 tag the recognizer should be configured for. Defaults to the
    /// locale the phrase table is tuned for.
    fn locale(&self) -> &'static str {
        defaults::RECOGNITION_LOCALE
    }

    /// Name for logging.
    fn name(&self) -> &'static str {
        "capture"
    }
}

/// Capture double for runtimes without speech recognition: `start` always
/// fails, everything else is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedCapture;

impl SpeechCapture for UnsupportedCapture {
    fn start(&mut self, _events: Sender<CaptureEvent>) -> Result<()> {
        Err(TourneurError::CapabilityUnavailable {
            message: "speech recognition is not available in this runtime".to_string(),
        })
    }

    fn stop(&mut self) {}

    fn name(&self) -> &'static str {
        "unsupported"
    }
}

type SenderSlot = Arc<Mutex<Option<Sender<CaptureEvent>>>>;

/// Scripted capture for tests: events are injected by hand through the
/// paired [`ScriptedHandle`] while the capture is started.
#[derive(Debug, Default)]
pub struct ScriptedCapture {
    slot: SenderSlot,
}

/// Driver side of a [`ScriptedCapture`].
#[derive(Debug, Clone)]
pub struct ScriptedHandle {
    slot: SenderSlot,
}

impl ScriptedCapture {
    pub fn new() -> (Self, ScriptedHandle) {
        let slot: SenderSlot = Arc::new(Mutex::new(None));
        (
            Self {
                slot: Arc::clone(&slot),
            },
            ScriptedHandle { slot },
        )
    }
}

impl SpeechCapture for ScriptedCapture {
    fn start(&mut self, events: Sender<CaptureEvent>) -> Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(events);
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Ok(mut slot) = self.slot.lock() {
            // Dropping the sender signals end-of-stream to the consumer.
            slot.take();
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

impl ScriptedHandle {
    fn send(&self, event: CaptureEvent) -> bool {
        match self.slot.lock() {
            Ok(slot) => match slot.as_ref() {
                Some(tx) => tx.send(event).is_ok(),
                None => false,
            },
            Err(_) => false,
        }
    }

    /// Emit a recognized transcript. Returns false when the capture is not
    /// currently started.
    pub fn say(&self, transcript: &str) -> bool {
        self.send(CaptureEvent::Transcript(transcript.to_string()))
    }

    /// Emit a recognition error.
    pub fn fail(&self, message: &str) -> bool {
        self.send(CaptureEvent::Error(message.to_string()))
    }

    pub fn is_listening(&self) -> bool {
        self.slot.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn unsupported_capture_fails_start() {
        let (tx, _rx) = unbounded();
        let mut capture = UnsupportedCapture;
        let err = capture.start(tx).unwrap_err();
        assert!(matches!(err, TourneurError::CapabilityUnavailable { .. }));
        // Stop stays safe even though start never succeeded.
        capture.stop();
    }

    #[test]
    fn default_locale_matches_the_phrase_table() {
        let (capture, _handle) = ScriptedCapture::new();
        assert_eq!(capture.locale(), "fr-CA");
        assert_eq!(UnsupportedCapture.locale(), "fr-CA");
    }

    #[test]
    fn scripted_capture_delivers_events_while_started() {
        let (mut capture, handle) = ScriptedCapture::new();
        assert!(!handle.say("suivante"), "not started yet");

        let (tx, rx) = unbounded();
        capture.start(tx).unwrap();
        assert!(handle.say("suivante"));
        assert!(handle.fail("microphone glitch"));
        assert_eq!(
            rx.try_recv().unwrap(),
            CaptureEvent::Transcript("suivante".to_string())
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            CaptureEvent::Error("microphone glitch".to_string())
        );

        capture.stop();
        assert!(!handle.say("next"), "stopped");
        assert!(rx.recv().is_err(), "sender dropped on stop");
    }
}
