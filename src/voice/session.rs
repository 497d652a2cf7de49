//! Voice session: transcripts in, navigation intents out.
//!
//! Wraps an injected [`SpeechCapture`], runs each transcript through the
//! command interpreter on a worker thread and forwards every recognized
//! intent into the channel the composition root drains. Recognition errors
//! go to an observer and never stop the session; only an explicit `stop`
//! (or a vanished consumer) ends it.

use crate::defaults;
use crate::error::Result;
use crate::intent::{self, NavigationIntent};
use crate::voice::capture::{CaptureEvent, SpeechCapture};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Observer for voice session events that are not navigation intents.
pub trait VoiceObserver: Send + Sync {
    /// A capture error was reported. The session keeps listening.
    fn on_error(&self, message: &str);

    /// A transcript matched no command. Expected for ambient speech.
    fn on_unrecognized(&self, transcript: &str) {
        let _ = transcript;
    }
}

/// Default observer: routes everything to tracing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl VoiceObserver for TracingObserver {
    fn on_error(&self, message: &str) {
        warn!(%message, "speech capture error");
    }

    fn on_unrecognized(&self, transcript: &str) {
        debug!(%transcript, "unrecognized voice command");
    }
}

/// A continuous listening session over an injected capture capability.
pub struct VoiceSession {
    capture: Box<dyn SpeechCapture>,
    intents: Sender<NavigationIntent>,
    observer: Arc<dyn VoiceObserver>,
    worker: Option<JoinHandle<()>>,
}

impl VoiceSession {
    /// Create a session forwarding intents into `intents`.
    pub fn new(capture: Box<dyn SpeechCapture>, intents: Sender<NavigationIntent>) -> Self {
        Self {
            capture,
            intents,
            observer: Arc::new(TracingObserver),
            worker: None,
        }
    }

    /// Replace the default observer.
    pub fn with_observer(mut self, observer: Arc<dyn VoiceObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Begin listening. Idempotent: a second call while listening does not
    /// create a duplicate listener.
    ///
    /// When the capture capability is unavailable the error propagates and
    /// the session stays inert; `start` may be retried later.
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        let (tx, rx) = bounded(defaults::CAPTURE_EVENT_BUFFER);
        self.capture.start(tx)?;
        debug!(
            capture = self.capture.name(),
            locale = self.capture.locale(),
            "voice session listening"
        );

        let intents = self.intents.clone();
        let observer = Arc::clone(&self.observer);
        self.worker = Some(thread::spawn(move || run_worker(rx, intents, observer)));
        Ok(())
    }

    /// Stop listening. Safe to call when not started.
    pub fn stop(&mut self) {
        self.capture.stop();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!("voice session worker panicked");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for VoiceSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(
    events: Receiver<CaptureEvent>,
    intents: Sender<NavigationIntent>,
    observer: Arc<dyn VoiceObserver>,
) {
    // Runs until the capture drops its sender (stop) or the intent consumer
    // goes away.
    while let Ok(event) = events.recv() {
        match event {
            CaptureEvent::Transcript(transcript) => {
                let parsed = intent::interpret(&transcript);
                if parsed == NavigationIntent::Unrecognized {
                    observer.on_unrecognized(&transcript);
                    continue;
                }
                debug!(?parsed, %transcript, "voice command");
                if intents.send(parsed).is_err() {
                    break;
                }
            }
            CaptureEvent::Error(message) => observer.on_error(&message),
        }
    }
}
