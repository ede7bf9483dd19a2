//! Voice capture
//!
//! `Stopped -> Recording` on `start`, back to `Stopped` on an explicit stop,
//! platform end of speech, or a platform error. Only the end-of-speech path
//! auto-submits the input buffer after a short settle delay.

use std::sync::Arc;
use std::time::Duration;

use concierge_config::VoiceSettings;
use concierge_core::{RecognitionEvent, RecognitionOptions, SpeechRecognizer};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{AgentError, SessionState, SubmitSlot};

/// Capture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    Stopped,
    Recording,
}

struct Status {
    state: CaptureState,
    /// Bumped on every start and explicit stop; events from older runs are ignored
    generation: u64,
    pump: Option<JoinHandle<()>>,
}

struct CaptureInner {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    state: Arc<SessionState>,
    slot: SubmitSlot,
    settle_delay: Duration,
    continuous: bool,
    interim_results: bool,
    status: Mutex<Status>,
}

/// Microphone capture through the platform recognizer
#[derive(Clone)]
pub struct VoiceCapture {
    inner: Arc<CaptureInner>,
}

impl VoiceCapture {
    /// `recognizer` is `None` when the platform has no speech recognition
    pub fn new(
        recognizer: Option<Arc<dyn SpeechRecognizer>>,
        state: Arc<SessionState>,
        slot: SubmitSlot,
        settings: &VoiceSettings,
    ) -> Self {
        Self {
            inner: Arc::new(CaptureInner {
                recognizer,
                state,
                slot,
                settle_delay: settings.auto_submit_delay(),
                continuous: settings.continuous,
                interim_results: settings.interim_results,
                status: Mutex::new(Status {
                    state: CaptureState::Stopped,
                    generation: 0,
                    pump: None,
                }),
            }),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.inner.recognizer.is_some()
    }

    pub fn state(&self) -> CaptureState {
        self.inner.status.lock().state
    }

    /// Start recording in the session's selected language
    ///
    /// Starting while already recording is a no-op.
    pub fn start(&self) -> Result<(), AgentError> {
        let recognizer = self
            .inner
            .recognizer
            .clone()
            .ok_or(AgentError::Unsupported)?;

        let mut status = self.inner.status.lock();
        if status.state == CaptureState::Recording {
            return Ok(());
        }

        let options = RecognitionOptions {
            language: self.inner.state.language(),
            continuous: self.inner.continuous,
            interim_results: self.inner.interim_results,
        };
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        recognizer.start(&options, event_tx)?;

        status.generation += 1;
        status.state = CaptureState::Recording;
        status.pump = Some(tokio::spawn(Self::pump(
            self.inner.clone(),
            status.generation,
            event_rx,
        )));

        tracing::info!(
            recognizer = recognizer.name(),
            lang = %options.language,
            "Voice capture started"
        );
        Ok(())
    }

    /// Explicit stop; never auto-submits
    ///
    /// Returns `false` when already stopped.
    pub fn stop(&self) -> bool {
        let pump = {
            let mut status = self.inner.status.lock();
            if status.state == CaptureState::Stopped {
                return false;
            }
            status.generation += 1;
            status.state = CaptureState::Stopped;
            status.pump.take()
        };

        if let Some(recognizer) = &self.inner.recognizer {
            recognizer.stop();
        }
        if let Some(pump) = pump {
            pump.abort();
        }
        tracing::info!("Voice capture stopped");
        true
    }

    async fn pump(
        inner: Arc<CaptureInner>,
        generation: u64,
        mut events: mpsc::UnboundedReceiver<RecognitionEvent>,
    ) {
        while let Some(event) = events.recv().await {
            match event {
                RecognitionEvent::Result { .. } => {
                    if !inner.is_current(generation) {
                        return;
                    }
                    if let Some(transcript) = event.transcript() {
                        inner.state.set_input(transcript);
                    }
                }
                RecognitionEvent::EndOfSpeech => {
                    if inner.finish(generation) {
                        inner.auto_submit(generation).await;
                    }
                    return;
                }
                RecognitionEvent::Error(message) => {
                    tracing::warn!(error = %message, "Recognition error");
                    inner.finish(generation);
                    return;
                }
            }
        }

        // Recognizer hung up without reporting end of speech
        inner.finish(generation);
    }
}

impl CaptureInner {
    fn is_current(&self, generation: u64) -> bool {
        let status = self.status.lock();
        status.generation == generation && status.state == CaptureState::Recording
    }

    /// Transition to `Stopped` if `generation` is still the live run
    fn finish(&self, generation: u64) -> bool {
        let mut status = self.status.lock();
        if status.generation != generation || status.state != CaptureState::Recording {
            return false;
        }
        status.state = CaptureState::Stopped;
        status.pump = None;
        true
    }

    async fn auto_submit(&self, generation: u64) {
        tokio::time::sleep(self.settle_delay).await;

        // A run started during the delay owns the input buffer
        if self.status.lock().generation != generation {
            tracing::debug!("Capture restarted during settle delay, not submitting");
            return;
        }

        let text = self.state.input();
        if text.trim().is_empty() {
            return;
        }

        tracing::debug!(chars = text.chars().count(), "Auto-submitting transcript");
        if let Some(outcome) = self.slot.submit(&text).await {
            if outcome.is_ignored() {
                tracing::debug!(?outcome, "Auto-submit rejected");
            }
        }
    }
}
