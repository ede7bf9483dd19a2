//! Staff roleplay training
//!
//! The backend plays a first-time guest. Staff replies are posted with the
//! transcript so far; the guest answers and, near the end, the backend
//! attaches coaching feedback to its reply.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use concierge_client::{ConciergeBackend, TrainingRequest};
use concierge_config::{LocaleStrings, TrainingSettings};
use concierge_core::{HistoryEntry, Message, MessageLog};
use parking_lot::Mutex;

use crate::{classify, FailureKind, IgnoreReason, RequestGate, SessionPhase, SubmitOutcome};

pub struct TrainingSession {
    backend: Arc<dyn ConciergeBackend>,
    strings: LocaleStrings,
    turn_limit: usize,
    log: Mutex<MessageLog>,
    input: Mutex<String>,
    gate: RequestGate,
    turns: AtomicUsize,
    epoch: AtomicU64,
}

impl TrainingSession {
    pub fn new(
        backend: Arc<dyn ConciergeBackend>,
        settings: &TrainingSettings,
        strings: LocaleStrings,
    ) -> Self {
        Self {
            backend,
            log: Mutex::new(MessageLog::new(strings.training_welcome.clone())),
            strings,
            turn_limit: settings.turn_limit,
            input: Mutex::new(String::new()),
            gate: RequestGate::new(),
            turns: AtomicUsize::new(0),
            epoch: AtomicU64::new(0),
        }
    }

    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        let text = raw.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        let Some(_guard) = self.gate.try_begin() else {
            return SubmitOutcome::Ignored(IgnoreReason::RequestInFlight);
        };

        let epoch = self.epoch.load(Ordering::SeqCst);
        let history = {
            let mut log = self.log.lock();
            let history = log.history();
            log.push_user(text);
            history
        };
        self.input.lock().clear();

        let request = TrainingRequest {
            message: text.to_string(),
            history,
        };
        let result = self.backend.train(&request).await;

        if self.epoch.load(Ordering::SeqCst) != epoch {
            return SubmitOutcome::Discarded;
        }

        let mut log = self.log.lock();
        match result {
            Ok(response) => {
                let message = log
                    .push_assistant_with_feedback(response.customer_reply, response.feedback_to_staff)
                    .clone();
                let turn = self.turns.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::debug!(turn, limit = self.turn_limit, "Training turn completed");
                SubmitOutcome::Replied(message)
            }
            Err(err) => match classify(&err) {
                FailureKind::RateLimited => SubmitOutcome::RateLimited(
                    log.push_assistant(self.strings.rate_limited.clone(), vec![])
                        .clone(),
                ),
                FailureKind::BackendUnavailable => {
                    tracing::warn!(error = %err, "Training request failed");
                    SubmitOutcome::Failed(
                        log.push_assistant(self.strings.training_error.clone(), vec![])
                            .clone(),
                    )
                }
            },
        }
    }

    /// Fresh welcome, zero turns, empty input
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.log.lock().reset(self.strings.training_welcome.clone());
        self.turns.store(0, Ordering::SeqCst);
        self.input.lock().clear();
    }

    pub fn turn_count(&self) -> usize {
        self.turns.load(Ordering::SeqCst)
    }

    pub fn turn_limit(&self) -> usize {
        self.turn_limit
    }

    /// Informational only; further submissions are still accepted
    pub fn is_complete(&self) -> bool {
        self.turn_count() >= self.turn_limit
    }

    pub fn phase(&self) -> SessionPhase {
        self.gate.phase()
    }

    pub fn input(&self) -> String {
        self.input.lock().clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        *self.input.lock() = text.into();
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.log.lock().history()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.log.lock().messages().to_vec()
    }
}
