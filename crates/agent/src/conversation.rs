//! Conversation session
//!
//! Owns the message log and the chat request lifecycle. At most one chat
//! request is outstanding; replies are vocalized after the session is back
//! to `Idle`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use concierge_client::{ChatRequest, ClientError, ConciergeBackend, RatingRequest};
use concierge_config::{LocaleBundle, SessionSettings};
use concierge_core::{DrinkKeywords, HistoryEntry, Language, Message, MessageLog};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use crate::{
    classify, AgentError, FailureKind, IgnoreReason, RequestGate, SessionEvent, SessionPhase,
    SessionState, SubmitOutcome, Submitter, Vocalizer,
};

struct SessionInner {
    backend: Arc<dyn ConciergeBackend>,
    state: Arc<SessionState>,
    log: Mutex<MessageLog>,
    gate: RequestGate,
    /// Bumped on reset; replies from an older epoch are discarded
    epoch: AtomicU64,
    rated: AtomicBool,
    strings: LocaleBundle,
    keywords: DrinkKeywords,
    settings: SessionSettings,
    vocalizer: RwLock<Option<Arc<Vocalizer>>>,
}

#[derive(Clone)]
pub struct ConversationSession {
    inner: Arc<SessionInner>,
}

impl ConversationSession {
    pub fn new(
        backend: Arc<dyn ConciergeBackend>,
        state: Arc<SessionState>,
        settings: SessionSettings,
        strings: LocaleBundle,
        keywords: DrinkKeywords,
    ) -> Self {
        let welcome = strings.strings_for(state.language()).welcome;
        let gate = RequestGate::with_events(state.events());
        Self {
            inner: Arc::new(SessionInner {
                backend,
                log: Mutex::new(MessageLog::new(welcome)),
                gate,
                epoch: AtomicU64::new(0),
                rated: AtomicBool::new(false),
                strings,
                keywords,
                settings,
                vocalizer: RwLock::new(None),
                state,
            }),
        }
    }

    /// Attach the reply vocalizer
    pub fn set_vocalizer(&self, vocalizer: Arc<Vocalizer>) {
        *self.inner.vocalizer.write() = Some(vocalizer);
    }

    fn vocalizer(&self) -> Option<Arc<Vocalizer>> {
        self.inner.vocalizer.read().clone()
    }

    /// Submit guest text
    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        let text = raw.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        let Some(guard) = self.inner.gate.try_begin() else {
            tracing::debug!("Submit ignored, request in flight");
            return SubmitOutcome::Ignored(IgnoreReason::RequestInFlight);
        };

        let epoch = self.inner.epoch.load(Ordering::SeqCst);
        let language = self.inner.state.language();

        let (history, user_message) = {
            let mut log = self.inner.log.lock();
            let history = log.history();
            let message = log.push_user(text).clone();
            (history, message)
        };
        self.inner.state.clear_input();
        self.inner.state.emit(SessionEvent::MessageAppended(user_message));

        let request = self.build_request(text, history, language);
        let result = self.inner.backend.chat(&request).await;

        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!("Session reset while awaiting reply, discarding");
            return SubmitOutcome::Discarded;
        }

        let outcome = match result {
            Ok(response) => {
                let message = self.append_assistant(
                    response.reply,
                    response.menu_items.unwrap_or_default(),
                );
                self.inner.state.set_degraded(false);
                SubmitOutcome::Replied(message)
            }
            Err(err) => self.append_failure(&err, language),
        };

        drop(guard);

        if let (SubmitOutcome::Replied(message), Some(vocalizer)) = (&outcome, self.vocalizer()) {
            vocalizer.speak(&message.content).await;
        }

        outcome
    }

    fn build_request(
        &self,
        text: &str,
        history: Vec<HistoryEntry>,
        language: Language,
    ) -> ChatRequest {
        let settings = &self.inner.settings;
        let energy_context = settings
            .send_energy_context
            .then(|| self.inner.keywords.energy_context(&history, text));

        ChatRequest {
            message: text.to_string(),
            history,
            lang: settings
                .send_language
                .then(|| language.tag().to_string()),
            energy_context,
        }
    }

    fn append_assistant(
        &self,
        content: String,
        menu_items: Vec<concierge_core::MenuItem>,
    ) -> Message {
        let message = self
            .inner
            .log
            .lock()
            .push_assistant(content, menu_items)
            .clone();
        self.inner
            .state
            .emit(SessionEvent::MessageAppended(message.clone()));
        message
    }

    fn append_failure(&self, err: &ClientError, language: Language) -> SubmitOutcome {
        let strings = self.inner.strings.strings_for(language);
        match classify(err) {
            FailureKind::RateLimited => {
                tracing::info!(lang = %language, "Chat rate limited");
                SubmitOutcome::RateLimited(self.append_assistant(strings.rate_limited, vec![]))
            }
            FailureKind::BackendUnavailable => {
                tracing::warn!(error = %err, status = ?err.status(), "Chat request failed");
                let message = self.append_assistant(strings.generic_error, vec![]);
                self.inner.state.set_degraded(true);
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Restore the welcome log and clear the input buffer
    ///
    /// A reply still outstanding is discarded when it arrives.
    pub fn reset(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        let welcome = self
            .inner
            .strings
            .strings_for(self.inner.state.language())
            .welcome;
        self.inner.log.lock().reset(welcome);
        self.inner.state.clear_input();
        self.inner.state.emit(SessionEvent::Reset);
        tracing::info!("Conversation reset");
    }

    /// History payload for the next request (welcome excluded)
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.log.lock().history()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.log.lock().messages().to_vec()
    }

    pub fn message_count(&self) -> usize {
        self.inner.log.lock().len()
    }

    pub fn user_message_count(&self) -> usize {
        self.inner.log.lock().user_message_count()
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.gate.phase()
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.inner.state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.state.subscribe()
    }

    /// Degraded before any exchange succeeded: show the unavailable view
    pub fn should_show_unavailable(&self) -> bool {
        self.inner.state.is_degraded() && self.inner.log.lock().only_welcome()
    }

    pub fn is_rated(&self) -> bool {
        self.inner.rated.load(Ordering::SeqCst)
    }

    pub fn rating_prompt_available(&self) -> bool {
        !self.is_rated() && self.user_message_count() >= self.inner.settings.rating_threshold
    }

    /// Submit a 1-5 rating once per session
    ///
    /// The flag is set before the request; delivery failures are swallowed.
    pub async fn submit_rating(&self, rating: u8) -> Result<(), AgentError> {
        if !(1..=5).contains(&rating) {
            return Err(AgentError::InvalidInput(format!(
                "rating must be 1-5, got {}",
                rating
            )));
        }
        if self.inner.rated.swap(true, Ordering::SeqCst) {
            return Err(AgentError::AlreadyRated);
        }

        let request = RatingRequest {
            rating,
            message_count: self.user_message_count(),
            lang: self.inner.state.language().tag().to_string(),
        };
        if let Err(e) = self.inner.backend.rate(&request).await {
            tracing::debug!(error = %e, "Rating submission failed");
        }
        Ok(())
    }

    /// Change the spoken language
    ///
    /// An untouched log gets the welcome message of the new language.
    pub fn set_language(&self, language: Language) {
        self.inner.state.set_language(language);

        let mut log = self.inner.log.lock();
        if log.only_welcome() {
            log.reset(self.inner.strings.strings_for(language).welcome);
            drop(log);
            self.inner.state.emit(SessionEvent::Reset);
        }
    }

    pub fn set_muted(&self, muted: bool) {
        self.inner.state.set_muted(muted);
        if muted {
            if let Some(vocalizer) = self.vocalizer() {
                vocalizer.silence();
            }
        }
    }

    pub fn is_muted(&self) -> bool {
        self.inner.state.is_muted()
    }
}

#[async_trait]
impl Submitter for ConversationSession {
    async fn submit(&self, text: &str) -> SubmitOutcome {
        ConversationSession::submit(self, text).await
    }
}
