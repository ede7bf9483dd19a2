//! Concierge facade
//!
//! Wires the conversation session, voice pipeline and background monitor
//! around one shared session state.

use std::sync::Arc;

use concierge_client::ConciergeBackend;
use concierge_config::Settings;
use concierge_core::{AudioPlayer, Language, SpeechRecognizer, SpeechSynthesizer};
use serde::Serialize;

use crate::{
    AgentError, BackgroundMonitor, CaptureState, ConversationSession, MonitorHandle,
    SessionPhase, SessionState, StaffConsole, SubmitSlot, TrainingSession, VoiceCapture,
    Vocalizer,
};

/// Speech capabilities of the host platform
#[derive(Clone)]
pub struct Platform {
    /// `None` when speech recognition is unavailable
    pub recognizer: Option<Arc<dyn SpeechRecognizer>>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub player: Arc<dyn AudioPlayer>,
}

/// Point-in-time view for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub phase: SessionPhase,
    pub capture: CaptureState,
    pub capture_supported: bool,
    pub language: Language,
    pub muted: bool,
    pub degraded: bool,
    pub show_unavailable: bool,
    pub rating_prompt: bool,
    pub rated: bool,
    pub messages: usize,
    pub user_messages: usize,
}

pub struct Concierge {
    session_id: String,
    settings: Settings,
    backend: Arc<dyn ConciergeBackend>,
    state: Arc<SessionState>,
    session: ConversationSession,
    capture: VoiceCapture,
    vocalizer: Arc<Vocalizer>,
    slot: SubmitSlot,
    monitor: BackgroundMonitor,
}

impl Concierge {
    pub fn new(
        settings: &Settings,
        backend: Arc<dyn ConciergeBackend>,
        platform: Platform,
    ) -> Result<Self, AgentError> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let keywords = settings.content.drink_keywords()?;
        let state = Arc::new(SessionState::new(
            settings.session.default_language,
            settings.voice.muted,
        ));

        let vocalizer = Arc::new(Vocalizer::new(
            backend.clone(),
            platform.player,
            platform.synthesizer,
            settings.content.language_detector(),
            state.clone(),
            settings.voice.speech_rate,
        ));

        let session = ConversationSession::new(
            backend.clone(),
            state.clone(),
            settings.session.clone(),
            settings.strings.clone(),
            keywords,
        );
        session.set_vocalizer(vocalizer.clone());

        let slot = SubmitSlot::new();
        slot.set(Arc::new(session.clone()));

        let capture = VoiceCapture::new(
            platform.recognizer,
            state.clone(),
            slot.clone(),
            &settings.voice,
        );

        let monitor =
            BackgroundMonitor::new(backend.clone(), state.clone(), settings.monitor.clone());

        tracing::info!(
            session_id = %session_id,
            lang = %state.language(),
            capture = capture.is_supported(),
            "Concierge session created"
        );

        Ok(Self {
            session_id,
            settings: settings.clone(),
            backend,
            state,
            session,
            capture,
            vocalizer,
            slot,
            monitor,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn capture(&self) -> &VoiceCapture {
        &self.capture
    }

    pub fn vocalizer(&self) -> &Arc<Vocalizer> {
        &self.vocalizer
    }

    pub fn monitor(&self) -> &BackgroundMonitor {
        &self.monitor
    }

    /// Slot the voice pipeline submits through
    pub fn submit_slot(&self) -> &SubmitSlot {
        &self.slot
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            phase: self.session.phase(),
            capture: self.capture.state(),
            capture_supported: self.capture.is_supported(),
            language: self.state.language(),
            muted: self.state.is_muted(),
            degraded: self.state.is_degraded(),
            show_unavailable: self.session.should_show_unavailable(),
            rating_prompt: self.session.rating_prompt_available(),
            rated: self.session.is_rated(),
            messages: self.session.message_count(),
            user_messages: self.session.user_message_count(),
        }
    }

    /// Talk theme banner text; any failure suppresses the banner
    pub async fn talk_theme(&self) -> Option<String> {
        match self.backend.talk_theme().await {
            Ok(theme) => theme,
            Err(e) => {
                tracing::debug!(error = %e, "Talk theme unavailable");
                None
            }
        }
    }

    /// Health probe plus availability polling until the handle drops
    pub fn start_background(&self) -> MonitorHandle {
        self.monitor.spawn()
    }

    /// New roleplay training session on the same backend
    pub fn training(&self) -> TrainingSession {
        TrainingSession::new(
            self.backend.clone(),
            &self.settings.training,
            self.settings.strings.strings_for(Language::English),
        )
    }

    pub fn staff(&self) -> StaffConsole {
        StaffConsole::new(self.backend.clone())
    }
}
