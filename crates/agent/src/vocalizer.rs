//! Reply vocalization
//!
//! Remote synthesis first, the platform synthesizer as fallback. A newer
//! `speak` supersedes an older one; a clip that arrives late is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use concierge_client::ConciergeBackend;
use concierge_core::{
    clean_for_speech, AudioClip, AudioPlayer, Language, LanguageDetector, SpeechSynthesizer,
    Utterance,
};

use crate::SessionState;

/// What a `speak` call ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Muted, or nothing speakable after cleaning
    Skipped,
    /// Remote clip handed to the player
    Remote(Language),
    /// Spoken by the platform synthesizer
    Local(Language),
    /// Both paths failed
    Silent,
    /// A newer utterance started first
    Superseded,
}

pub struct Vocalizer {
    backend: Arc<dyn ConciergeBackend>,
    player: Arc<dyn AudioPlayer>,
    local: Arc<dyn SpeechSynthesizer>,
    detector: LanguageDetector,
    state: Arc<SessionState>,
    rate: f32,
    sequence: AtomicU64,
}

impl Vocalizer {
    pub fn new(
        backend: Arc<dyn ConciergeBackend>,
        player: Arc<dyn AudioPlayer>,
        local: Arc<dyn SpeechSynthesizer>,
        detector: LanguageDetector,
        state: Arc<SessionState>,
        rate: f32,
    ) -> Self {
        Self {
            backend,
            player,
            local,
            detector,
            state,
            rate,
            sequence: AtomicU64::new(0),
        }
    }

    /// Speak a reply. Never fails; double failure is silence.
    pub async fn speak(&self, text: &str) -> SpeakOutcome {
        if self.state.is_muted() {
            return SpeakOutcome::Skipped;
        }

        let cleaned = clean_for_speech(text);
        if cleaned.is_empty() {
            return SpeakOutcome::Skipped;
        }

        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let language = self.detector.detect(&cleaned, self.state.language());

        let remote_err = match self.backend.synthesize(&cleaned, language).await {
            Ok(data) => {
                if !self.is_current(seq) {
                    tracing::debug!(seq, "Dropping superseded clip");
                    return SpeakOutcome::Superseded;
                }
                let bytes = data.len();
                self.player.stop();
                match self.player.play(AudioClip { data, language }) {
                    Ok(()) => {
                        tracing::debug!(lang = %language, bytes, "Playing remote speech");
                        return SpeakOutcome::Remote(language);
                    }
                    Err(e) => e.to_string(),
                }
            }
            Err(e) => e.to_string(),
        };

        if !self.is_current(seq) {
            return SpeakOutcome::Superseded;
        }

        tracing::debug!(lang = %language, error = %remote_err, "Remote speech failed, using local synthesizer");

        self.player.stop();
        self.local.cancel();
        match self.local.speak(Utterance {
            text: cleaned,
            language,
            rate: self.rate,
        }) {
            Ok(()) => SpeakOutcome::Local(language),
            Err(e) => {
                tracing::debug!(error = %e, "Local synthesizer failed");
                SpeakOutcome::Silent
            }
        }
    }

    /// Stop anything audible and invalidate outstanding remote calls
    pub fn silence(&self) {
        self.sequence.fetch_add(1, Ordering::SeqCst);
        self.player.stop();
        self.local.cancel();
    }

    fn is_current(&self, seq: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == seq && !self.state.is_muted()
    }
}
