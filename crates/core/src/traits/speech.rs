//! Speech processing traits

use tokio::sync::mpsc;

use crate::{Language, Result};

/// Recognition configuration for one capture
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOptions {
    pub language: Language,
    /// Keep listening after the first utterance
    pub continuous: bool,
    /// Deliver partial transcripts while the guest is still speaking
    pub interim_results: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            continuous: false,
            interim_results: true,
        }
    }
}

/// Events reported by a platform recognizer
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// Interim or final result; `segments` holds every result yielded so far
    Result { segments: Vec<String>, is_final: bool },
    /// The platform decided the guest stopped speaking
    EndOfSpeech,
    /// The platform aborted recognition
    Error(String),
}

impl RecognitionEvent {
    /// Transcript accumulated across all segments of a result event
    pub fn transcript(&self) -> Option<String> {
        match self {
            Self::Result { segments, .. } => Some(segments.concat()),
            _ => None,
        }
    }
}

/// Channel a recognizer reports its events on
pub type RecognitionSender = mpsc::UnboundedSender<RecognitionEvent>;

/// Speech-to-text capability of the host platform
///
/// Implementations:
/// - browser or OS speech recognition bridged by the front-end
/// - scripted fakes in tests
pub trait SpeechRecognizer: Send + Sync + 'static {
    /// Begin recognition, reporting events on `events`
    fn start(&self, options: &RecognitionOptions, events: RecognitionSender) -> Result<()>;

    /// Stop recognition; must be safe to call when not running
    fn stop(&self);

    /// Get recognizer name for logging
    fn name(&self) -> &str {
        "platform-recognizer"
    }
}

/// Text queued on the platform synthesizer
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: Language,
    pub rate: f32,
}

/// Built-in text-to-speech of the host platform (the local fallback)
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Cancel anything queued or speaking
    fn cancel(&self);

    /// Speak an utterance
    fn speak(&self, utterance: Utterance) -> Result<()>;
}

/// Synthesized audio returned by the remote TTS endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub language: Language,
}

impl AudioClip {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Plays remote audio clips
///
/// `play` starts playback and returns; the player owns the clip and releases
/// it once playback ends or is stopped.
pub trait AudioPlayer: Send + Sync + 'static {
    fn play(&self, clip: AudioClip) -> Result<()>;

    /// Stop the clip currently playing, if any
    fn stop(&self);
}
