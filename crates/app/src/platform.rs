//! Terminal speech platform
//!
//! There is no microphone in a terminal session, so capture is not offered.
//! The local synthesizer prints what it would say; remote clips are saved to
//! disk when an output directory is configured.

use std::path::PathBuf;
use std::sync::Arc;

use concierge_agent::Platform;
use concierge_core::{AudioClip, AudioPlayer, Error, Result, SpeechSynthesizer, Utterance};

pub(crate) struct TerminalVoice;

impl SpeechSynthesizer for TerminalVoice {
    fn cancel(&self) {}

    fn speak(&self, utterance: Utterance) -> Result<()> {
        eprintln!("[voice {}] {}", utterance.language, utterance.text);
        Ok(())
    }
}

pub(crate) struct ClipWriter {
    dir: Option<PathBuf>,
}

impl ClipWriter {
    pub(crate) fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    fn file_name(clip: &AudioClip) -> String {
        format!(
            "reply-{}-{}.mp3",
            chrono::Utc::now().format("%Y%m%dT%H%M%S%3f"),
            clip.language
        )
    }
}

impl AudioPlayer for ClipWriter {
    fn play(&self, clip: AudioClip) -> Result<()> {
        let Some(dir) = &self.dir else {
            tracing::debug!(bytes = clip.len(), lang = %clip.language, "Discarding reply audio");
            return Ok(());
        };

        std::fs::create_dir_all(dir)
            .map_err(|e| Error::Playback(format!("{}: {}", dir.display(), e)))?;
        let path = dir.join(Self::file_name(&clip));
        std::fs::write(&path, &clip.data)
            .map_err(|e| Error::Playback(format!("{}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), bytes = clip.len(), "Saved reply audio");
        Ok(())
    }

    fn stop(&self) {}
}

pub(crate) fn terminal_platform(audio_dir: Option<PathBuf>) -> Platform {
    Platform {
        recognizer: None,
        synthesizer: Arc::new(TerminalVoice),
        player: Arc::new(ClipWriter::new(audio_dir)),
    }
}
