//! Scripted backend and speech fakes shared by the agent tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use concierge_agent::{Concierge, Platform};
use concierge_client::{
    ChatRequest, ChatResponse, ClientError, ConciergeBackend, RatingRequest, ToggleRequest,
    TrainingRequest, TrainingResponse,
};
use concierge_config::Settings;
use concierge_core::{
    AudioClip, AudioPlayer, AvailabilityEntry, Language, MenuItem, RecognitionEvent,
    RecognitionOptions, RecognitionSender, SpeechRecognizer, SpeechSynthesizer, StaffMenuItem,
    Utterance,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub const STAFF_PASSWORD: &str = "s3cret";

#[derive(Default)]
pub struct ScriptedBackend {
    pub chat_replies: Mutex<VecDeque<Result<ChatResponse, ClientError>>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    /// When set, every chat call waits for one notification
    pub chat_hold: Mutex<Option<Arc<Notify>>>,
    pub train_replies: Mutex<VecDeque<Result<TrainingResponse, ClientError>>>,
    pub train_requests: Mutex<Vec<TrainingRequest>>,
    pub tts_fail: AtomicBool,
    /// When set, every TTS call waits for one notification
    pub tts_hold: Mutex<Option<Arc<Notify>>>,
    pub tts_requests: Mutex<Vec<(String, Language)>>,
    pub health_fail: AtomicBool,
    pub availability_fail: AtomicBool,
    pub availability: Mutex<Vec<AvailabilityEntry>>,
    pub theme: Mutex<Option<String>>,
    pub ratings: Mutex<Vec<RatingRequest>>,
    pub staff_items: Mutex<Vec<StaffMenuItem>>,
    pub toggle_fail: AtomicBool,
    pub toggles: Mutex<Vec<ToggleRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, text: &str) {
        self.chat_replies.lock().push_back(Ok(ChatResponse {
            reply: text.to_string(),
            menu_items: None,
        }));
    }

    pub fn reply_with_items(&self, text: &str, items: Vec<MenuItem>) {
        self.chat_replies.lock().push_back(Ok(ChatResponse {
            reply: text.to_string(),
            menu_items: Some(items),
        }));
    }

    pub fn fail_chat(&self, err: ClientError) {
        self.chat_replies.lock().push_back(Err(err));
    }

    pub fn hold_chat(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.chat_hold.lock() = Some(notify.clone());
        notify
    }

    pub fn hold_tts(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.tts_hold.lock() = Some(notify.clone());
        notify
    }

    /// Later TTS calls answer immediately; calls already waiting stay held
    pub fn release_tts_hold(&self) {
        *self.tts_hold.lock() = None;
    }
}

#[async_trait]
impl ConciergeBackend for ScriptedBackend {
    async fn health(&self) -> Result<(), ClientError> {
        if self.health_fail.load(Ordering::SeqCst) {
            Err(ClientError::Network("connection refused".into()))
        } else {
            Ok(())
        }
    }

    async fn talk_theme(&self) -> Result<Option<String>, ClientError> {
        Ok(self.theme.lock().clone())
    }

    async fn availability(&self) -> Result<Vec<AvailabilityEntry>, ClientError> {
        if self.availability_fail.load(Ordering::SeqCst) {
            return Err(ClientError::Timeout);
        }
        Ok(self.availability.lock().clone())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.chat_requests.lock().push(request.clone());
        let hold = self.chat_hold.lock().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        let scripted = self.chat_replies.lock().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(ChatResponse {
                reply: format!("echo: {}", request.message),
                menu_items: None,
            })
        })
    }

    async fn train(&self, request: &TrainingRequest) -> Result<TrainingResponse, ClientError> {
        self.train_requests.lock().push(request.clone());
        let scripted = self.train_replies.lock().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(TrainingResponse {
                customer_reply: "Hmm, what do you recommend?".to_string(),
                feedback_to_staff: None,
            })
        })
    }

    async fn synthesize(&self, text: &str, lang: Language) -> Result<Vec<u8>, ClientError> {
        self.tts_requests.lock().push((text.to_string(), lang));
        let hold = self.tts_hold.lock().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        if self.tts_fail.load(Ordering::SeqCst) {
            Err(ClientError::Status {
                status: 500,
                body: "tts down".into(),
            })
        } else {
            Ok(b"ID3audio".to_vec())
        }
    }

    async fn rate(&self, request: &RatingRequest) -> Result<(), ClientError> {
        self.ratings.lock().push(request.clone());
        Ok(())
    }

    async fn staff_menu(&self, token: Option<&str>) -> Result<Vec<StaffMenuItem>, ClientError> {
        if token != Some(STAFF_PASSWORD) {
            return Err(ClientError::Unauthorized);
        }
        Ok(self.staff_items.lock().clone())
    }

    async fn toggle_menu(
        &self,
        token: Option<&str>,
        request: &ToggleRequest,
    ) -> Result<(), ClientError> {
        if token != Some(STAFF_PASSWORD) {
            return Err(ClientError::Unauthorized);
        }
        self.toggles.lock().push(request.clone());
        if self.toggle_fail.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                body: "sheet write failed".into(),
            });
        }
        Ok(())
    }
}

/// Recognizer driven by the test
#[derive(Default)]
pub struct FakeMic {
    sender: Mutex<Option<RecognitionSender>>,
    pub starts: Mutex<Vec<RecognitionOptions>>,
}

impl FakeMic {
    pub fn emit(&self, event: RecognitionEvent) {
        if let Some(tx) = self.sender.lock().as_ref() {
            let _ = tx.send(event);
        }
    }

    pub fn say(&self, segments: &[&str]) {
        self.emit(RecognitionEvent::Result {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            is_final: true,
        });
    }
}

impl SpeechRecognizer for FakeMic {
    fn start(
        &self,
        options: &RecognitionOptions,
        events: RecognitionSender,
    ) -> concierge_core::Result<()> {
        self.starts.lock().push(options.clone());
        *self.sender.lock() = Some(events);
        Ok(())
    }

    fn stop(&self) {}
}

/// Records everything audible
#[derive(Default)]
pub struct FakeSpeakers {
    pub playing: Mutex<Option<AudioClip>>,
    pub played: Mutex<Vec<AudioClip>>,
    pub spoken: Mutex<Vec<Utterance>>,
    pub local_active: AtomicBool,
}

impl FakeSpeakers {
    /// Number of audio sources currently active
    pub fn active_sources(&self) -> usize {
        usize::from(self.playing.lock().is_some())
            + usize::from(self.local_active.load(Ordering::SeqCst))
    }
}

impl AudioPlayer for FakeSpeakers {
    fn play(&self, clip: AudioClip) -> concierge_core::Result<()> {
        self.played.lock().push(clip.clone());
        *self.playing.lock() = Some(clip);
        Ok(())
    }

    fn stop(&self) {
        *self.playing.lock() = None;
    }
}

impl SpeechSynthesizer for FakeSpeakers {
    fn cancel(&self) {
        self.local_active.store(false, Ordering::SeqCst);
    }

    fn speak(&self, utterance: Utterance) -> concierge_core::Result<()> {
        self.spoken.lock().push(utterance);
        self.local_active.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.session.default_language = Language::English;
    settings
}

pub struct Harness {
    pub concierge: Concierge,
    pub backend: Arc<ScriptedBackend>,
    pub mic: Arc<FakeMic>,
    pub speakers: Arc<FakeSpeakers>,
}

pub fn harness(settings: &Settings) -> Harness {
    let backend = ScriptedBackend::new();
    let mic = Arc::new(FakeMic::default());
    let speakers = Arc::new(FakeSpeakers::default());
    let platform = Platform {
        recognizer: Some(mic.clone()),
        synthesizer: speakers.clone(),
        player: speakers.clone(),
    };
    let concierge = Concierge::new(settings, backend.clone(), platform).unwrap();
    Harness {
        concierge,
        backend,
        mic,
        speakers,
    }
}
