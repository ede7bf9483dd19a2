//! Platform traits for pluggable speech backends
//!
//! The concierge never talks to a microphone, a speaker or an on-device
//! synthesizer directly. Front-ends provide implementations of these traits.

pub mod speech;

pub use speech::{
    AudioClip, AudioPlayer, RecognitionEvent, RecognitionOptions, RecognitionSender,
    SpeechRecognizer, SpeechSynthesizer, Utterance,
};
