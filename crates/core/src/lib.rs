//! Core traits and types for the restaurant concierge
//!
//! This crate provides foundational types used across all other crates:
//! - Message log with the synthetic welcome message
//! - Menu items, availability and staff menu rows
//! - Language definitions and script-range detection
//! - Drink keyword counting for the energy context
//! - Platform speech traits (recognition, synthesis, playback)
//! - Error types

pub mod energy;
pub mod error;
pub mod language;
pub mod menu;
pub mod message;
pub mod text;
pub mod traits;

pub use energy::{DrinkKeywords, EnergyContext, DEFAULT_DRINK_KEYWORDS};
pub use error::{Error, Result};
pub use language::{CharRange, Language, LanguageDetector, ScriptRule};
pub use menu::{
    group_by_category, AvailabilityEntry, AvailabilitySet, MenuItem, StaffMenuItem,
    UNCATEGORIZED,
};
pub use message::{HistoryEntry, Message, MessageId, MessageLog, Role};
pub use text::clean_for_speech;

pub use traits::{
    AudioClip, AudioPlayer, RecognitionEvent, RecognitionOptions, RecognitionSender,
    SpeechRecognizer, SpeechSynthesizer, Utterance,
};
