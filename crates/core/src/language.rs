//! Language definitions and script-range detection
//!
//! The concierge speaks the languages its guests most often use. Detection is
//! driven by an ordered table of character ranges rather than code, so the
//! table can be adjusted from configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported spoken languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    #[default]
    Japanese,
    English,
    Korean,
    Chinese,
    Spanish,
    Portuguese,
}

impl Language {
    /// BCP-47 tag used for recognition, synthesis and the backend
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Japanese => "ja-JP",
            Self::English => "en-US",
            Self::Korean => "ko-KR",
            Self::Chinese => "zh-CN",
            Self::Spanish => "es-ES",
            Self::Portuguese => "pt-BR",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Japanese => "Japanese",
            Self::English => "English",
            Self::Korean => "Korean",
            Self::Chinese => "Chinese",
            Self::Spanish => "Spanish",
            Self::Portuguese => "Portuguese",
        }
    }

    /// Parse from a tag, primary subtag or name (case-insensitive)
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let primary = s.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "ja" | "jpn" | "japanese" => Some(Self::Japanese),
            "en" | "eng" | "english" => Some(Self::English),
            "ko" | "kor" | "korean" => Some(Self::Korean),
            "zh" | "cmn" | "chinese" => Some(Self::Chinese),
            "es" | "spa" | "spanish" => Some(Self::Spanish),
            "pt" | "por" | "portuguese" => Some(Self::Portuguese),
            _ => None,
        }
    }

    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[
            Self::Japanese,
            Self::English,
            Self::Korean,
            Self::Chinese,
            Self::Spanish,
            Self::Portuguese,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s)
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown language: {}", s)))
    }
}

impl TryFrom<String> for Language {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.tag().to_string()
    }
}

/// Inclusive character range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharRange {
    pub start: char,
    pub end: char,
}

impl CharRange {
    pub const fn new(start: char, end: char) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, c: char) -> bool {
        (self.start..=self.end).contains(&c)
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

/// A language claimed by any character inside one of its ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRule {
    pub language: Language,
    pub ranges: Vec<CharRange>,
}

impl ScriptRule {
    pub fn matches(&self, text: &str) -> bool {
        text.chars()
            .any(|c| self.ranges.iter().any(|range| range.contains(c)))
    }

    /// Default table: kana, then Hangul, then CJK ideographs.
    ///
    /// Order matters. Kanji-heavy Japanese still contains kana, so it is
    /// claimed before the ideograph rule is consulted.
    pub fn defaults() -> Vec<ScriptRule> {
        vec![
            ScriptRule {
                language: Language::Japanese,
                ranges: vec![
                    CharRange::new('\u{3040}', '\u{309F}'),
                    CharRange::new('\u{30A0}', '\u{30FF}'),
                ],
            },
            ScriptRule {
                language: Language::Korean,
                ranges: vec![
                    CharRange::new('\u{AC00}', '\u{D7AF}'),
                    CharRange::new('\u{1100}', '\u{11FF}'),
                    CharRange::new('\u{3130}', '\u{318F}'),
                ],
            },
            ScriptRule {
                language: Language::Chinese,
                ranges: vec![CharRange::new('\u{4E00}', '\u{9FFF}')],
            },
        ]
    }
}

/// Resolves the language a reply should be spoken in
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    rules: Vec<ScriptRule>,
    fallback_languages: Vec<Language>,
    default_language: Language,
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new(
            ScriptRule::defaults(),
            vec![Language::Spanish, Language::Portuguese],
            Language::English,
        )
    }
}

impl LanguageDetector {
    pub fn new(
        rules: Vec<ScriptRule>,
        fallback_languages: Vec<Language>,
        default_language: Language,
    ) -> Self {
        Self {
            rules,
            fallback_languages,
            default_language,
        }
    }

    /// Detect the language of `text`.
    ///
    /// The first script rule with a matching character wins. Otherwise the
    /// guest's `selected` language is used when it is one of the fallback
    /// languages (Latin-script languages the ranges cannot tell apart), and
    /// the default language after that.
    pub fn detect(&self, text: &str, selected: Language) -> Language {
        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(text)) {
            return rule.language;
        }
        if self.fallback_languages.contains(&selected) {
            return selected;
        }
        self.default_language
    }

    pub fn rules(&self) -> &[ScriptRule] {
        &self.rules
    }
}
