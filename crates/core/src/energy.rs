//! Energy context sent alongside chat requests
//!
//! The backend scales the "energy" of its replies with how lively the
//! conversation is. The client counts drink mentions itself so no second
//! round trip is needed.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::message::HistoryEntry;
use crate::Result;

/// Default beverage keywords (English + Japanese)
pub const DEFAULT_DRINK_KEYWORDS: &[&str] = &[
    "beer",
    "sake",
    "highball",
    "whisky",
    "whiskey",
    "wine",
    "cocktail",
    "shochu",
    "sour",
    "drink",
    "cheers",
    "kanpai",
    "ビール",
    "日本酒",
    "酒",
    "ハイボール",
    "焼酎",
    "サワー",
    "ワイン",
    "カクテル",
    "乾杯",
    "飲み",
];

/// Derived signals for the chat request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnergyContext {
    pub message_count: usize,
    pub drink_mentions: usize,
}

/// Compiled drink keyword table
#[derive(Debug, Clone)]
pub struct DrinkKeywords {
    pattern: Option<Regex>,
}

impl Default for DrinkKeywords {
    fn default() -> Self {
        // The built-in list is escaped, so compilation cannot fail
        Self::new(DEFAULT_DRINK_KEYWORDS).unwrap_or(Self { pattern: None })
    }
}

impl DrinkKeywords {
    /// Compile a keyword list into one case-insensitive alternation.
    ///
    /// Keywords are matched literally. An empty list never matches.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = Regex::new(&format!("(?i)(?:{})", alternatives.join("|")))?;
        tracing::debug!(keywords = alternatives.len(), "Compiled drink keyword table");
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Count non-overlapping keyword matches in `text`
    pub fn count(&self, text: &str) -> usize {
        self.pattern
            .as_ref()
            .map(|p| p.find_iter(text).count())
            .unwrap_or(0)
    }

    /// Build the energy context for a submission over `history` plus `current`
    pub fn energy_context(&self, history: &[HistoryEntry], current: &str) -> EnergyContext {
        let mut corpus: Vec<&str> = history.iter().map(|h| h.content.as_str()).collect();
        corpus.push(current);
        EnergyContext {
            message_count: history.len(),
            drink_mentions: self.count(&corpus.join(" ")),
        }
    }
}
