//! Content policy tables
//!
//! Drink keywords and the speech language detection table are content
//! decisions rather than logic, so they are configuration.

use concierge_core::{DrinkKeywords, Language, LanguageDetector, ScriptRule, DEFAULT_DRINK_KEYWORDS};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPolicy {
    /// Beverage keywords counted for the energy context
    pub drink_keywords: Vec<String>,
    /// Ordered character-range table; first match wins
    pub script_rules: Vec<ScriptRule>,
    /// Selected languages honoured when no script rule matches
    pub fallback_languages: Vec<Language>,
    /// Speech language when nothing else applies
    pub speech_default_language: Language,
}

impl Default for ContentPolicy {
    fn default() -> Self {
        Self {
            drink_keywords: DEFAULT_DRINK_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            script_rules: ScriptRule::defaults(),
            fallback_languages: vec![Language::Spanish, Language::Portuguese],
            speech_default_language: Language::English,
        }
    }
}

impl ContentPolicy {
    pub fn language_detector(&self) -> LanguageDetector {
        LanguageDetector::new(
            self.script_rules.clone(),
            self.fallback_languages.clone(),
            self.speech_default_language,
        )
    }

    pub fn drink_keywords(&self) -> Result<DrinkKeywords, ConfigError> {
        DrinkKeywords::new(&self.drink_keywords)
            .map_err(|e| ConfigError::invalid("content.drink_keywords", e.to_string()))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.drink_keywords()?;

        for (i, rule) in self.script_rules.iter().enumerate() {
            if rule.ranges.is_empty() {
                return Err(ConfigError::invalid(
                    &format!("content.script_rules[{}]", i),
                    "rule has no character ranges",
                ));
            }
            if let Some(range) = rule.ranges.iter().find(|r| !r.is_valid()) {
                return Err(ConfigError::invalid(
                    &format!("content.script_rules[{}]", i),
                    format!(
                        "range start U+{:04X} is after end U+{:04X}",
                        range.start as u32, range.end as u32
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::CharRange;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = ContentPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.drink_keywords().unwrap().count("beer"), 1);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let mut policy = ContentPolicy::default();
        policy.script_rules.push(ScriptRule {
            language: Language::Korean,
            ranges: vec![CharRange::new('z', 'a')],
        });
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_empty_rule_rejected() {
        let mut policy = ContentPolicy::default();
        policy.script_rules = vec![ScriptRule {
            language: Language::Chinese,
            ranges: vec![],
        }];
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_detector_uses_policy_tables() {
        let policy = ContentPolicy {
            fallback_languages: vec![],
            ..Default::default()
        };
        let detector = policy.language_detector();
        assert_eq!(
            detector.detect("Hola", Language::Spanish),
            Language::English
        );
    }
}
