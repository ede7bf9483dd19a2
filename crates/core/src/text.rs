//! Text preparation for speech output

use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:https?://|www\.)\S+").unwrap());

/// Strip URL-like substrings and collapse whitespace.
///
/// Returns an empty string when nothing speakable remains.
pub fn clean_for_speech(text: &str) -> String {
    let stripped = URL_PATTERN.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
