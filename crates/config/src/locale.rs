//! Localized in-chat copy
//!
//! Every user-visible failure is a conversational message. The fixed texts
//! are kept here, one bundle per language, with English as the fallback.

use concierge_core::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed texts for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleStrings {
    /// Synthetic first message of a concierge session
    pub welcome: String,
    /// Shown when the backend answers 429
    pub rate_limited: String,
    /// Shown for any other chat failure
    pub generic_error: String,
    /// First message of a training session (the roleplay customer)
    pub training_welcome: String,
    /// Shown when a training exchange fails
    pub training_error: String,
}

impl Default for LocaleStrings {
    fn default() -> Self {
        Self::english()
    }
}

impl LocaleStrings {
    fn with(welcome: &str, rate_limited: &str, generic_error: &str) -> Self {
        Self {
            welcome: welcome.to_string(),
            rate_limited: rate_limited.to_string(),
            generic_error: generic_error.to_string(),
            // Training is English practice for staff regardless of UI language
            training_welcome:
                "Hi there! I just walked in, this place looks really cool. Is this an izakaya?"
                    .to_string(),
            training_error: "Sorry, something went wrong. Let's try again.".to_string(),
        }
    }

    pub fn english() -> Self {
        Self::with(
            "Welcome! Thank you for visiting us today.\nFeel free to ask me anything about the menu.",
            "Thank you so much for chatting with us today! Please ask our staff if there is anything else we can do.",
            "Sorry, something went wrong. Please call a member of our staff.",
        )
    }

    pub fn japanese() -> Self {
        Self::with(
            "いらっしゃいませ。本日はご来店ありがとうございます。\nメニューについて何でもお気軽にお聞きください。",
            "たくさんのご質問ありがとうございました。この続きはお近くのスタッフへお気軽にお声がけください。",
            "申し訳ございません、接続エラーが発生しました。お手数ですがスタッフをお呼びください。",
        )
    }

    fn korean() -> Self {
        Self::with(
            "어서 오세요. 오늘 방문해 주셔서 감사합니다.\n메뉴에 대해 무엇이든 편하게 물어보세요.",
            "많은 질문 감사합니다. 더 필요하신 것은 가까운 직원에게 말씀해 주세요.",
            "죄송합니다. 오류가 발생했습니다. 직원을 불러 주세요.",
        )
    }

    fn chinese() -> Self {
        Self::with(
            "欢迎光临。感谢您今天的到来。\n关于菜单有任何问题，请随时问我。",
            "感谢您的提问。如需其他帮助，请联系附近的店员。",
            "抱歉，出现了错误。请呼叫店员。",
        )
    }

    fn spanish() -> Self {
        Self::with(
            "¡Bienvenido! Gracias por visitarnos hoy.\nPregúntame lo que quieras sobre el menú.",
            "¡Muchas gracias por conversar con nosotros! Si necesitas algo más, pregunta a nuestro personal.",
            "Lo sentimos, algo salió mal. Por favor llama a un miembro del personal.",
        )
    }

    fn portuguese() -> Self {
        Self::with(
            "Bem-vindo! Obrigado pela visita hoje.\nPergunte o que quiser sobre o cardápio.",
            "Muito obrigado pela conversa! Se precisar de mais alguma coisa, chame nossa equipe.",
            "Desculpe, algo deu errado. Por favor chame alguém da nossa equipe.",
        )
    }
}

/// Per-language string bundles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleBundle(HashMap<Language, LocaleStrings>);

impl Default for LocaleBundle {
    fn default() -> Self {
        let mut bundles = HashMap::new();
        bundles.insert(Language::Japanese, LocaleStrings::japanese());
        bundles.insert(Language::English, LocaleStrings::english());
        bundles.insert(Language::Korean, LocaleStrings::korean());
        bundles.insert(Language::Chinese, LocaleStrings::chinese());
        bundles.insert(Language::Spanish, LocaleStrings::spanish());
        bundles.insert(Language::Portuguese, LocaleStrings::portuguese());
        Self(bundles)
    }
}

impl LocaleBundle {
    pub fn new(bundles: HashMap<Language, LocaleStrings>) -> Self {
        Self(bundles)
    }

    /// Strings for `lang`, falling back to English
    pub fn strings_for(&self, lang: Language) -> LocaleStrings {
        self.0
            .get(&lang)
            .or_else(|| self.0.get(&Language::English))
            .cloned()
            .unwrap_or_default()
    }

    pub fn has(&self, lang: Language) -> bool {
        self.0.contains_key(&lang)
    }

    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.0.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bundle_covers_all_languages() {
        let bundle = LocaleBundle::default();
        for lang in Language::all() {
            assert!(bundle.has(*lang), "missing {}", lang);
        }
    }

    #[test]
    fn test_fallback_to_english() {
        let mut map = HashMap::new();
        map.insert(Language::English, LocaleStrings::english());
        let bundle = LocaleBundle::new(map);

        let strings = bundle.strings_for(Language::Korean);
        assert_eq!(strings, LocaleStrings::english());
    }

    #[test]
    fn test_japanese_welcome() {
        let bundle = LocaleBundle::default();
        assert!(bundle
            .strings_for(Language::Japanese)
            .welcome
            .starts_with("いらっしゃいませ"));
    }

    #[test]
    fn test_partial_override_keeps_english_defaults() {
        let json = r#"{"es-ES": {"welcome": "Hola"}}"#;
        let bundle: LocaleBundle = serde_json::from_str(json).unwrap();
        let strings = bundle.strings_for(Language::Spanish);
        assert_eq!(strings.welcome, "Hola");
        assert_eq!(strings.generic_error, LocaleStrings::english().generic_error);
    }
}
