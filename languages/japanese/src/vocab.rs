use tango_core::language::VocabLanguage;
use tango_types::{VocabItem, VocabPart};
use unicode_normalization::UnicodeNormalization;

/// Japanese vocabulary profile: kanji/kana tokens with romaji readings
#[derive(Debug, Clone, Copy, Default)]
pub struct JapaneseVocab;

impl JapaneseVocab {
    pub fn new() -> Self {
        Self
    }
}

impl VocabLanguage for JapaneseVocab {
    fn language_code(&self) -> &str {
        "ja"
    }

    fn language_name(&self) -> &str {
        "Japanese"
    }

    fn system_instruction(&self) -> String {
        "You are a helpful assistant that generates Japanese vocabulary lists in JSON format. \
         You always answer with a single JSON array and nothing else."
            .to_string()
    }

    fn examples(&self) -> Vec<VocabItem> {
        vec![
            item("犬", "inu", "dog", vec![VocabPart::new("犬", &["inu", "ken"])]),
            item(
                "いい",
                "ii",
                "good",
                vec![VocabPart::new("い", &["i"]), VocabPart::new("い", &["i"])],
            ),
            item(
                "良い",
                "yoi",
                "good",
                vec![VocabPart::new("良", &["yo"]), VocabPart::new("い", &["i"])],
            ),
        ]
    }

    /// NFKC, with line breaks and other non-space whitespace removed
    fn normalize(&self, text: &str) -> String {
        text.nfkc()
            .collect::<String>()
            .chars()
            .filter(|c| !c.is_whitespace() || *c == ' ')
            .collect()
    }
}

fn item(token: &str, transliteration: &str, gloss: &str, parts: Vec<VocabPart>) -> VocabItem {
    VocabItem {
        token: token.to_string(),
        transliteration: transliteration.to_string(),
        gloss: gloss.to_string(),
        parts,
    }
}
