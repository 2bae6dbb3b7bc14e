use std::sync::Arc;

use tango_types::{VocabItem, VocabPart};

use crate::language::VocabLanguage;
use crate::prompt::PromptBuilder;

pub struct TestLanguage;

impl VocabLanguage for TestLanguage {
    fn language_code(&self) -> &str {
        "ja"
    }

    fn language_name(&self) -> &str {
        "Japanese"
    }

    fn system_instruction(&self) -> String {
        "You generate Japanese vocabulary lists in JSON format.".to_string()
    }

    fn examples(&self) -> Vec<VocabItem> {
        vec![inu(), yoi()]
    }
}

pub fn inu() -> VocabItem {
    VocabItem {
        token: "犬".to_string(),
        transliteration: "inu".to_string(),
        gloss: "dog".to_string(),
        parts: vec![VocabPart::new("犬", &["inu", "ken"])],
    }
}

pub fn yoi() -> VocabItem {
    VocabItem {
        token: "良い".to_string(),
        transliteration: "yoi".to_string(),
        gloss: "good".to_string(),
        parts: vec![VocabPart::new("良", &["yo"]), VocabPart::new("い", &["i"])],
    }
}

pub fn builder() -> PromptBuilder {
    PromptBuilder::new(Arc::new(TestLanguage), "llama3-70b-8192")
}
