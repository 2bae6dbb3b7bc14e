use tango_types::VocabItem;

/// Per-language prompt wording and calibration data
pub trait VocabLanguage: Send + Sync {
    /// Language identifier (ISO 639-1 code: "ja", "zh", "ko", etc.)
    fn language_code(&self) -> &str;

    /// English name used inside prompt text
    fn language_name(&self) -> &str;

    /// System message establishing the assistant's role
    fn system_instruction(&self) -> String;

    /// Worked examples embedded in the prompt, at least one single-unit
    /// and one multi-unit token
    fn examples(&self) -> Vec<VocabItem>;

    /// Normalization used when comparing joined parts against a token
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }
}
