use serde::{Deserialize, Serialize};

/// Field labels used on the wire, both in model output and in responses
pub mod wire {
    pub const TOKEN: &str = "kanji";
    pub const TRANSLITERATION: &str = "romaji";
    pub const GLOSS: &str = "english";
    pub const PARTS: &str = "parts";

    pub const PART_UNIT: &str = "kanji";
    pub const PART_READINGS: &str = "romaji";
}

/// A minimal orthographic unit and its possible readings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabPart {
    #[serde(rename = "kanji")]
    pub unit: String,
    #[serde(rename = "romaji")]
    pub readings: Vec<String>,
}

impl VocabPart {
    pub fn new(unit: impl Into<String>, readings: &[&str]) -> Self {
        Self {
            unit: unit.into(),
            readings: readings.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// One vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabItem {
    #[serde(rename = "kanji")]
    pub token: String,
    #[serde(rename = "romaji")]
    pub transliteration: String,
    #[serde(rename = "english")]
    pub gloss: String,
    pub parts: Vec<VocabPart>,
}

impl VocabItem {
    /// Concatenation of every part's unit, in order
    pub fn joined_units(&self) -> String {
        self.parts.iter().map(|p| p.unit.as_str()).collect()
    }
}

/// Entries in the order the model returned them
pub type VocabList = Vec<VocabItem>;

/// Body accepted at the request boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Vocabulary { vocabulary: VocabList },
    Error { error: String },
}

/// Status code plus JSON body, as handed to whatever transport serves it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn ok(vocabulary: VocabList) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Vocabulary { vocabulary },
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Error {
                error: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// One raw input line from the request source
    Request { id: u64, line: String },
    Response { id: u64, response: ApiResponse },
    InputClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sushi() -> VocabItem {
        VocabItem {
            token: "寿司".to_string(),
            transliteration: "sushi".to_string(),
            gloss: "sushi".to_string(),
            parts: vec![VocabPart::new("寿司", &["sushi"])],
        }
    }

    #[test]
    fn test_item_uses_wire_names() {
        let value = serde_json::to_value(sushi()).unwrap();
        assert_eq!(value[wire::TOKEN], "寿司");
        assert_eq!(value[wire::TRANSLITERATION], "sushi");
        assert_eq!(value[wire::GLOSS], "sushi");
        assert_eq!(value[wire::PARTS][0][wire::PART_UNIT], "寿司");
        assert_eq!(value[wire::PARTS][0][wire::PART_READINGS][0], "sushi");
        assert!(value.get("token").is_none());
    }

    #[test]
    fn test_joined_units() {
        let item = VocabItem {
            token: "良い".to_string(),
            transliteration: "yoi".to_string(),
            gloss: "good".to_string(),
            parts: vec![VocabPart::new("良", &["yo"]), VocabPart::new("い", &["i"])],
        };
        assert_eq!(item.joined_units(), "良い");
    }

    #[test]
    fn test_response_flattens_body() {
        let ok = serde_json::to_value(ApiResponse::ok(vec![sushi()])).unwrap();
        assert_eq!(ok["status"], 200);
        assert_eq!(ok["vocabulary"][0]["kanji"], "寿司");

        let err = serde_json::to_value(ApiResponse::error(422, "nope")).unwrap();
        assert_eq!(err["status"], 422);
        assert_eq!(err["error"], "nope");
        assert!(err.get("vocabulary").is_none());
    }
}
