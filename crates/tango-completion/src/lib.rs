use std::time::Duration;

use serde::{Deserialize, Serialize};

mod chat;

pub use chat::ChatCompletionClient;

/// Chat-completion provider interface
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one completion request, no retries
    async fn complete(&self, request: &CompletionRequest)
    -> Result<CompletionResponse, CompletionError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request body for an OpenAI-compatible chat-completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Content of the first message with the given role
    pub fn content_of(&self, role: Role) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
    }
}

/// Response body; everything but `choices[].message.content` is informational
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl CompletionResponse {
    /// Content of the first choice, `None` when absent or empty
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|content| !content.is_empty())
    }

    /// Response carrying a single assistant message
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            id: None,
            model: None,
            choices: vec![Choice {
                index: 0,
                message: ChoiceMessage {
                    role: Some("assistant".to_string()),
                    content: Some(content.into()),
                },
                finish_reason: Some("stop".to_string()),
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("API error: HTTP {status}")]
    ApiError { status: u16 },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError { status: Option<u16> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl CompletionError {
    /// Upstream HTTP status, when the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status } => Some(*status),
            Self::RateLimitExceeded => Some(429),
            Self::AuthenticationError { status } => *status,
            Self::NetworkError(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidResponse(_) | Self::Timeout(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::NetworkError(e) => e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_openai_shape() {
        let request = CompletionRequest {
            model: "llama3-70b-8192".to_string(),
            messages: vec![Message::system("sys"), Message::user("hi")],
            temperature: 0.5,
            max_tokens: 2000,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama3-70b-8192");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["max_tokens"], 2000);
    }

    #[test]
    fn test_first_content_absent_cases() {
        let no_choices: CompletionResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(no_choices.first_content(), None);

        let null_content: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
                .unwrap();
        assert_eq!(null_content.first_content(), None);

        let empty_content = CompletionResponse::with_content("");
        assert_eq!(empty_content.first_content(), None);
    }

    #[test]
    fn test_first_content_takes_first_choice() {
        let response: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"content":"[]"}},{"index":1,"message":{"content":"other"}}],"usage":{"total_tokens":3}}"#,
        )
        .unwrap();
        assert_eq!(response.first_content(), Some("[]"));
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(CompletionError::RateLimitExceeded.status(), Some(429));
        assert_eq!(CompletionError::ApiError { status: 503 }.status(), Some(503));
        assert_eq!(
            CompletionError::AuthenticationError { status: None }.status(),
            None
        );
        assert!(CompletionError::Timeout(Duration::from_secs(1)).is_timeout());
        assert!(!CompletionError::RateLimitExceeded.is_timeout());
    }
}
