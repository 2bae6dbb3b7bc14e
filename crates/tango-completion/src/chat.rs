use async_trait::async_trait;
use reqwest::StatusCode;
use tango_config::completion::CompletionConfig;

use crate::{
    CompletionClient, CompletionError, CompletionRequest, CompletionResponse, ProviderMetadata,
};

/// OpenAI-compatible chat-completion client (Groq by default)
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl ChatCompletionClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url,
        }
    }

    pub fn from_config(config: &CompletionConfig) -> Self {
        Self::new(config.api_key.clone(), config.api_url.clone())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::AuthenticationError { status: None });
        }

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Completion endpoint answered HTTP {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::RateLimitExceeded);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CompletionError::AuthenticationError {
                status: Some(status.as_u16()),
            });
        }

        if !status.is_success() {
            return Err(CompletionError::ApiError {
                status: status.as_u16(),
            });
        }

        response.json::<CompletionResponse>().await.map_err(|e| {
            CompletionError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "openai-compatible".to_string(),
            requires_api_key: true,
        }
    }
}
