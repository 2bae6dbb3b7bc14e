use std::env;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const API_KEY_VAR: &str = "GROQ_API_KEY";

fn default_api_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout_ms() -> u64 {
    30_000
}

/// Upstream chat-completion endpoint settings
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CompletionConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Deadline for one completion call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl CompletionConfig {
    pub fn new() -> Self {
        let api_key = env::var(API_KEY_VAR).unwrap_or_default();

        let api_url = env::var("TANGO_API_URL").unwrap_or_else(|_| default_api_url());

        let model = env::var("TANGO_MODEL").unwrap_or_else(|_| default_model());

        let temperature = env::var("TANGO_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_temperature);

        let max_tokens = env::var("TANGO_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_tokens);

        let timeout_ms = env::var("TANGO_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_ms);

        Self {
            api_key,
            api_url,
            model,
            temperature,
            max_tokens,
            timeout_ms,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// API key with everything but the edges hidden, for logs
    pub fn api_key_masked(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &self.api_key_masked())
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
