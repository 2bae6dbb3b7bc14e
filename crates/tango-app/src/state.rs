use std::sync::Arc;

use tango_completion::ChatCompletionClient;
use tango_config::Config;
use tango_config::completion::API_KEY_VAR;
use tango_core::{GenerationService, PromptBuilder};
use tango_lang_japanese::JapaneseVocab;

pub struct AppState {
    pub config: Config,
    pub service: GenerationService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        if config.completion.api_key.is_empty() {
            tracing::warn!("{API_KEY_VAR} is not set, every completion call will fail");
        }

        let client = Arc::new(ChatCompletionClient::from_config(&config.completion));
        let prompt = PromptBuilder::new(Arc::new(JapaneseVocab::new()), config.completion.model.clone())
            .with_temperature(config.completion.temperature)
            .with_max_tokens(config.completion.max_tokens);
        let service = GenerationService::new(client, prompt).with_deadline(config.completion.timeout());

        Self::with_service(config, service)
    }

    pub fn with_service(config: Config, service: GenerationService) -> Self {
        Self { config, service }
    }
}
