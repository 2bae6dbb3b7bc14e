use std::sync::Arc;
use std::time::Duration;

use tango_completion::{CompletionClient, CompletionError};
use tango_types::VocabList;
use tokio::time::timeout;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::prompt::PromptBuilder;
use crate::validate::{ValidationError, observe, validate};

/// Stand-in for a completion that carried no content
pub const EMPTY_COMPLETION: &str = "[]";

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// Theme in, validated vocabulary out. Holds no per-request state
#[derive(Clone)]
pub struct GenerationService {
    client: Arc<dyn CompletionClient>,
    prompt: PromptBuilder,
    deadline: Duration,
}

impl GenerationService {
    pub fn new(client: Arc<dyn CompletionClient>, prompt: PromptBuilder) -> Self {
        Self {
            client,
            prompt,
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Upper bound for the single outbound call
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub async fn generate(&self, theme: &str) -> Result<VocabList, GenerationError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("generate", %request_id, theme);

        self.run(theme).instrument(span).await
    }

    async fn run(&self, theme: &str) -> Result<VocabList, GenerationError> {
        if theme.trim().is_empty() {
            tracing::warn!(kind = "empty_input", "Rejected blank theme");
            return Err(GenerationError::EmptyInput);
        }

        let request = self.prompt.build(theme);
        tracing::debug!(
            "Requesting completion from {} with model {}",
            self.client.metadata().name,
            request.model
        );

        let response = match timeout(self.deadline, self.client.complete(&request)).await {
            Ok(result) => result,
            Err(_) => Err(CompletionError::Timeout(self.deadline)),
        }
        .map_err(|e| {
            tracing::error!(
                kind = "upstream_error",
                status = ?e.status(),
                "Completion call failed: {}",
                e
            );
            GenerationError::UpstreamError(e)
        })?;

        let raw = response.first_content().unwrap_or_else(|| {
            tracing::debug!("Completion had no content, treating as empty list");
            EMPTY_COMPLETION
        });

        let list = validate(raw).map_err(|e| {
            match &e {
                ValidationError::NotParseable { .. } => {
                    tracing::warn!(kind = e.kind(), raw, "Rejected model output: {}", e)
                }
                _ => {
                    tracing::warn!(kind = e.kind(), "Rejected model output: {}", e);
                    tracing::debug!(raw, "Rejected completion text");
                }
            }
            GenerationError::MalformedOutput(e)
        })?;

        let notes = observe(&list, self.prompt.language());
        if !notes.is_clean() {
            tracing::debug!(
                duplicate_tokens = notes.duplicate_tokens,
                unreconstructed = ?notes.unreconstructed,
                "Output accepted with observations"
            );
        }

        tracing::info!("Generated {} vocabulary entries", list.len());
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tango_completion::{CompletionRequest, CompletionResponse, ProviderMetadata, Role};

    use super::*;
    use crate::test_support::builder;

    enum Script {
        Reply(&'static str),
        NoContent,
        Status(u16),
        Hang,
    }

    struct FakeClient {
        script: Script,
        calls: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl FakeClient {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());

            match &self.script {
                Script::Reply(text) => Ok(CompletionResponse::with_content(*text)),
                Script::NoContent => Ok(CompletionResponse::default()),
                Script::Status(429) => Err(CompletionError::RateLimitExceeded),
                Script::Status(status) => Err(CompletionError::ApiError { status: *status }),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(CompletionResponse::default())
                }
            }
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "fake".to_string(),
                requires_api_key: false,
            }
        }
    }

    const SUSHI: &str = r#"[{"kanji":"寿司","romaji":"sushi","english":"sushi","parts":[{"kanji":"寿司","romaji":["sushi"]}]}]"#;

    #[tokio::test]
    async fn test_single_item_from_upstream() {
        let client = FakeClient::new(Script::Reply(SUSHI));
        let service = GenerationService::new(client.clone(), builder());

        let list = service.generate("food").await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].token, "寿司");
        assert_eq!(client.calls(), 1);

        let sent = client.last_request.lock().unwrap().clone().unwrap();
        assert!(sent.content_of(Role::User).unwrap().contains("food"));
    }

    #[tokio::test]
    async fn test_prose_wrapped_json_rejected() {
        let client = FakeClient::new(Script::Reply(
            r#"Sure! Here you go: [{"kanji":"寿司","romaji":"sushi","english":"sushi","parts":[]}]"#,
        ));
        let service = GenerationService::new(client.clone(), builder());

        let err = service.generate("food").await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MalformedOutput(ValidationError::NotParseable { .. })
        ));
        assert_eq!(err.status_code(), 422);
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_rate_limit_is_upstream_error() {
        let client = FakeClient::new(Script::Status(429));
        let service = GenerationService::new(client.clone(), builder());

        let err = service.generate("food").await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UpstreamError(CompletionError::RateLimitExceeded)
        ));
        assert_eq!(err.upstream_status(), Some(429));
        assert_eq!(err.status_code(), 502);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_theme_makes_no_call() {
        let client = FakeClient::new(Script::Reply(SUSHI));
        let service = GenerationService::new(client.clone(), builder());

        for theme in ["", "   ", "\t\n"] {
            let err = service.generate(theme).await.unwrap_err();
            assert!(matches!(err, GenerationError::EmptyInput));
        }
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_array_is_success() {
        let client = FakeClient::new(Script::Reply("[]"));
        let service = GenerationService::new(client, builder());

        assert!(service.generate("food").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_list() {
        let client = FakeClient::new(Script::NoContent);
        let service = GenerationService::new(client, builder());

        assert!(service.generate("food").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hung_upstream_hits_deadline() {
        let client = FakeClient::new(Script::Hang);
        let service =
            GenerationService::new(client.clone(), builder()).with_deadline(Duration::from_millis(50));

        let err = tokio::time::timeout(Duration::from_secs(5), service.generate("food"))
            .await
            .expect("deadline was not enforced")
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UpstreamError(CompletionError::Timeout(_))
        ));
        assert_eq!(err.status_code(), 504);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_no_post_processing() {
        let raw = r#"[
            {"kanji":"犬","romaji":"inu","english":" dog ","parts":[{"kanji":"犬","romaji":["inu"]}]},
            {"kanji":"犬","romaji":"inu","english":" dog ","parts":[{"kanji":"犬","romaji":["inu"]}]},
            {"kanji":"猫","romaji":"neko","english":"cat","parts":[{"kanji":"猫","romaji":["neko"]}]}
        ]"#;
        let client = FakeClient::new(Script::Reply(raw));
        let service = GenerationService::new(client, builder());

        let list = service.generate("animals").await.unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0], list[1]);
        assert_eq!(list[0].gloss, " dog ");
        assert_eq!(list[2].token, "猫");
    }

    #[tokio::test]
    async fn test_invalid_item_surfaces_detail() {
        let client = FakeClient::new(Script::Reply(
            r#"[{"kanji":"寿司","romaji":"sushi","english":"sushi"}]"#,
        ));
        let service = GenerationService::new(client, builder());

        let err = service.generate("food").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "model output rejected: item 0: `parts` is missing"
        );
    }
}
