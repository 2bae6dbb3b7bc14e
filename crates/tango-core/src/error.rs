use tango_completion::CompletionError;

use crate::validate::ValidationError;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a theme";
pub const UPSTREAM_MESSAGE: &str = "Failed to process request";
pub const MALFORMED_MESSAGE: &str = "Failed to generate vocabulary list";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("theme is blank")]
    EmptyInput,

    #[error("completion endpoint failed: {0}")]
    UpstreamError(#[from] CompletionError),

    #[error("model output rejected: {0}")]
    MalformedOutput(#[from] ValidationError),
}

impl GenerationError {
    /// Stable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::UpstreamError(_) => "upstream_error",
            Self::MalformedOutput(e) => e.kind(),
        }
    }

    /// 400 for bad input, 5xx for upstream trouble, 422 for unusable output
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyInput => 400,
            Self::UpstreamError(e) if e.is_timeout() => 504,
            Self::UpstreamError(_) => 502,
            Self::MalformedOutput(_) => 422,
        }
    }

    /// Message safe to show to an end user. Never contains model text
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyInput => EMPTY_INPUT_MESSAGE,
            Self::UpstreamError(_) => UPSTREAM_MESSAGE,
            Self::MalformedOutput(_) => MALFORMED_MESSAGE,
        }
    }

    /// Only upstream failures may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamError(_))
    }

    /// Upstream HTTP status, when there was one
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamError(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::validate::ShapeProblem;

    #[test]
    fn test_status_codes() {
        assert_eq!(GenerationError::EmptyInput.status_code(), 400);
        assert_eq!(
            GenerationError::from(CompletionError::RateLimitExceeded).status_code(),
            502
        );
        assert_eq!(
            GenerationError::from(CompletionError::Timeout(Duration::from_secs(30))).status_code(),
            504
        );
        assert_eq!(
            GenerationError::from(ValidationError::NotAnArray { found: "object" }).status_code(),
            422
        );
    }

    #[test]
    fn test_retryable_only_upstream() {
        assert!(GenerationError::from(CompletionError::ApiError { status: 500 }).is_retryable());
        assert!(!GenerationError::EmptyInput.is_retryable());
        assert!(
            !GenerationError::from(ValidationError::NotParseable {
                reason: "eof".to_string()
            })
            .is_retryable()
        );
    }

    #[test]
    fn test_kind_and_status_detail() {
        let err = GenerationError::from(ValidationError::InvalidItemShape {
            index: 0,
            field: "parts",
            problem: ShapeProblem::Missing,
        });
        assert_eq!(err.kind(), "invalid_item_shape");
        assert_eq!(err.user_message(), MALFORMED_MESSAGE);

        let err = GenerationError::from(CompletionError::RateLimitExceeded);
        assert_eq!(err.upstream_status(), Some(429));
        assert_eq!(err.kind(), "upstream_error");
    }
}
