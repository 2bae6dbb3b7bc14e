pub mod error;
pub mod language;
pub mod prompt;
pub mod response;
pub mod service;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::GenerationError;
pub use language::VocabLanguage;
pub use prompt::PromptBuilder;
pub use response::{handle_request, respond};
pub use service::GenerationService;
pub use validate::{Observations, ShapeProblem, ValidationError, observe, validate};
