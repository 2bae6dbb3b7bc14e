use serde::{Deserialize, Serialize};

use self::completion::CompletionConfig;
use self::serve::ServeConfig;

pub mod completion;
pub mod serve;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub completion: CompletionConfig,
    pub serve: ServeConfig,
}

impl Config {
    /// Build from environment variables, falling back to defaults
    pub fn new() -> Self {
        Config {
            completion: CompletionConfig::new(),
            serve: ServeConfig::new(),
        }
    }
}
