use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tango_config::Config;
use tango_config::completion::API_KEY_VAR;

/// Named config, as written by hand or exported from another setup
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Config from a file when given, from the environment otherwise
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("Loading config from environment");
        return Ok(Config::new());
    };

    let mut config = load_config_file(path)?;

    // Keep secrets out of config files when possible
    if config.completion.api_key.is_empty() {
        config.completion.api_key = env::var(API_KEY_VAR).unwrap_or_default();
    }

    Ok(config)
}

/// Accepts either a profile (`{"name", "value"}`) or a bare config object
pub fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("Failed to open config file {}", path.display()))?;
    let raw: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    // A `value` key marks a profile
    if raw.get("value").is_some() {
        let profile: Profile = serde_json::from_value(raw)
            .with_context(|| format!("Invalid profile in config file {}", path.display()))?;
        tracing::info!("Using profile {}", profile.name);
        return Ok(profile.value);
    }

    serde_json::from_value(raw)
        .with_context(|| format!("Invalid config in config file {}", path.display()))
}
