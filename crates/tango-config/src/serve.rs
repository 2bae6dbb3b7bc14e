use std::env;

use serde::{Deserialize, Serialize};

fn default_channel_capacity() -> usize {
    64
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServeConfig {
    /// Capacity of the request and response channels in serve mode
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl ServeConfig {
    pub fn new() -> Self {
        let channel_capacity = env::var("TANGO_CHANNEL_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or_else(default_channel_capacity);

        Self { channel_capacity }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}
