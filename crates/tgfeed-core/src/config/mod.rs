mod defaults;


use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::error::TgfeedError;
use crate::offset::BotId;
use defaults::*;

/// Top-level tgfeed configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub platform: PlatformConfig,
    /// Bots to poll. Each entry gets its own offset sequence.
    #[serde(default)]
    pub bots: Vec<BotConfig>,
}

/// Platform endpoint and polling behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Long-poll hold in seconds. The platform blocks up to this long
    /// before answering with an empty batch.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    /// First retry delay after a failed fetch; doubles per failure.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    #[serde(default = "default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,
    /// Capacity of each bot's outbound update queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_timeout_secs: default_poll_timeout(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_cap_ms: default_backoff_cap_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl PlatformConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn backoff_cap(&self) -> Duration {
        Duration::from_millis(self.backoff_cap_ms)
    }
}

/// One bot's registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Unique name; this is the bot's offset identity.
    pub name: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Update kinds to request (e.g. `["message"]`). Empty = platform default.
    #[serde(default)]
    pub allowed_updates: Vec<String>,
}

impl BotConfig {
    pub fn id(&self) -> BotId {
        BotId::new(self.name.as_str())
    }
}

/// Load configuration from a TOML file.
///
/// A missing file yields the defaults (no bots). Misconfigurations that
/// would only surface mid-poll (duplicate bot names, a zero queue
/// capacity) are rejected here so the process fails at startup.
pub fn load(path: &str) -> Result<Config, TgfeedError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| TgfeedError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| TgfeedError::Config(format!("failed to parse config: {}", e)))?;

    if config.platform.queue_capacity == 0 {
        return Err(TgfeedError::Config(
            "queue_capacity must be at least 1".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for bot in &config.bots {
        if !seen.insert(bot.name.as_str()) {
            return Err(TgfeedError::Config(format!(
                "duplicate bot name '{}'",
                bot.name
            )));
        }
    }

    Ok(config)
}
