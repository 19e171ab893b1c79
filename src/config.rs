// src/config.rs
//! Runtime configuration for the relay.
//!
//! Resolution order: an optional TOML file ($RELAY_CONFIG_PATH, falling back
//! to config/relay.toml) supplies defaults; environment variables override
//! individual values. `.env` loading happens in the entrypoint.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::notify::DispatchMode;
use crate::payload::AssembleOptions;

pub const ENV_CONFIG_PATH: &str = "RELAY_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config/relay.toml";

const ENV_ENVIRONMENT: &str = "RELAY_ENV";
const ENV_WEBHOOK: &str = "SLACK_WEBHOOK";
const ENV_MIN_PRIORITY: &str = "RELAY_MIN_PRIORITY";
const ENV_ALERT_PRIORITY: &str = "RELAY_ALERT_PRIORITY";
const ENV_DEBUG_PAYLOAD: &str = "RELAY_DEBUG_PAYLOAD";

/// Deployment environment; only `Production` delivers to the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Testing,
}

impl Environment {
    fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Testing
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayConfig {
    pub environment: Environment,
    pub slack_webhook: Option<String>,
    /// Minimum-priority filter threshold; `None` disables filtering.
    pub min_priority: Option<i32>,
    /// `@channel` pretext threshold; `None` disables the alert pretext.
    pub alert_priority: Option<i32>,
    /// Log the assembled payload before dispatch.
    pub debug_payload: bool,
}

/// On-disk shape of config/relay.toml; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    environment: Option<String>,
    slack_webhook: Option<String>,
    min_priority: Option<i32>,
    alert_priority: Option<i32>,
    debug_payload: Option<bool>,
}

impl RelayConfig {
    /// Load from the optional config file with env-var overrides.
    pub fn load() -> Result<Self> {
        let file = load_file_config()?;
        Ok(Self::from_sources(file, |key| std::env::var(key).ok()))
    }

    fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let environment = env(ENV_ENVIRONMENT)
            .or(file.environment)
            .map(|s| Environment::parse(&s))
            .unwrap_or_default();
        let slack_webhook = env(ENV_WEBHOOK)
            .or(file.slack_webhook)
            .filter(|s| !s.trim().is_empty());
        let min_priority = env(ENV_MIN_PRIORITY)
            .and_then(|s| s.trim().parse().ok())
            .or(file.min_priority);
        let alert_priority = env(ENV_ALERT_PRIORITY)
            .and_then(|s| s.trim().parse().ok())
            .or(file.alert_priority);
        let debug_payload = env(ENV_DEBUG_PAYLOAD)
            .map(|s| matches!(s.trim(), "1" | "true" | "yes"))
            .or(file.debug_payload)
            .unwrap_or(false);

        Self {
            environment,
            slack_webhook,
            min_priority,
            alert_priority,
            debug_payload,
        }
    }

    /// Delivery only happens in production with a webhook configured; every
    /// other combination returns the payload to the caller.
    pub fn dispatch_mode(&self) -> DispatchMode {
        match (self.environment, &self.slack_webhook) {
            (Environment::Production, Some(_)) => DispatchMode::Deliver,
            _ => DispatchMode::Return,
        }
    }

    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            min_priority: self.min_priority,
            alert_priority: self.alert_priority,
        }
    }
}

/// Load the file layer: $RELAY_CONFIG_PATH must exist when set; otherwise
/// config/relay.toml is used when present, else empty defaults.
fn load_file_config() -> Result<FileConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return parse_file(&pb);
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default.exists() {
        return parse_file(&default);
    }
    Ok(FileConfig::default())
}

fn parse_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading relay config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
