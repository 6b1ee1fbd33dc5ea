use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use hud_redact::{Anchor, DetectionPolicy, PolicyError};

/// Simple configuration for hud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_active_window_secs")]
    pub active_window_secs: u64,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub transcript: TranscriptConfig,

    #[serde(default)]
    pub redaction: RedactionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway base directory. Defaults to `~/.gateway`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    #[serde(default = "default_transcript_limit")]
    pub default_limit: usize,

    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    #[serde(default = "default_max_content_len")]
    pub max_content_len: usize,
}

/// Extra detection entries layered over the built-in tables. There is
/// deliberately no switch to turn redaction off.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactionConfig {
    #[serde(default)]
    pub custom_keys: Vec<String>,

    #[serde(default)]
    pub custom_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_window_secs: default_active_window_secs(),
            gateway: GatewayConfig::default(),
            transcript: TranscriptConfig::default(),
            redaction: RedactionConfig::default(),
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            default_limit: default_transcript_limit(),
            max_limit: default_max_limit(),
            max_content_len: default_max_content_len(),
        }
    }
}

fn default_active_window_secs() -> u64 {
    1800
}

fn default_transcript_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    50
}

fn default_max_content_len() -> usize {
    200
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "hud", "hud") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.hud/config.toml")
        }
    }

    /// Gateway base directory: the configured value, or `~/.gateway`.
    pub fn gateway_base(&self) -> PathBuf {
        if let Some(base) = &self.gateway.base {
            base.clone()
        } else if let Some(dirs) = directories::BaseDirs::new() {
            dirs.home_dir().join(".gateway")
        } else {
            PathBuf::from(".gateway")
        }
    }

    /// Detection policy with the configured custom entries layered on
    /// top of the built-in tables.
    pub fn detection_policy(&self) -> Result<DetectionPolicy, PolicyError> {
        let mut policy = DetectionPolicy::builtin();
        for key in &self.redaction.custom_keys {
            policy = policy.with_sensitive_key(key);
        }
        for (i, pattern) in self.redaction.custom_patterns.iter().enumerate() {
            let label = format!("custom-{}", i);
            policy = policy.with_shape(&label, pattern, Anchor::Value)?;
        }
        Ok(policy)
    }
}
