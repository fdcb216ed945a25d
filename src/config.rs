//! Configuration for the benchboard service and renderer.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chart::{RangePolicy, ThemeKind};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unserializable configuration: {0}")]
    Format(#[from] toml::ser::Error),
}

/// HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Directory holding benchmark run results
    pub results_dir: PathBuf,
    /// Directory with static dashboard assets
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".parse().expect("valid default bind address"),
            results_dir: PathBuf::from("./results"),
            static_dir: PathBuf::from("./static"),
        }
    }
}

/// CI notification webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret for the HMAC signature check
    pub secret: String,
    /// Only commits to this branch trigger a benchmark run
    pub watched_branch: String,
    /// Command spawned with the commit id and results path as arguments
    pub bench_command: PathBuf,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            watched_branch: "master".to_string(),
            bench_command: PathBuf::from("./bench.sh"),
        }
    }
}

/// Chart rendering defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    pub theme: ThemeKind,
    pub range: RangePolicy,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Benchmark Trends".to_string(),
            theme: ThemeKind::Dark,
            range: RangePolicy::Auto,
        }
    }
}

/// Complete benchboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchboardConfig {
    pub server: ServerConfig,
    pub webhook: WebhookConfig,
    pub chart: ChartConfig,
}

impl BenchboardConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path` when it exists, otherwise start from defaults; in
    /// both cases environment overrides apply last.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Override settings from `BENCHBOARD_*` environment variables if present.
    pub fn apply_env(&mut self) {
        if let Ok(bind) = std::env::var("BENCHBOARD_BIND") {
            self.server.bind = bind.parse().unwrap_or(self.server.bind);
        }
        if let Ok(dir) = std::env::var("BENCHBOARD_RESULTS_DIR") {
            self.server.results_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("BENCHBOARD_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }
        if let Ok(secret) = std::env::var("BENCHBOARD_WEBHOOK_SECRET") {
            self.webhook.secret = secret;
        }
        if let Ok(branch) = std::env::var("BENCHBOARD_WATCHED_BRANCH") {
            self.webhook.watched_branch = branch;
        }
        if let Ok(command) = std::env::var("BENCHBOARD_BENCH_COMMAND") {
            self.webhook.bench_command = PathBuf::from(command);
        }
    }
}
