use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub barrier: BarrierConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    // 127.0.0.1 instead of localhost: avoids IPv6-first resolution stalls
    // against servers bound to the IPv4 loopback only.
    "http://127.0.0.1:8000".to_string()
}

fn default_endpoint_path() -> String {
    "/predict".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_expected_agents() -> usize {
    2
}

fn default_ready_timeout_secs() -> u64 {
    5
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs/harvestd")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_enabled_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint_path: default_endpoint_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrierConfig {
    /// Quorum: distinct agents that must report ready before the cut list is
    /// dispatched early.
    #[serde(default = "default_expected_agents")]
    pub expected_agents: usize,
    /// Seconds of readiness silence after which the cut list is dispatched
    /// regardless of how many agents checked in.
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            expected_agents: default_expected_agents(),
            ready_timeout_secs: default_ready_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            stderr_warn_enabled: true,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let mut config: Config = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        if !config.logging.dir.is_absolute() {
            config.logging.dir = config_base.join(&config.logging.dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.barrier.expected_agents == 0 {
            return Err(anyhow!("barrier.expected_agents must be at least 1"));
        }
        if self.barrier.ready_timeout_secs == 0 {
            return Err(anyhow!("barrier.ready_timeout_secs must be at least 1"));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(anyhow!("gateway.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}
