//! Configurator Configuration
//!
//! File locations, projection horizon and the default values pre-filled in
//! the operator forms. Loaded from TOML; every field has a default.

use crate::bootstrap::{NodeSetup, MAX_NODES, MIN_NODES};
use crate::projection::DEFAULT_PERIODS;
use crate::types::{GenesisParameters, ParameterError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "configurator.toml";

/// Longest projection horizon the front-ends accept
pub const MAX_PERIODS: u32 = 1000;

/// Shared configuration for the configurator and the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfiguratorConfig {
    // === Files ===

    /// Genesis template read on every generation
    pub template_path: PathBuf,

    /// Generated genesis output
    pub output_path: PathBuf,

    /// Environment descriptor written before the init script runs
    pub env_path: PathBuf,

    /// Node initialization script
    pub init_script: PathBuf,

    /// Interpreter used to run the init script
    pub shell: String,

    // === Projection ===

    /// Projection horizon in years
    pub periods: u32,

    // === Dashboard ===

    /// HTTP listen address
    pub listen_addr: String,

    // === Form defaults ===

    pub genesis: GenesisParameters,

    pub node: NodeSetup,
}

impl Default for ConfiguratorConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("template_genesis.json"),
            output_path: PathBuf::from("generated_genesis.json"),
            env_path: PathBuf::from("scripts/env.sh"),
            init_script: PathBuf::from("scripts/init.sh"),
            shell: "bash".to_string(),
            periods: DEFAULT_PERIODS,
            listen_addr: "127.0.0.1:8080".to_string(),
            genesis: GenesisParameters::default(),
            node: NodeSetup::default(),
        }
    }
}

impl ConfiguratorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load the file if present, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    // Builder-style methods for CLI overrides

    pub fn with_template_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.template_path = path;
        }
        self
    }

    pub fn with_output_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.output_path = path;
        }
        self
    }

    pub fn with_periods(mut self, periods: Option<u32>) -> Self {
        if let Some(periods) = periods {
            self.periods = periods;
        }
        self
    }

    pub fn with_listen_addr(mut self, addr: Option<String>) -> Self {
        if let Some(addr) = addr {
            self.listen_addr = addr;
        }
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PERIODS).contains(&self.periods) {
            return Err(ConfigError::Invalid(format!(
                "periods must be between 1 and {}, got {}",
                MAX_PERIODS, self.periods
            )));
        }
        if self.shell.trim().is_empty() {
            return Err(ConfigError::Invalid("shell must not be empty".to_string()));
        }
        let nodes = self.node.validators.len();
        if !(MIN_NODES..=MAX_NODES).contains(&nodes) {
            return Err(ConfigError::Invalid(format!(
                "node.validators must have between {} and {} entries, got {}",
                MIN_NODES, MAX_NODES, nodes
            )));
        }
        self.genesis.check_ranges()?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Failed to write config {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid default parameters: {0}")]
    Parameters(#[from] ParameterError),
}
