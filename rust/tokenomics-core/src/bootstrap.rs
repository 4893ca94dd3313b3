// Bootstrap - Environment descriptor and node initialization script invocation
// Principle: the init script is a black box; we write its env file and capture its output

use crate::types::{tokens_to_base_units, DEFAULT_VALIDATOR_TOKENS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{info, warn};

pub const MIN_NODES: usize = 1;
pub const MAX_NODES: usize = 5;

/// Per-validator form inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorSetup {
    pub ip: String,
    pub keyring_password: String,
}

/// Multi-node initialization inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSetup {
    pub chain_id: String,
    pub key_name: String,
    pub moniker_prefix: String,
    /// Initial allocation per validator, in whole tokens
    pub validator_tokens: u64,
    /// One entry per node
    pub validators: Vec<ValidatorSetup>,
}

impl Default for NodeSetup {
    fn default() -> Self {
        Self {
            chain_id: "cronostestnet_338-3".to_string(),
            key_name: "key".to_string(),
            moniker_prefix: "cronos-node".to_string(),
            validator_tokens: DEFAULT_VALIDATOR_TOKENS,
            validators: vec![ValidatorSetup::default(); 3],
        }
    }
}

/// Rendered key=value descriptor consumed by the init script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapEnv {
    content: String,
    num_nodes: usize,
}

impl BootstrapEnv {
    /// Validate a node setup and render its descriptor.
    ///
    /// The descriptor is sourced by a shell: every text value is single-quoted
    /// and must be non-empty, without whitespace or control characters.
    pub fn from_setup(setup: &NodeSetup) -> Result<Self, BootstrapError> {
        let num_nodes = setup.validators.len();
        if !(MIN_NODES..=MAX_NODES).contains(&num_nodes) {
            return Err(BootstrapError::InvalidNodeCount(num_nodes));
        }

        for (field, value) in [
            ("chain_id", &setup.chain_id),
            ("key_name", &setup.key_name),
            ("moniker_prefix", &setup.moniker_prefix),
        ] {
            check_shell_word(value).map_err(|reason| BootstrapError::InvalidField { field, reason })?;
        }
        for (i, validator) in setup.validators.iter().enumerate() {
            let invalid = |what: &'static str| {
                move |reason: &'static str| BootstrapError::InvalidValidator {
                    index: i + 1,
                    field: what,
                    reason,
                }
            };
            check_shell_word(&validator.ip).map_err(invalid("ip"))?;
            check_shell_word(&validator.keyring_password).map_err(invalid("keyring_password"))?;
        }

        let tokens = tokens_to_base_units(setup.validator_tokens);
        let passwords: Vec<String> = setup
            .validators
            .iter()
            .map(|v| shell_quote(&v.keyring_password))
            .collect();
        let ips: Vec<String> = setup.validators.iter().map(|v| shell_quote(&v.ip)).collect();

        let content = format!(
            "NUM_NODES={}\nCHAINID={}\nKEY={}\nMONIKER_PREFIX={}\nKEYRING_PASSWORDS=({})\nVALIDATOR_IPS=({})\nVALIDATOR_TOKENS={}\n",
            num_nodes,
            shell_quote(&setup.chain_id),
            shell_quote(&setup.key_name),
            shell_quote(&setup.moniker_prefix),
            passwords.join(" "),
            ips.join(" "),
            tokens,
        );

        Ok(Self { content, num_nodes })
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Write the descriptor. Owner-only on Unix since it carries keyring passwords.
    pub fn write_to(&self, path: &Path) -> Result<(), BootstrapError> {
        let io_err = |source: std::io::Error| BootstrapError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)
                .map_err(io_err)?;
            // mode() only applies to newly created files
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
            file.write_all(self.content.as_bytes()).map_err(io_err)?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, &self.content).map_err(io_err)?;
        }

        Ok(())
    }
}

/// Single-quote for a POSIX shell: `it's` becomes `'it'\''s'`
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn check_shell_word(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("must not be empty");
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("must not contain whitespace or control characters");
    }
    Ok(())
}

/// Narrow seam over the external bootstrap process
pub trait BootstrapInvoker {
    /// Run the bootstrap with `env`, returning combined stdout/stderr
    fn invoke(&self, env: &BootstrapEnv) -> Result<String, BootstrapError>;
}

/// Runs `<shell> <script>` after writing the env file
#[derive(Debug, Clone)]
pub struct ScriptInvoker {
    pub shell: String,
    pub script_path: PathBuf,
    pub env_path: PathBuf,
}

impl ScriptInvoker {
    pub fn new(shell: impl Into<String>, script_path: impl Into<PathBuf>, env_path: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
            script_path: script_path.into(),
            env_path: env_path.into(),
        }
    }
}

impl BootstrapInvoker for ScriptInvoker {
    fn invoke(&self, env: &BootstrapEnv) -> Result<String, BootstrapError> {
        env.write_to(&self.env_path)?;
        info!(
            script = %self.script_path.display(),
            env = %self.env_path.display(),
            nodes = env.num_nodes(),
            "Running bootstrap script"
        );

        // Blocks until exit: no timeout, no streaming
        let output = Command::new(&self.shell)
            .arg(&self.script_path)
            .output()
            .map_err(|source| BootstrapError::Spawn {
                command: format!("{} {}", self.shell, self.script_path.display()),
                source,
            })?;

        let combined = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        if !output.status.success() {
            warn!(status = %output.status, "Bootstrap script failed");
            return Err(BootstrapError::Failed {
                status: output.status,
                output: combined,
            });
        }

        info!("Bootstrap script completed");
        Ok(combined)
    }
}

/// Bootstrap errors
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Number of nodes must be between 1 and 5, got {0}")]
    InvalidNodeCount(usize),

    #[error("{field} {reason}")]
    InvalidField { field: &'static str, reason: &'static str },

    #[error("Validator {index} {field} {reason}")]
    InvalidValidator {
        index: usize,
        field: &'static str,
        reason: &'static str,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Bootstrap script exited with {status}")]
    Failed { status: ExitStatus, output: String },
}

impl BootstrapError {
    /// Text to show the operator: the captured output for script failures,
    /// the error message otherwise
    pub fn operator_output(&self) -> String {
        match self {
            BootstrapError::Failed { output, .. } => output.clone(),
            other => other.to_string(),
        }
    }
}
