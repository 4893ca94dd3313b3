// Genesis - Template patching and generated genesis output
pub mod chain_config;
pub mod patch;
pub mod template;

pub use patch::apply_policy;
pub use template::GenesisTransformer;

use std::path::PathBuf;

/// Genesis transformer errors
#[derive(Debug, thiserror::Error)]
pub enum GenesisError {
    #[error("Required genesis section missing or not an object: {path}")]
    MissingSection { path: String },

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid genesis JSON: {0}")]
    Json(#[from] serde_json::Error),
}
