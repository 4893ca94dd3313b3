//! Tokenomics Core
//!
//! Projection engine, genesis transformer and bootstrap collaborator shared by
//! the terminal configurator and the HTTP dashboard.
//!
//! ```text
//! PolicyParameters ──► projection::project ──► ProjectionResult (charts)
//! GenesisParameters ─► genesis::apply_policy ─► generated_genesis.json
//! NodeSetup ─────────► bootstrap::BootstrapEnv ─► scripts/env.sh ─► init script
//! ```

pub mod bootstrap;
pub mod config;
pub mod decimal;
pub mod genesis;
pub mod projection;
pub mod types;

#[cfg(test)]
mod tests;

pub use bootstrap::{
    BootstrapEnv, BootstrapError, BootstrapInvoker, NodeSetup, ScriptInvoker, ValidatorSetup,
};
pub use config::{ConfigError, ConfiguratorConfig};
pub use decimal::{Decimal, ParseDecimalError};
pub use genesis::{apply_policy, GenesisError, GenesisTransformer};
pub use projection::{project, ProjectionPoint, ProjectionResult, SimulationError, DEFAULT_PERIODS};
pub use types::*;
