// CLI - Command line interface for the tokenomics configurator
// Principle: every flag overrides the config file, nothing else

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokenomics_core::config::DEFAULT_CONFIG_FILE;
use tokenomics_core::{
    Decimal, GenesisParameters, NodeSetup, ParameterError, PolicyParameters, ValidatorSetup,
};

/// Tokenomics Configurator - inflation projections, genesis files and local testnets
#[derive(Parser, Debug)]
#[command(name = "tokenomics-configurator")]
#[command(author = "Tokenomics Configurator Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Design Cosmos SDK tokenomics and bootstrap a local network")]
#[command(long_about = r#"
Design the monetary policy of a Cosmos SDK chain, preview it, and turn it
into a genesis file.

Interactive mode (no subcommand):
  tokenomics-configurator

Ten-year projection as JSON:
  tokenomics-configurator simulate --inflation-max 0.2 --format json

Generate a genesis file from a template:
  tokenomics-configurator genesis --template template_genesis.json --mint-denom aauth

Initialize three local validators:
  tokenomics-configurator bootstrap --nodes 3 --validator-ip 10.0.0.1 ...
"#)]
pub struct Cli {
    /// Subcommand to execute (interactive form if omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE, env = "TOKENOMICS_CONFIG")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", env = "TOKENOMICS_LOG")]
    pub log_level: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project inflation, supply, provisions and APR
    Simulate(SimulateCmd),

    /// Write a genesis file from the template
    Genesis(GenesisCmd),

    /// Write the node environment file and run the init script
    Bootstrap(BootstrapCmd),

    /// Write a configuration file with default values
    InitConfig(InitConfigCmd),
}

/// Monetary policy overrides
#[derive(Args, Debug, Default, Clone)]
pub struct PolicyArgs {
    /// Yearly decay factor applied to inflation
    #[arg(long)]
    pub inflation_rate_change: Option<Decimal>,

    /// Starting inflation
    #[arg(long)]
    pub inflation_max: Option<Decimal>,

    /// Inflation floor
    #[arg(long)]
    pub inflation_min: Option<Decimal>,

    /// Target bonded ratio
    #[arg(long)]
    pub goal_bonded: Option<Decimal>,

    /// Expected blocks per year
    #[arg(long)]
    pub blocks_per_year: Option<u64>,

    /// Initial supply in whole tokens
    #[arg(long)]
    pub max_supply: Option<u64>,
}

impl PolicyArgs {
    /// Overlay the flags on `base` and range-check the result
    pub fn apply(&self, base: &PolicyParameters) -> Result<PolicyParameters, ParameterError> {
        let mut params = base.clone();
        if let Some(v) = &self.inflation_rate_change {
            params.inflation_rate_change = v.clone();
        }
        if let Some(v) = &self.inflation_max {
            params.inflation_max = v.clone();
        }
        if let Some(v) = &self.inflation_min {
            params.inflation_min = v.clone();
        }
        if let Some(v) = &self.goal_bonded {
            params.goal_bonded = v.clone();
        }
        if let Some(v) = self.blocks_per_year {
            params.blocks_per_year = v;
        }
        if let Some(tokens) = self.max_supply {
            params = params.with_max_supply_tokens(tokens);
        }
        params.check_ranges()?;
        Ok(params)
    }
}

/// Output format for projections
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Project the monetary policy
#[derive(Parser, Debug)]
pub struct SimulateCmd {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Number of years to project
    #[arg(long)]
    pub periods: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also draw bar charts (text format only)
    #[arg(long)]
    pub charts: bool,
}

/// Generate the genesis file
#[derive(Parser, Debug)]
pub struct GenesisCmd {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Genesis template
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Generated genesis file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Denomination used for mint, staking, crisis, gov and evm
    #[arg(long)]
    pub mint_denom: Option<String>,

    /// Governance voting period (e.g. 600s)
    #[arg(long)]
    pub voting_period: Option<String>,

    /// Expedited proposal voting period
    #[arg(long)]
    pub expedited_voting_period: Option<String>,

    /// Governance deposit period
    #[arg(long)]
    pub max_deposit_period: Option<String>,

    /// Minimum proposal deposit in whole tokens
    #[arg(long)]
    pub min_deposit: Option<u64>,

    /// Maximum active validators
    #[arg(long)]
    pub max_validators: Option<u32>,

    /// Block gas limit
    #[arg(long)]
    pub max_gas: Option<u64>,

    /// Minimum block time increment in milliseconds
    #[arg(long)]
    pub time_iota_ms: Option<u64>,
}

impl GenesisCmd {
    /// Overlay the flags on the configured defaults and range-check the result
    pub fn parameters(&self, base: &GenesisParameters) -> Result<GenesisParameters, ParameterError> {
        let mut params = base.clone();
        params.policy = self.policy.apply(&base.policy)?;
        if let Some(ref v) = self.mint_denom {
            params.mint_denom = v.clone();
        }
        if let Some(ref v) = self.voting_period {
            params.governance.voting_period = v.clone();
        }
        if let Some(ref v) = self.expedited_voting_period {
            params.governance.expedited_voting_period = v.clone();
        }
        if let Some(ref v) = self.max_deposit_period {
            params.governance.max_deposit_period = v.clone();
        }
        if let Some(v) = self.min_deposit {
            params.governance.min_deposit = v;
        }
        if let Some(v) = self.max_validators {
            params.staking.max_validators = v;
        }
        if let Some(v) = self.max_gas {
            params.consensus.max_gas = v;
        }
        if let Some(v) = self.time_iota_ms {
            params.consensus.time_iota_ms = v;
        }
        params.check_ranges()?;
        Ok(params)
    }
}

/// Initialize the local network
#[derive(Parser, Debug)]
pub struct BootstrapCmd {
    /// Number of validator nodes (1-5)
    #[arg(short, long)]
    pub nodes: Option<usize>,

    /// Chain ID
    #[arg(long)]
    pub chain_id: Option<String>,

    /// Key name
    #[arg(long)]
    pub key: Option<String>,

    /// Moniker prefix
    #[arg(long)]
    pub moniker_prefix: Option<String>,

    /// Validator IP, one per node (can be specified multiple times)
    #[arg(long = "validator-ip", value_name = "IP")]
    pub validator_ips: Vec<String>,

    /// Keyring password, one per node (can be specified multiple times)
    #[arg(long = "keyring-password", value_name = "PASSWORD", env = "TOKENOMICS_KEYRING_PASSWORDS", value_delimiter = ',')]
    pub keyring_passwords: Vec<String>,

    /// Initial allocation per validator in whole tokens
    #[arg(long)]
    pub validator_tokens: Option<u64>,

    /// Node initialization script
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Environment file written before the script runs
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}

impl BootstrapCmd {
    /// Overlay the flags on the configured node setup.
    ///
    /// The validator list is resized to the node count; IPs and passwords
    /// given on the command line fill it in order.
    pub fn node_setup(&self, base: &NodeSetup) -> anyhow::Result<NodeSetup> {
        let mut setup = base.clone();
        if let Some(ref v) = self.chain_id {
            setup.chain_id = v.clone();
        }
        if let Some(ref v) = self.key {
            setup.key_name = v.clone();
        }
        if let Some(ref v) = self.moniker_prefix {
            setup.moniker_prefix = v.clone();
        }
        if let Some(v) = self.validator_tokens {
            setup.validator_tokens = v;
        }

        let nodes = self
            .nodes
            .unwrap_or_else(|| setup.validators.len().max(self.validator_ips.len()));
        if self.validator_ips.len() > nodes {
            anyhow::bail!(
                "{} validator IPs given for {} nodes",
                self.validator_ips.len(),
                nodes
            );
        }
        if self.keyring_passwords.len() > nodes {
            anyhow::bail!(
                "{} keyring passwords given for {} nodes",
                self.keyring_passwords.len(),
                nodes
            );
        }

        setup.validators.resize(nodes, ValidatorSetup::default());
        for (validator, ip) in setup.validators.iter_mut().zip(&self.validator_ips) {
            validator.ip = ip.clone();
        }
        for (validator, password) in setup.validators.iter_mut().zip(&self.keyring_passwords) {
            validator.keyring_password = password.clone();
        }

        Ok(setup)
    }
}

/// Write the default configuration
#[derive(Parser, Debug)]
pub struct InitConfigCmd {
    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_cli_parse_interactive() {
        let cli = Cli::try_parse_from(["tokenomics-configurator"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("configurator.toml"));
    }

    #[test]
    fn test_cli_parse_simulate() {
        let cli = Cli::try_parse_from([
            "tokenomics-configurator",
            "simulate",
            "--inflation-max",
            "0.25",
            "--periods",
            "5",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Simulate(cmd)) => {
                assert_eq!(cmd.policy.inflation_max, Some(Decimal::from_str("0.25").unwrap()));
                assert_eq!(cmd.periods, Some(5));
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_decimal() {
        assert!(Cli::try_parse_from([
            "tokenomics-configurator",
            "simulate",
            "--goal-bonded",
            "two-thirds",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parse_bootstrap() {
        let cli = Cli::try_parse_from([
            "tokenomics-configurator",
            "bootstrap",
            "--nodes",
            "2",
            "--validator-ip",
            "10.0.0.1",
            "--validator-ip",
            "10.0.0.2",
            "--keyring-password",
            "a,b",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Bootstrap(cmd)) => {
                assert_eq!(cmd.nodes, Some(2));
                assert_eq!(cmd.validator_ips, vec!["10.0.0.1", "10.0.0.2"]);
                assert_eq!(cmd.keyring_passwords, vec!["a", "b"]);
            }
            _ => panic!("Expected Bootstrap command"),
        }
    }

    #[test]
    fn test_policy_args_overlay() {
        let args = PolicyArgs {
            inflation_min: Some(Decimal::from_str("0.05").unwrap()),
            max_supply: Some(21_000_000),
            ..Default::default()
        };
        let params = args.apply(&PolicyParameters::default()).unwrap();

        assert_eq!(params.inflation_min, Decimal::from_str("0.05").unwrap());
        assert_eq!(params.inflation_max, Decimal::from_str("0.20").unwrap());
        assert_eq!(
            params.max_supply,
            Decimal::from_str("21000000000000000000000000").unwrap()
        );
    }

    #[test]
    fn test_policy_args_range_checked() {
        let args = PolicyArgs {
            inflation_min: Some(Decimal::from_str("0.5").unwrap()),
            ..Default::default()
        };
        assert!(matches!(
            args.apply(&PolicyParameters::default()),
            Err(ParameterError::InflationBoundsInverted { .. })
        ));
    }

    #[test]
    fn test_genesis_parameters_overlay() {
        let cli = Cli::try_parse_from([
            "tokenomics-configurator",
            "genesis",
            "--mint-denom",
            "ustake",
            "--max-validators",
            "50",
            "--voting-period",
            "120s",
        ])
        .unwrap();
        let Some(Commands::Genesis(cmd)) = cli.command else {
            panic!("Expected Genesis command");
        };
        let params = cmd.parameters(&GenesisParameters::default()).unwrap();
        assert_eq!(params.mint_denom, "ustake");
        assert_eq!(params.staking.max_validators, 50);
        assert_eq!(params.governance.voting_period, "120s");
        assert_eq!(params.governance.max_deposit_period, "600s");
    }

    #[test]
    fn test_genesis_rejects_bad_duration() {
        let cli = Cli::try_parse_from([
            "tokenomics-configurator",
            "genesis",
            "--voting-period",
            "ten minutes",
        ])
        .unwrap();
        let Some(Commands::Genesis(cmd)) = cli.command else {
            panic!("Expected Genesis command");
        };
        assert!(matches!(
            cmd.parameters(&GenesisParameters::default()),
            Err(ParameterError::InvalidDuration { .. })
        ));
    }

    fn bootstrap_cmd(nodes: Option<usize>, ips: &[&str]) -> BootstrapCmd {
        BootstrapCmd {
            nodes,
            chain_id: Some("localnet_9000-1".to_string()),
            key: None,
            moniker_prefix: None,
            validator_ips: ips.iter().map(|s| s.to_string()).collect(),
            keyring_passwords: vec![],
            validator_tokens: None,
            script: None,
            env_file: None,
        }
    }

    #[test]
    fn test_node_setup_resizes() {
        let setup = bootstrap_cmd(Some(5), &["10.0.0.1"])
            .node_setup(&NodeSetup::default())
            .unwrap();
        assert_eq!(setup.validators.len(), 5);
        assert_eq!(setup.validators[0].ip, "10.0.0.1");
        assert_eq!(setup.validators[4].ip, "");
        assert_eq!(setup.chain_id, "localnet_9000-1");
        assert_eq!(setup.key_name, "key");
    }

    #[test]
    fn test_node_setup_count_from_ips() {
        let setup = bootstrap_cmd(None, &["a", "b", "c", "d"])
            .node_setup(&NodeSetup::default())
            .unwrap();
        assert_eq!(setup.validators.len(), 4);
    }

    #[test]
    fn test_node_setup_rejects_extra_ips() {
        assert!(bootstrap_cmd(Some(1), &["a", "b"])
            .node_setup(&NodeSetup::default())
            .is_err());
    }
}
