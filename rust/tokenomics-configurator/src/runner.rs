// Runner - Executes the non-interactive subcommands

use crate::chart::projection_charts;
use crate::cli::{BootstrapCmd, GenesisCmd, OutputFormat, SimulateCmd};
use crate::ui::{create_spinner, print_script_output, print_success, render_projection_table};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tokenomics_core::config::MAX_PERIODS;
use tokenomics_core::{
    project, BootstrapEnv, BootstrapInvoker, ConfiguratorConfig, GenesisTransformer, ScriptInvoker,
};
use tracing::{error, info};

/// Render the projection requested by `simulate`
pub fn simulate_report(config: &ConfiguratorConfig, cmd: &SimulateCmd) -> anyhow::Result<String> {
    let params = cmd.policy.apply(&config.genesis.policy)?;
    let periods = cmd.periods.unwrap_or(config.periods);
    if periods > MAX_PERIODS {
        anyhow::bail!("periods must not exceed {}", MAX_PERIODS);
    }
    let result = project(&params, periods)?;
    info!(periods, "Projection computed");

    match cmd.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => {
            let mut out = render_projection_table(&result);
            if cmd.charts {
                for chart in projection_charts(&result) {
                    out.push('\n');
                    out.push_str(&chart);
                }
            }
            Ok(out)
        }
    }
}

pub fn simulate(config: &ConfiguratorConfig, cmd: &SimulateCmd) -> anyhow::Result<()> {
    print!("{}", simulate_report(config, cmd)?);
    Ok(())
}

/// Generate the genesis file, returning the path written
pub fn generate_genesis(config: &ConfiguratorConfig, cmd: &GenesisCmd) -> anyhow::Result<PathBuf> {
    let params = cmd.parameters(&config.genesis)?;
    let transformer = GenesisTransformer::new(
        cmd.template.clone().unwrap_or_else(|| config.template_path.clone()),
        cmd.output.clone().unwrap_or_else(|| config.output_path.clone()),
    );

    transformer
        .generate(&params)
        .with_context(|| format!("Failed to generate genesis from {}", transformer.template_path().display()))?;

    Ok(transformer.output_path().to_path_buf())
}

pub fn genesis(config: &ConfiguratorConfig, cmd: &GenesisCmd) -> anyhow::Result<()> {
    let path = generate_genesis(config, cmd)?;
    print_success(&format!("Genesis file written to {}", path.display()));
    Ok(())
}

/// Render the descriptor and hand it to `invoker`, returning its output
pub fn run_bootstrap(
    config: &ConfiguratorConfig,
    cmd: &BootstrapCmd,
    invoker: &dyn BootstrapInvoker,
) -> anyhow::Result<String> {
    let setup = cmd.node_setup(&config.node)?;
    let env = BootstrapEnv::from_setup(&setup)?;

    let spinner = create_spinner(&format!("Initializing {} nodes...", env.num_nodes()));
    let result = invoker.invoke(&env);
    spinner.finish_and_clear();

    match result {
        Ok(output) => Ok(output),
        Err(e) => {
            error!("Bootstrap failed: {}", e);
            print_script_output(&e.operator_output());
            Err(e.into())
        }
    }
}

pub fn bootstrap(config: &ConfiguratorConfig, cmd: &BootstrapCmd) -> anyhow::Result<()> {
    let invoker = ScriptInvoker::new(
        config.shell.clone(),
        cmd.script.clone().unwrap_or_else(|| config.init_script.clone()),
        cmd.env_file.clone().unwrap_or_else(|| config.env_path.clone()),
    );
    let output = run_bootstrap(config, cmd, &invoker)?;
    print_script_output(&output);
    print_success("Node initialization finished");
    Ok(())
}

/// Write the default configuration to `path`
pub fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    ConfiguratorConfig::default().save(path)?;
    print_success(&format!("Configuration written to {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PolicyArgs;
    use std::cell::Cell;
    use std::fs;
    use tempfile::tempdir;
    use tokenomics_core::BootstrapError;

    fn simulate_cmd(format: OutputFormat, periods: Option<u32>) -> SimulateCmd {
        SimulateCmd {
            policy: PolicyArgs::default(),
            periods,
            format,
            charts: false,
        }
    }

    fn genesis_cmd(template: PathBuf, output: PathBuf) -> GenesisCmd {
        GenesisCmd {
            policy: PolicyArgs::default(),
            template: Some(template),
            output: Some(output),
            mint_denom: Some("ustake".to_string()),
            voting_period: None,
            expedited_voting_period: None,
            max_deposit_period: None,
            min_deposit: None,
            max_validators: None,
            max_gas: None,
            time_iota_ms: None,
        }
    }

    fn bootstrap_cmd(nodes: usize) -> BootstrapCmd {
        BootstrapCmd {
            nodes: Some(nodes),
            chain_id: None,
            key: None,
            moniker_prefix: None,
            validator_ips: (1..=nodes).map(|i| format!("10.0.0.{}", i)).collect(),
            keyring_passwords: (1..=nodes).map(|i| format!("pw{}", i)).collect(),
            validator_tokens: None,
            script: None,
            env_file: None,
        }
    }

    const TEMPLATE: &str = r#"{
  "app_state": {
    "mint": { "params": { "mint_denom": "stake" } },
    "staking": { "params": { "bond_denom": "stake" } },
    "crisis": { "constant_fee": { "denom": "stake", "amount": "1000" } },
    "gov": { "params": { "min_deposit": [] } }
  },
  "consensus": { "params": { "block": { "max_gas": "-1" } } }
}"#;

    struct FixedInvoker {
        fail: bool,
        calls: Cell<usize>,
    }

    impl BootstrapInvoker for FixedInvoker {
        fn invoke(&self, env: &BootstrapEnv) -> Result<String, BootstrapError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(BootstrapError::InvalidNodeCount(env.num_nodes()))
            } else {
                Ok(format!("{} nodes ready", env.num_nodes()))
            }
        }
    }

    #[test]
    fn test_simulate_text_report() {
        let config = ConfiguratorConfig::default();
        let report = simulate_report(&config, &simulate_cmd(OutputFormat::Text, Some(3))).unwrap();
        // header + rule + 3 years
        assert_eq!(report.lines().count(), 5);
        assert!(report.contains("7.00%"));
    }

    #[test]
    fn test_simulate_json_report() {
        let config = ConfiguratorConfig::default().with_periods(Some(4));
        let report = simulate_report(&config, &simulate_cmd(OutputFormat::Json, None)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["inflation"].as_array().unwrap().len(), 4);
        assert_eq!(value["inflation"][0], "0.07");
    }

    #[test]
    fn test_simulate_rejects_zero_periods() {
        let config = ConfiguratorConfig::default();
        let err = simulate_report(&config, &simulate_cmd(OutputFormat::Text, Some(0))).unwrap_err();
        assert!(err.to_string().contains("at least one period"));
    }

    #[test]
    fn test_generate_genesis() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("template.json");
        let output = dir.path().join("out").join("genesis.json");
        fs::write(&template, TEMPLATE).unwrap();

        let config = ConfiguratorConfig::default();
        let written = generate_genesis(&config, &genesis_cmd(template, output.clone())).unwrap();
        assert_eq!(written, output);

        let genesis: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(genesis["app_state"]["mint"]["params"]["mint_denom"], "ustake");
        assert_eq!(genesis["app_state"]["evm"]["params"]["evm_denom"], "ustake");
    }

    #[test]
    fn test_generate_genesis_missing_template() {
        let dir = tempdir().unwrap();
        let config = ConfiguratorConfig::default();
        let cmd = genesis_cmd(dir.path().join("absent.json"), dir.path().join("genesis.json"));
        let err = generate_genesis(&config, &cmd).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
        assert!(!dir.path().join("genesis.json").exists());
    }

    #[test]
    fn test_run_bootstrap_success() {
        let invoker = FixedInvoker { fail: false, calls: Cell::new(0) };
        let output = run_bootstrap(&ConfiguratorConfig::default(), &bootstrap_cmd(2), &invoker).unwrap();
        assert_eq!(output, "2 nodes ready");
        assert_eq!(invoker.calls.get(), 1);
    }

    #[test]
    fn test_run_bootstrap_invalid_count_never_invokes() {
        let invoker = FixedInvoker { fail: false, calls: Cell::new(0) };
        assert!(run_bootstrap(&ConfiguratorConfig::default(), &bootstrap_cmd(6), &invoker).is_err());
        assert_eq!(invoker.calls.get(), 0);
    }

    #[test]
    fn test_run_bootstrap_missing_password_never_invokes() {
        let invoker = FixedInvoker { fail: false, calls: Cell::new(0) };
        let mut cmd = bootstrap_cmd(2);
        cmd.keyring_passwords.pop();

        let err = run_bootstrap(&ConfiguratorConfig::default(), &cmd, &invoker).unwrap_err();
        assert!(err.to_string().contains("keyring_password"));
        assert_eq!(invoker.calls.get(), 0);
    }

    #[test]
    fn test_run_bootstrap_failure() {
        let invoker = FixedInvoker { fail: true, calls: Cell::new(0) };
        assert!(run_bootstrap(&ConfiguratorConfig::default(), &bootstrap_cmd(1), &invoker).is_err());
    }

    #[test]
    fn test_init_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("configurator.toml");

        init_config(&path, false).unwrap();
        let loaded = ConfiguratorConfig::load(&path).unwrap();
        assert_eq!(loaded, ConfiguratorConfig::default());

        assert!(init_config(&path, false).is_err());
        assert!(init_config(&path, true).is_ok());
    }
}
