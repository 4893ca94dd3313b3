// Interactive form - dialoguer prompts and the action menu
// Principle: each action reads the parameters as last submitted; failures return to the menu

use crate::chart::projection_charts;
use crate::ui::{
    create_spinner, format_with_commas, print_error, print_header, print_info, print_script_output,
    print_success, print_warning, render_projection_table, to_tokens,
};
use anyhow::Result;
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use std::str::FromStr;
use tokenomics_core::bootstrap::{MAX_NODES, MIN_NODES};
use tokenomics_core::types::check_duration;
use tokenomics_core::{
    project, BootstrapEnv, BootstrapInvoker, ConfiguratorConfig, Decimal, GenesisParameters,
    GenesisTransformer, NodeSetup, PolicyParameters, ScriptInvoker, ValidatorSetup, DEFAULT_MAX_SUPPLY_TOKENS,
};
use tracing::{error, info};

/// Parse a fraction in [0, 1]
pub fn parse_fraction(input: &str) -> Result<Decimal, String> {
    let value = Decimal::from_str(input.trim()).map_err(|_| "Enter a decimal number such as 0.13".to_string())?;
    if value.is_negative() || value > Decimal::one() {
        return Err("Value must be between 0 and 1".to_string());
    }
    Ok(value)
}

/// Parse a strictly positive integer, commas allowed
pub fn parse_positive(input: &str) -> Result<u64, String> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<u64>() {
        Ok(0) => Err("Value must be at least 1".to_string()),
        Ok(v) => Ok(v),
        Err(_) => Err("Enter a whole number".to_string()),
    }
}

/// Parse a strictly positive integer that fits in 32 bits
pub fn parse_positive_u32(input: &str) -> Result<u32, String> {
    let value = parse_positive(input)?;
    u32::try_from(value).map_err(|_| format!("Value must be at most {}", format_with_commas(u128::from(u32::MAX))))
}

/// Validate a duration such as "600s"
pub fn parse_duration(input: &str) -> Result<String, String> {
    let value = input.trim();
    check_duration("duration", value).map_err(|_| "Use seconds with an s suffix, e.g. 600s".to_string())?;
    Ok(value.to_string())
}

/// Reject values the env file cannot carry as a single word
pub fn parse_list_item(input: &str) -> Result<String, String> {
    if input.is_empty() {
        return Err("Must not be empty".to_string());
    }
    if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("Must not contain whitespace or control characters".to_string());
    }
    Ok(input.to_string())
}

fn prompt_fraction(theme: &ColorfulTheme, prompt: &str, default: &Decimal) -> Result<Decimal> {
    let input: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .default(default.to_string())
        .validate_with(|input: &String| parse_fraction(input).map(|_| ()))
        .interact_text()?;
    parse_fraction(&input).map_err(anyhow::Error::msg)
}

fn prompt_positive(theme: &ColorfulTheme, prompt: &str, default: u64) -> Result<u64> {
    let input: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .default(format_with_commas(u128::from(default)))
        .validate_with(|input: &String| parse_positive(input).map(|_| ()))
        .interact_text()?;
    parse_positive(&input).map_err(anyhow::Error::msg)
}

fn prompt_positive_u32(theme: &ColorfulTheme, prompt: &str, default: u32) -> Result<u32> {
    let input: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .default(format_with_commas(u128::from(default)))
        .validate_with(|input: &String| parse_positive_u32(input).map(|_| ()))
        .interact_text()?;
    parse_positive_u32(&input).map_err(anyhow::Error::msg)
}

fn prompt_duration(theme: &ColorfulTheme, prompt: &str, default: &str) -> Result<String> {
    let input: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .default(default.to_string())
        .validate_with(|input: &String| parse_duration(input).map(|_| ()))
        .interact_text()?;
    parse_duration(&input).map_err(anyhow::Error::msg)
}

fn prompt_text(theme: &ColorfulTheme, prompt: &str, default: &str) -> Result<String> {
    let input: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .default(default.to_string())
        .validate_with(|input: &String| parse_list_item(input).map(|_| ()))
        .interact_text()?;
    Ok(input)
}

/// Prompt every genesis parameter, pre-filled with `current`
fn prompt_genesis(theme: &ColorfulTheme, current: &GenesisParameters) -> Result<GenesisParameters> {
    loop {
        let mut params = current.clone();

        print_header("  🪙 Mint");
        params.policy.inflation_rate_change =
            prompt_fraction(theme, "Inflation rate change", &current.policy.inflation_rate_change)?;
        params.policy.inflation_max = prompt_fraction(theme, "Inflation max", &current.policy.inflation_max)?;
        params.policy.inflation_min = prompt_fraction(theme, "Inflation min", &current.policy.inflation_min)?;
        params.policy.goal_bonded = prompt_fraction(theme, "Goal bonded", &current.policy.goal_bonded)?;
        params.policy.blocks_per_year = prompt_positive(theme, "Blocks per year", current.policy.blocks_per_year)?;
        params.mint_denom = prompt_text(theme, "Mint denom", &current.mint_denom)?;

        let current_tokens = to_tokens(&current.policy.max_supply)
            .to_u64()
            .unwrap_or(DEFAULT_MAX_SUPPLY_TOKENS);
        let tokens = prompt_positive(theme, "Max supply (tokens)", current_tokens)?;
        params.policy = params.policy.with_max_supply_tokens(tokens);

        print_header("  🏛️  Governance");
        params.governance.voting_period = prompt_duration(theme, "Voting period", &current.governance.voting_period)?;
        params.governance.expedited_voting_period = prompt_duration(
            theme,
            "Expedited voting period",
            &current.governance.expedited_voting_period,
        )?;
        params.governance.max_deposit_period =
            prompt_duration(theme, "Max deposit period", &current.governance.max_deposit_period)?;
        params.governance.min_deposit = prompt_positive(theme, "Min deposit (tokens)", current.governance.min_deposit)?;

        print_header("  ⚙️  Staking & Consensus");
        params.staking.max_validators = prompt_positive_u32(theme, "Max validators", current.staking.max_validators)?;
        params.consensus.max_gas = prompt_positive(theme, "Max gas", current.consensus.max_gas)?;
        params.consensus.time_iota_ms = prompt_positive(theme, "Time iota (ms)", current.consensus.time_iota_ms)?;

        match params.check_ranges() {
            Ok(()) => return Ok(params),
            Err(e) => {
                print_error(&e.to_string());
                print_warning("Please review the parameters");
            }
        }
    }
}

/// Prompt the node setup, pre-filled with `current`
fn prompt_node_setup(theme: &ColorfulTheme, current: &NodeSetup) -> Result<NodeSetup> {
    print_header("  🖥️  Node Initialization");

    let counts: Vec<String> = (MIN_NODES..=MAX_NODES).map(|n| n.to_string()).collect();
    let default_index = current
        .validators
        .len()
        .clamp(MIN_NODES, MAX_NODES)
        - MIN_NODES;
    let selection = Select::with_theme(theme)
        .with_prompt("Number of nodes")
        .items(&counts)
        .default(default_index)
        .interact()?;
    let nodes = selection + MIN_NODES;

    let mut setup = current.clone();
    setup.chain_id = prompt_text(theme, "Chain ID", &current.chain_id)?;
    setup.key_name = prompt_text(theme, "Key name", &current.key_name)?;
    setup.moniker_prefix = prompt_text(theme, "Moniker prefix", &current.moniker_prefix)?;
    setup.validator_tokens = prompt_positive(theme, "Tokens per validator", current.validator_tokens)?;

    setup.validators = Vec::with_capacity(nodes);
    for i in 0..nodes {
        let previous = current.validators.get(i).cloned().unwrap_or_default();
        println!();
        println!("  {}", style(format!("Validator {}", i + 1)).bold());
        let ip = prompt_text(theme, "IP address", &previous.ip)?;
        let keyring_password: String = Password::with_theme(theme)
            .with_prompt("Keyring password")
            .validate_with(|input: &String| parse_list_item(input).map(|_| ()))
            .interact()?;
        setup.validators.push(ValidatorSetup { ip, keyring_password });
    }

    Ok(setup)
}

fn show_projection(policy: &PolicyParameters, periods: u32) {
    print_header("  📈 Projection");
    match project(policy, periods) {
        Ok(result) => {
            print!("{}", render_projection_table(&result));
            for chart in projection_charts(&result) {
                println!();
                print!("{}", style(chart).cyan());
            }
            println!();
        }
        Err(e) => print_error(&format!("Simulation failed: {}", e)),
    }
}

fn generate_genesis(config: &ConfiguratorConfig, params: &GenesisParameters) {
    let transformer = GenesisTransformer::new(&config.template_path, &config.output_path);
    match transformer.generate(params) {
        Ok(_) => print_success(&format!("Genesis file written to {}", config.output_path.display())),
        Err(e) => {
            error!("Genesis generation failed: {}", e);
            print_error(&e.to_string());
        }
    }
}

fn run_node_initialization(config: &ConfiguratorConfig, setup: &NodeSetup) {
    let env = match BootstrapEnv::from_setup(setup) {
        Ok(env) => env,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    let invoker = ScriptInvoker::new(config.shell.clone(), &config.init_script, &config.env_path);
    let spinner = create_spinner("Running node initialization...");
    let result = invoker.invoke(&env);
    spinner.finish_and_clear();

    match result {
        Ok(output) => {
            print_script_output(&output);
            print_success("Node initialization finished");
        }
        Err(e) => {
            error!("Node initialization failed: {}", e);
            print_script_output(&e.operator_output());
            print_error(&e.to_string());
        }
    }
}

/// Form, projection, then the action menu until the operator exits
pub fn run_interactive(config: &ConfiguratorConfig) -> Result<()> {
    let term = Term::stdout();
    let theme = ColorfulTheme::default();

    print_info(&format!(
        "Template: {}  Output: {}",
        config.template_path.display(),
        config.output_path.display()
    ));

    let mut params = prompt_genesis(&theme, &config.genesis)?;
    let mut node = config.node.clone();
    show_projection(&params.policy, config.periods);

    let choices = [
        "🔧 Adjust parameters",
        "📄 Generate genesis file",
        "🚀 Run node initialization",
        "🚪 Exit",
    ];

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&choices)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let _ = term.clear_screen();
                params = prompt_genesis(&theme, &params)?;
                show_projection(&params.policy, config.periods);
            }
            1 => generate_genesis(config, &params),
            2 => {
                node = prompt_node_setup(&theme, &node)?;
                run_node_initialization(config, &node);
            }
            _ => {
                println!();
                println!("{}", style("  👋 Goodbye!").cyan());
                println!();
                info!("Interactive session finished");
                return Ok(());
            }
        }
    }
}
