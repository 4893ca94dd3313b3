// Tokenomics Configurator - Entry point
// Principle: the terminal front-end owns no policy logic, it collects parameters and calls the core

mod chart;
mod cli;
mod form;
mod runner;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use console::{style, Term};
use tokenomics_core::ConfiguratorConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_filter = if cli.verbose { "debug" } else { &cli.log_level };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter)))
        .with_writer(std::io::stderr)
        .init();

    if let Some(Commands::InitConfig(cmd)) = &cli.command {
        return runner::init_config(&cli.config, cmd.force);
    }

    let config = ConfiguratorConfig::load_or_default(&cli.config)?;
    config.validate()?;
    info!(config = %cli.config.display(), "Configuration loaded");

    match cli.command {
        None => {
            let _ = Term::stdout().clear_screen();
            print_banner();
            form::run_interactive(&config)
        }
        Some(Commands::Simulate(cmd)) => runner::simulate(&config, &cmd),
        Some(Commands::Genesis(cmd)) => runner::genesis(&config, &cmd),
        Some(Commands::Bootstrap(cmd)) => runner::bootstrap(&config, &cmd),
        Some(Commands::InitConfig(_)) => Ok(()),
    }
}

fn print_banner() {
    println!();
    println!("{}", style("  ╔═══════════════════════════════════════╗").cyan());
    println!("{}", style("  ║                                       ║").cyan());
    println!("{}", style("  ║     📊 TOKENOMICS CONFIGURATOR 📊     ║").cyan());
    println!("{}", style("  ║                                       ║").cyan());
    println!("{}", style(format!("  ║{:^39}║", format!("v{}", VERSION))).cyan());
    println!("{}", style("  ║                                       ║").cyan());
    println!("{}", style("  ╚═══════════════════════════════════════╝").cyan());
    println!();
}
