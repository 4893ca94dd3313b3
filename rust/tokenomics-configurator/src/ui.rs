// UI utilities for the configurator

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokenomics_core::{Decimal, ProjectionResult, BASE_UNITS_PER_TOKEN};

/// Create a spinner with a message
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Format number with commas for readability
pub fn format_with_commas(n: u128) -> String {
    let s = n.to_string();
    let chars: Vec<char> = s.chars().rev().collect();
    let mut result = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result.chars().rev().collect()
}

/// Format a decimal with thousands separators and `dp` fractional digits
pub fn format_decimal(value: &Decimal, dp: u32) -> String {
    let rounded = value.round_dp(dp);
    let sign = if rounded.is_negative() { "-" } else { "" };
    let abs = rounded.abs();
    let whole = abs.trunc();
    let whole_str = whole
        .to_u128()
        .map(format_with_commas)
        .unwrap_or_else(|| whole.to_string());

    if dp == 0 {
        return format!("{}{}", sign, whole_str);
    }

    // "0.5" -> "50" for two places
    let frac = (&abs - &whole).to_string();
    let digits = frac.split('.').nth(1).unwrap_or("");
    format!("{}{}.{:0<width$}", sign, whole_str, digits, width = dp as usize)
}

/// Base units to whole tokens
pub fn to_tokens(base_units: &Decimal) -> Decimal {
    base_units
        .checked_div(&Decimal::from(BASE_UNITS_PER_TOKEN))
        .unwrap_or_else(Decimal::zero)
}

/// Fraction as a percentage with two decimals
pub fn format_percent(fraction: &Decimal) -> String {
    format!("{}%", format_decimal(&(fraction * &Decimal::from(100u64)), 2))
}

/// Projection as a fixed-width table, amounts in whole tokens
pub fn render_projection_table(result: &ProjectionResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  {:>4}  {:>10}  {:>28}  {:>22}  {:>11}\n",
        "Year", "Inflation", "Total Supply (tokens)", "Provision/Block", "Staking APR"
    ));
    out.push_str(&format!("  {}\n", "─".repeat(85)));

    for point in result.points() {
        out.push_str(&format!(
            "  {:>4}  {:>10}  {:>28}  {:>22}  {:>11}\n",
            point.period,
            format_percent(&point.inflation),
            format_decimal(&to_tokens(&point.total_supply), 2),
            format_decimal(&to_tokens(&point.provision_per_block), 4),
            format_percent(&point.staking_apr),
        ));
    }

    out
}

/// Print a horizontal line
pub fn print_line() {
    println!("{}", style("─".repeat(50)).dim());
}

/// Print a section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", style(title).cyan().bold());
    println!();
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{}", style(format!("  ✅ {}", message)).green());
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{}", style(format!("  ❌ {}", message)).red());
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{}", style(format!("  ⚠️  {}", message)).yellow());
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{}", style(format!("  ℹ️  {}", message)).blue());
}

/// Print captured script output indented under a frame
pub fn print_script_output(output: &str) {
    print_line();
    for line in output.lines() {
        println!("  {}", line);
    }
    print_line();
}
