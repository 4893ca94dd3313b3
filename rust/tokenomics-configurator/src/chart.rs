// Chart - Horizontal bar charts for the projection series

use tokenomics_core::ProjectionResult;

pub const BAR_WIDTH: usize = 40;

/// One chart per projected series, in display units
pub fn projection_charts(result: &ProjectionResult) -> Vec<String> {
    let series = result.display_series();
    let tokens = |values: &[f64]| -> Vec<f64> { values.iter().map(|v| v / 1e18).collect() };
    let percent = |values: &[f64]| -> Vec<f64> { values.iter().map(|v| v * 100.0).collect() };

    vec![
        bar_chart("Inflation Rate (%)", &percent(&series.inflation), BAR_WIDTH),
        bar_chart("Total Supply (tokens)", &tokens(&series.total_supply), BAR_WIDTH),
        bar_chart(
            "Provision per Block (tokens)",
            &tokens(&series.provision_per_block),
            BAR_WIDTH,
        ),
        bar_chart("Staking APR (%)", &percent(&series.staking_apr), BAR_WIDTH),
    ]
}

/// Render one bar per year, scaled against the largest finite value.
///
/// Non-finite or negative values draw an empty bar.
pub fn bar_chart(title: &str, values: &[f64], width: usize) -> String {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(0.0_f64, f64::max);

    let mut out = format!("  {}\n", title);
    for (i, value) in values.iter().enumerate() {
        let filled = if max > 0.0 && value.is_finite() && *value > 0.0 {
            ((value / max) * width as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "  {:>3} │{}{} {}\n",
            i + 1,
            "█".repeat(filled),
            " ".repeat(width - filled.min(width)),
            format_value(*value)
        ));
    }
    out
}

/// Compact magnitude label
fn format_value(value: f64) -> String {
    let abs = value.abs();
    if !value.is_finite() {
        "n/a".to_string()
    } else if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}
