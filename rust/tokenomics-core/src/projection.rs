// Projection - Year-by-year inflation, supply, block reward and staking APR
// Principle: pure decimal arithmetic, conversion to floats only for display

use crate::decimal::Decimal;
use crate::types::PolicyParameters;
use serde::Serialize;
use tracing::debug;

/// Default projection horizon in years
pub const DEFAULT_PERIODS: u32 = 10;

/// Projection engine errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("Division by zero: blocks_per_year must be positive")]
    DivisionByZero,

    #[error("Projection needs at least one period")]
    NoPeriods,
}

/// Four parallel series, one entry per simulated period (index 0 = period 1).
/// Serialized as normalized decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionResult {
    inflation: Vec<Decimal>,
    total_supply: Vec<Decimal>,
    provision_per_block: Vec<Decimal>,
    staking_apr: Vec<Decimal>,
}

/// One row of a projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionPoint {
    pub period: u32,
    pub inflation: Decimal,
    pub total_supply: Decimal,
    pub provision_per_block: Decimal,
    pub staking_apr: Decimal,
}

impl ProjectionResult {
    fn with_capacity(periods: usize) -> Self {
        Self {
            inflation: Vec::with_capacity(periods),
            total_supply: Vec::with_capacity(periods),
            provision_per_block: Vec::with_capacity(periods),
            staking_apr: Vec::with_capacity(periods),
        }
    }

    pub fn periods(&self) -> usize {
        self.inflation.len()
    }

    pub fn inflation(&self) -> &[Decimal] {
        &self.inflation
    }

    pub fn total_supply(&self) -> &[Decimal] {
        &self.total_supply
    }

    pub fn provision_per_block(&self) -> &[Decimal] {
        &self.provision_per_block
    }

    pub fn staking_apr(&self) -> &[Decimal] {
        &self.staking_apr
    }

    /// Row view, in period order
    pub fn points(&self) -> impl Iterator<Item = ProjectionPoint> + '_ {
        (0..self.periods()).map(move |i| ProjectionPoint {
            period: i as u32 + 1,
            inflation: self.inflation[i].clone(),
            total_supply: self.total_supply[i].clone(),
            provision_per_block: self.provision_per_block[i].clone(),
            staking_apr: self.staking_apr[i].clone(),
        })
    }

    /// Lossy conversion for charts
    pub fn display_series(&self) -> DisplaySeries {
        DisplaySeries {
            inflation: to_f64_series(&self.inflation),
            total_supply: to_f64_series(&self.total_supply),
            provision_per_block: to_f64_series(&self.provision_per_block),
            staking_apr: to_f64_series(&self.staking_apr),
        }
    }
}

/// Float copy of a projection, for rendering only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySeries {
    pub inflation: Vec<f64>,
    pub total_supply: Vec<f64>,
    pub provision_per_block: Vec<f64>,
    pub staking_apr: Vec<f64>,
}

fn to_f64_series(values: &[Decimal]) -> Vec<f64> {
    values.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect()
}

/// Run the projection for `periods` years.
///
/// Inflation starts at `inflation_max` and each period is decayed by
/// `inflation_rate_change`, then clamped with `min(_, inflation_min)`. The
/// clamp is a floor-seeking update: inflation never rises above
/// `inflation_min` after period 1. Supply compounds with the annual provisions.
///
/// Supplies have no upper bound. Products and quotients keep
/// `decimal::PRECISION` significant digits.
pub fn project(params: &PolicyParameters, periods: u32) -> Result<ProjectionResult, SimulationError> {
    if params.blocks_per_year == 0 {
        return Err(SimulationError::DivisionByZero);
    }
    if periods == 0 {
        return Err(SimulationError::NoPeriods);
    }

    let blocks_per_year = Decimal::from(params.blocks_per_year);
    let decay = &Decimal::one() - &params.inflation_rate_change;
    let bonded_ratio = &params.goal_bonded;

    let mut inflation = params.inflation_max.clone();
    let mut total_supply = params.max_supply.clone();
    let mut result = ProjectionResult::with_capacity(periods as usize);

    for _ in 0..periods {
        inflation = (&inflation * &decay).min(params.inflation_min.clone());

        let annual_provisions = &inflation * &total_supply;
        let provision_per_block = annual_provisions
            .checked_div(&blocks_per_year)
            .ok_or(SimulationError::DivisionByZero)?;
        total_supply = &total_supply + &annual_provisions;

        let staking_apr = if bonded_ratio.is_zero() || bonded_ratio.is_negative() {
            Decimal::zero()
        } else {
            inflation.checked_div(bonded_ratio).ok_or(SimulationError::DivisionByZero)?
        };

        result.inflation.push(inflation.clone());
        result.total_supply.push(total_supply.clone());
        result.provision_per_block.push(provision_per_block);
        result.staking_apr.push(staking_apr);
    }

    debug!(
        periods,
        final_inflation = %inflation,
        final_supply = %total_supply,
        "Projection computed"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scenario_params() -> PolicyParameters {
        PolicyParameters {
            inflation_rate_change: dec("0.13"),
            inflation_max: dec("0.20"),
            inflation_min: dec("0.07"),
            goal_bonded: dec("0.67"),
            blocks_per_year: 6_311_520,
            max_supply: dec("1000000000000000000000000000"),
        }
    }

    #[test]
    fn test_single_period_scenario() {
        let result = project(&scenario_params(), 1).unwrap();
        assert_eq!(result.periods(), 1);

        // min(0.20 × 0.87, 0.07) = 0.07
        assert_eq!(result.inflation()[0], dec("0.07"));

        let provision = result.provision_per_block()[0].to_f64().unwrap();
        assert!((provision / 1.109e19 - 1.0).abs() < 1e-3, "provision = {}", provision);

        let apr = result.staking_apr()[0].to_f64().unwrap();
        assert!((apr - 0.10448).abs() < 1e-5, "apr = {}", apr);

        assert_eq!(result.total_supply()[0], dec("1070000000000000000000000000"));
    }

    #[test]
    fn test_default_horizon_lengths() {
        let result = project(&scenario_params(), DEFAULT_PERIODS).unwrap();
        assert_eq!(result.inflation().len(), 10);
        assert_eq!(result.total_supply().len(), 10);
        assert_eq!(result.provision_per_block().len(), 10);
        assert_eq!(result.staking_apr().len(), 10);
    }

    #[test]
    fn test_inflation_keeps_decaying_under_floor() {
        let result = project(&scenario_params(), 3).unwrap();
        // 0.07 × 0.87 = 0.0609, then 0.0609 × 0.87 = 0.052983
        assert_eq!(result.inflation()[1], dec("0.0609"));
        assert_eq!(result.inflation()[2], dec("0.052983"));
    }

    #[test]
    fn test_supply_compounds() {
        let result = project(&scenario_params(), 2).unwrap();
        // 10^27 × 1.07 × 1.0609
        assert_eq!(result.total_supply()[1], dec("1135163000000000000000000000"));
    }

    #[test]
    fn test_zero_rate_change_holds_floor() {
        let params = PolicyParameters {
            inflation_rate_change: Decimal::zero(),
            ..scenario_params()
        };
        let result = project(&params, 10).unwrap();
        assert!(result.inflation().iter().all(|i| *i == dec("0.07")));
    }

    #[test]
    fn test_zero_rate_change_below_floor() {
        // inflation_max below inflation_min: min() keeps the max value
        let params = PolicyParameters {
            inflation_rate_change: Decimal::zero(),
            inflation_max: dec("0.05"),
            inflation_min: dec("0.07"),
            ..scenario_params()
        };
        let result = project(&params, 5).unwrap();
        assert!(result.inflation().iter().all(|i| *i == dec("0.05")));
    }

    #[test]
    fn test_decay_below_floor() {
        // 0.05 × 0.5 = 0.025, then 0.0125 ... all below the 0.07 floor
        let params = PolicyParameters {
            inflation_rate_change: dec("0.5"),
            inflation_max: dec("0.05"),
            ..scenario_params()
        };
        let result = project(&params, 2).unwrap();
        assert_eq!(result.inflation()[0], dec("0.025"));
        assert_eq!(result.inflation()[1], dec("0.0125"));
    }

    #[test]
    fn test_zero_bonded_ratio_yields_zero_apr() {
        let params = PolicyParameters {
            goal_bonded: Decimal::zero(),
            ..scenario_params()
        };
        let result = project(&params, 10).unwrap();
        assert!(result.staking_apr().iter().all(|apr| apr.is_zero()));
    }

    #[test]
    fn test_zero_blocks_per_year() {
        let params = PolicyParameters {
            blocks_per_year: 0,
            ..scenario_params()
        };
        assert_eq!(project(&params, 10), Err(SimulationError::DivisionByZero));
    }

    #[test]
    fn test_zero_periods() {
        assert_eq!(project(&scenario_params(), 0), Err(SimulationError::NoPeriods));
    }

    #[test]
    fn test_trillion_token_supply() {
        // 10^12 tokens = 10^30 base units, compounded over the default horizon
        let params = scenario_params().with_max_supply_tokens(1_000_000_000_000);
        let result = project(&params, DEFAULT_PERIODS).unwrap();
        assert_eq!(result.periods(), 10);
        assert_eq!(result.total_supply()[0], dec("1070000000000000000000000000000"));
        assert!(result.total_supply().windows(2).all(|w| w[1] >= w[0]));

        // same relative growth as the 10^9 token scenario, shifted by 10^3
        let base = project(&scenario_params(), DEFAULT_PERIODS).unwrap();
        let shifted = dec(&format!("{}e3", base.total_supply()[9]));
        assert_eq!(result.total_supply()[9], shifted);
    }

    #[test]
    fn test_supply_past_fixed_point_range() {
        // 10^11 tokens start at 10^29 base units, beyond a 96-bit mantissa
        let params = PolicyParameters {
            inflation_rate_change: Decimal::zero(),
            inflation_max: Decimal::one(),
            inflation_min: Decimal::one(),
            ..scenario_params().with_max_supply_tokens(100_000_000_000)
        };
        let result = project(&params, 3).unwrap();
        // supply doubles every period
        assert_eq!(result.total_supply()[2], dec("8e29"));
    }

    #[test]
    fn test_points_follow_period_order() {
        let result = project(&scenario_params(), 4).unwrap();
        let points: Vec<_> = result.points().collect();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].period, 1);
        assert_eq!(points[3].period, 4);
        assert_eq!(points[3].total_supply, result.total_supply()[3]);
    }

    #[test]
    fn test_display_series() {
        let series = project(&scenario_params(), 2).unwrap().display_series();
        assert_eq!(series.inflation.len(), 2);
        assert!((series.inflation[0] - 0.07).abs() < 1e-12);
        assert!((series.inflation[1] - 0.0609).abs() < 1e-12);
        assert!((series.total_supply[0] - 1.07e27).abs() / 1.07e27 < 1e-12);
    }
}
