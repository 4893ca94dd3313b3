// Types - Parameter records shared by the engine, the transformer and the front-ends
// Principle: one immutable record per operator action, no global form state

use crate::decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Smallest denomination units per whole token (10^18, "atto" units)
pub const BASE_UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

pub const DEFAULT_MINT_DENOM: &str = "aauth";
pub const DEFAULT_BLOCKS_PER_YEAR: u64 = 6_311_520;
pub const DEFAULT_MAX_SUPPLY_TOKENS: u64 = 1_000_000_000;
pub const DEFAULT_MIN_DEPOSIT_TOKENS: u64 = 10_000_000;
pub const DEFAULT_VALIDATOR_TOKENS: u64 = 10_500_000;

/// Monetary-policy inputs of the projection engine
///
/// Fractions are plain decimals (0.13 = 13%). `max_supply` is expressed in
/// smallest denomination units and has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyParameters {
    /// Per-period decay factor applied to inflation
    pub inflation_rate_change: Decimal,
    /// Starting inflation (period 0)
    pub inflation_max: Decimal,
    /// Inflation floor
    pub inflation_min: Decimal,
    /// Target bonded ratio, used as the bonded ratio for APR
    pub goal_bonded: Decimal,
    /// Expected blocks per year
    pub blocks_per_year: u64,
    /// Initial total supply in base units
    pub max_supply: Decimal,
}

impl Default for PolicyParameters {
    fn default() -> Self {
        Self {
            inflation_rate_change: Decimal::new(13, 2),
            inflation_max: Decimal::new(20, 2),
            inflation_min: Decimal::new(7, 2),
            goal_bonded: Decimal::new(67, 2),
            blocks_per_year: DEFAULT_BLOCKS_PER_YEAR,
            max_supply: Decimal::from(tokens_to_base_units(DEFAULT_MAX_SUPPLY_TOKENS)),
        }
    }
}

impl PolicyParameters {
    /// Replace the supply with an amount given in whole tokens
    pub fn with_max_supply_tokens(mut self, tokens: u64) -> Self {
        self.max_supply = Decimal::from(tokens_to_base_units(tokens));
        self
    }

    /// Range checks applied by the front-ends before building a request.
    /// The projection engine itself never calls this.
    pub fn check_ranges(&self) -> Result<(), ParameterError> {
        check_fraction("inflation_rate_change", &self.inflation_rate_change)?;
        check_fraction("inflation_max", &self.inflation_max)?;
        check_fraction("inflation_min", &self.inflation_min)?;
        check_fraction("goal_bonded", &self.goal_bonded)?;

        if self.inflation_min > self.inflation_max {
            return Err(ParameterError::InflationBoundsInverted {
                min: self.inflation_min.clone(),
                max: self.inflation_max.clone(),
            });
        }
        if self.blocks_per_year == 0 {
            return Err(ParameterError::ZeroBlocksPerYear);
        }
        if self.max_supply.is_negative() {
            return Err(ParameterError::OutOfRange {
                name: "max_supply",
                value: self.max_supply.to_string(),
            });
        }
        Ok(())
    }
}

/// Governance module inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceParameters {
    pub voting_period: String,
    pub expedited_voting_period: String,
    pub max_deposit_period: String,
    /// Minimum proposal deposit in whole tokens
    pub min_deposit: u64,
}

impl Default for GovernanceParameters {
    fn default() -> Self {
        Self {
            voting_period: "600s".to_string(),
            expedited_voting_period: "300s".to_string(),
            max_deposit_period: "600s".to_string(),
            min_deposit: DEFAULT_MIN_DEPOSIT_TOKENS,
        }
    }
}

impl GovernanceParameters {
    pub fn check_ranges(&self) -> Result<(), ParameterError> {
        check_duration("voting_period", &self.voting_period)?;
        check_duration("expedited_voting_period", &self.expedited_voting_period)?;
        check_duration("max_deposit_period", &self.max_deposit_period)?;
        Ok(())
    }
}

/// Staking module inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakingParameters {
    pub max_validators: u32,
}

impl Default for StakingParameters {
    fn default() -> Self {
        Self { max_validators: 100 }
    }
}

/// Consensus block parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusParameters {
    pub max_gas: u64,
    pub time_iota_ms: u64,
}

impl Default for ConsensusParameters {
    fn default() -> Self {
        Self {
            max_gas: 30_000_000,
            time_iota_ms: 6000,
        }
    }
}

/// Everything the genesis transformer writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisParameters {
    pub mint_denom: String,
    pub policy: PolicyParameters,
    pub governance: GovernanceParameters,
    pub staking: StakingParameters,
    pub consensus: ConsensusParameters,
}

impl Default for GenesisParameters {
    fn default() -> Self {
        Self {
            mint_denom: DEFAULT_MINT_DENOM.to_string(),
            policy: PolicyParameters::default(),
            governance: GovernanceParameters::default(),
            staking: StakingParameters::default(),
            consensus: ConsensusParameters::default(),
        }
    }
}

impl GenesisParameters {
    pub fn check_ranges(&self) -> Result<(), ParameterError> {
        self.policy.check_ranges()?;
        if self.mint_denom.trim().is_empty() {
            return Err(ParameterError::EmptyDenom);
        }
        self.governance.check_ranges()?;
        if self.staking.max_validators == 0 {
            return Err(ParameterError::OutOfRange {
                name: "max_validators",
                value: "0".to_string(),
            });
        }
        if self.consensus.max_gas == 0 {
            return Err(ParameterError::OutOfRange {
                name: "max_gas",
                value: "0".to_string(),
            });
        }
        if self.consensus.time_iota_ms == 0 {
            return Err(ParameterError::OutOfRange {
                name: "time_iota_ms",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Convert whole tokens to base units (cannot overflow: u64::MAX × 10^18 < u128::MAX)
pub fn tokens_to_base_units(tokens: u64) -> u128 {
    u128::from(tokens) * BASE_UNITS_PER_TOKEN
}

/// Normalized decimal string as written into genesis ("0.2", not "0.20")
pub fn decimal_string(value: &Decimal) -> String {
    value.to_string()
}

fn check_fraction(name: &'static str, value: &Decimal) -> Result<(), ParameterError> {
    if value.is_negative() || *value > Decimal::one() {
        return Err(ParameterError::OutOfRange {
            name,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Protobuf JSON durations: "<seconds>s" with an optional fraction
pub fn check_duration(name: &'static str, value: &str) -> Result<(), ParameterError> {
    let invalid = || ParameterError::InvalidDuration {
        name,
        value: value.to_string(),
    };
    let body = value.strip_suffix('s').ok_or_else(invalid)?;
    let (whole, frac) = match body.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (body, None),
    };
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if let Some(frac) = frac {
        if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
    }
    Ok(())
}

/// Front-end parameter errors
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("{name} out of range: {value}")]
    OutOfRange { name: &'static str, value: String },

    #[error("inflation_min ({min}) exceeds inflation_max ({max})")]
    InflationBoundsInverted { min: Decimal, max: Decimal },

    #[error("blocks_per_year must be at least 1")]
    ZeroBlocksPerYear,

    #[error("Invalid duration for {name}: {value} (expected e.g. \"600s\")")]
    InvalidDuration { name: &'static str, value: String },

    #[error("Mint denomination must not be empty")]
    EmptyDenom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PolicyParameters::default();
        assert_eq!(policy.inflation_max, Decimal::new(20, 2));
        assert_eq!(policy.blocks_per_year, 6_311_520);
        assert_eq!(policy.max_supply.to_string(), "1000000000000000000000000000");
        assert!(policy.check_ranges().is_ok());
    }

    #[test]
    fn test_with_max_supply_tokens() {
        let policy = PolicyParameters::default().with_max_supply_tokens(21_000_000);
        assert_eq!(policy.max_supply.to_string(), "21000000000000000000000000");
    }

    #[test]
    fn test_large_supplies_are_exact() {
        // 10^11 and 10^12 tokens are 10^29 and 10^30 base units
        let policy = PolicyParameters::default().with_max_supply_tokens(100_000_000_000);
        assert_eq!(policy.max_supply.to_string(), format!("1{}", "0".repeat(29)));

        let policy = PolicyParameters::default().with_max_supply_tokens(1_000_000_000_000);
        assert_eq!(policy.max_supply.to_string(), format!("1{}", "0".repeat(30)));
        assert!(policy.check_ranges().is_ok());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let policy = PolicyParameters {
            inflation_min: Decimal::new(30, 2),
            ..PolicyParameters::default()
        };
        assert!(matches!(
            policy.check_ranges(),
            Err(ParameterError::InflationBoundsInverted { .. })
        ));
    }

    #[test]
    fn test_fraction_out_of_range() {
        let policy = PolicyParameters {
            goal_bonded: Decimal::new(15, 1),
            ..PolicyParameters::default()
        };
        assert!(matches!(
            policy.check_ranges(),
            Err(ParameterError::OutOfRange { name: "goal_bonded", .. })
        ));
    }

    #[test]
    fn test_tokens_to_base_units() {
        assert_eq!(tokens_to_base_units(0), 0);
        assert_eq!(tokens_to_base_units(1), BASE_UNITS_PER_TOKEN);
        assert_eq!(tokens_to_base_units(10_000_000), 10_000_000_000_000_000_000_000_000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let policy: PolicyParameters = serde_json::from_str(r#"{ "inflation_max": "0.25" }"#).unwrap();
        assert_eq!(policy.inflation_max, Decimal::new(25, 2));
        assert_eq!(policy.inflation_min, Decimal::new(7, 2));
        assert_eq!(policy.blocks_per_year, DEFAULT_BLOCKS_PER_YEAR);
    }

    #[test]
    fn test_duration_validation() {
        assert!(check_duration("voting_period", "600s").is_ok());
        assert!(check_duration("voting_period", "1.5s").is_ok());
        assert!(check_duration("voting_period", "600").is_err());
        assert!(check_duration("voting_period", "s").is_err());
        assert!(check_duration("voting_period", "10m").is_err());
        assert!(check_duration("voting_period", "1.s").is_err());
    }

    #[test]
    fn test_decimal_string_normalizes() {
        assert_eq!(decimal_string(&Decimal::new(20, 2)), "0.2");
        assert_eq!(decimal_string(&Decimal::new(13, 2)), "0.13");
        assert_eq!(decimal_string(&Decimal::from(6_311_520u64)), "6311520");
    }

    #[test]
    fn test_genesis_parameters_checks() {
        let mut params = GenesisParameters::default();
        assert!(params.check_ranges().is_ok());

        params.mint_denom = "  ".to_string();
        assert!(matches!(params.check_ranges(), Err(ParameterError::EmptyDenom)));
    }
}
