// Genesis patch - Rewrites the fixed set of policy fields in a genesis template
// Principle: untouched fields pass through, optional EVM section is healed,
// required sections are never repaired

use super::chain_config::default_chain_config;
use super::GenesisError;
use crate::types::{decimal_string, tokens_to_base_units, GenesisParameters};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

const APP_STATE: &[&str] = &["app_state"];
const MINT_PARAMS: &[&str] = &["app_state", "mint", "params"];
const STAKING_PARAMS: &[&str] = &["app_state", "staking", "params"];
const CRISIS_FEE: &[&str] = &["app_state", "crisis", "constant_fee"];
const GOV: &[&str] = &["app_state", "gov"];
const GOV_PARAMS: &[&str] = &["app_state", "gov", "params"];
const CONSENSUS_BLOCK: &[&str] = &["consensus", "params", "block"];

/// Sections that must exist before any field is rewritten
const REQUIRED_SECTIONS: [&[&str]; 6] = [
    APP_STATE,
    MINT_PARAMS,
    STAKING_PARAMS,
    CRISIS_FEE,
    GOV_PARAMS,
    CONSENSUS_BLOCK,
];

/// Apply mint, staking, crisis, governance, EVM and consensus parameters to
/// a genesis template.
///
/// All required sections are checked first; on error nothing has been
/// rewritten and no document is returned.
///
/// Extensions: on top of the denom and period rewrites, two governance
/// fields are written from the form inputs:
/// - `gov.params.expedited_voting_period`
/// - `gov.params.min_deposit[0].amount`, the min deposit in base units
///
/// `gov.voting_params` and `gov.deposit_params` are replaced wholesale with a
/// single-key object each; any other keys they held are dropped.
pub fn apply_policy(mut genesis: Value, params: &GenesisParameters) -> Result<Value, GenesisError> {
    for path in REQUIRED_SECTIONS {
        object_at_mut(&mut genesis, path)?;
    }

    let denom = params.mint_denom.as_str();
    let policy = &params.policy;
    let governance = &params.governance;
    let min_deposit_units = tokens_to_base_units(governance.min_deposit);

    // Mint
    let mint = object_at_mut(&mut genesis, MINT_PARAMS)?;
    set_str(mint, "inflation_rate_change", decimal_string(&policy.inflation_rate_change));
    set_str(mint, "inflation_max", decimal_string(&policy.inflation_max));
    set_str(mint, "inflation_min", decimal_string(&policy.inflation_min));
    set_str(mint, "goal_bonded", decimal_string(&policy.goal_bonded));
    set_str(mint, "blocks_per_year", policy.blocks_per_year.to_string());
    set_str(mint, "mint_denom", denom);

    // Staking
    let staking = object_at_mut(&mut genesis, STAKING_PARAMS)?;
    set_str(staking, "bond_denom", denom);
    staking.insert(
        "max_validators".to_string(),
        Value::from(params.staking.max_validators),
    );

    // Crisis
    set_str(object_at_mut(&mut genesis, CRISIS_FEE)?, "denom", denom);

    // Governance
    let gov_params = object_at_mut(&mut genesis, GOV_PARAMS)?;
    set_str(gov_params, "voting_period", governance.voting_period.as_str());
    set_str(
        gov_params,
        "expedited_voting_period",
        governance.expedited_voting_period.as_str(),
    );
    set_str(gov_params, "max_deposit_period", governance.max_deposit_period.as_str());

    if let Some(first) = first_coin_mut(gov_params, "min_deposit") {
        set_str(first, "denom", denom);
        set_str(first, "amount", min_deposit_units.to_string());
    }
    if let Some(first) = first_coin_mut(gov_params, "expedited_min_deposit") {
        set_str(first, "denom", denom);
    }

    // Legacy v1beta1 duplicates
    let gov = object_at_mut(&mut genesis, GOV)?;
    gov.insert(
        "voting_params".to_string(),
        json!({ "voting_period": governance.voting_period }),
    );
    gov.insert(
        "deposit_params".to_string(),
        json!({ "max_deposit_period": governance.max_deposit_period }),
    );

    // EVM (optional, created if missing)
    let app_state = object_at_mut(&mut genesis, APP_STATE)?;
    let evm = heal_object(app_state, "evm", "app_state.evm")?;
    let evm_params = heal_object(evm, "params", "app_state.evm.params")?;
    set_str(evm_params, "evm_denom", denom);
    evm_params.insert("chain_config".to_string(), default_chain_config());

    // Consensus
    let block = object_at_mut(&mut genesis, CONSENSUS_BLOCK)?;
    set_str(block, "max_gas", params.consensus.max_gas.to_string());
    set_str(block, "time_iota_ms", params.consensus.time_iota_ms.to_string());

    info!(
        denom,
        inflation_max = %policy.inflation_max,
        inflation_min = %policy.inflation_min,
        "Applied policy to genesis template"
    );

    Ok(genesis)
}

/// Walk `path` and return the object there, or `MissingSection`
fn object_at_mut<'a>(root: &'a mut Value, path: &[&str]) -> Result<&'a mut Map<String, Value>, GenesisError> {
    let missing = || GenesisError::MissingSection {
        path: path.join("."),
    };

    let mut node = root;
    for key in path {
        node = node.get_mut(*key).ok_or_else(missing)?;
    }
    node.as_object_mut().ok_or_else(missing)
}

/// Return the object under `key`, inserting `{}` when absent or null
fn heal_object<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a mut Map<String, Value>, GenesisError> {
    let entry = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if entry.is_null() {
        debug!(path, "Healing null section");
        *entry = Value::Object(Map::new());
    }
    entry.as_object_mut().ok_or_else(|| GenesisError::MissingSection {
        path: path.to_string(),
    })
}

/// First coin of a non-empty coin array; empty or absent arrays yield None
fn first_coin_mut<'a>(map: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Map<String, Value>> {
    map.get_mut(key)
        .and_then(Value::as_array_mut)
        .and_then(|coins| coins.first_mut())
        .and_then(Value::as_object_mut)
}

fn set_str(map: &mut Map<String, Value>, key: &str, value: impl Into<String>) {
    map.insert(key.to_string(), Value::String(value.into()));
}
