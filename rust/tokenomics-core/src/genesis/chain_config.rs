// EVM chain config written into app_state.evm.params
use serde_json::{json, Value};

/// Fork activation blocks, all active from genesis
pub const FORK_BLOCKS: [&str; 14] = [
    "homestead_block",
    "dao_fork_block",
    "eip150_block",
    "eip155_block",
    "eip158_block",
    "byzantium_block",
    "constantinople_block",
    "petersburg_block",
    "istanbul_block",
    "muir_glacier_block",
    "berlin_block",
    "london_block",
    "arrow_glacier_block",
    "gray_glacier_block",
];

pub const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

/// The chain_config object that replaces any existing value
pub fn default_chain_config() -> Value {
    json!({
        "homestead_block": "0x0",
        "dao_fork_block": "0x0",
        "dao_fork_support": true,
        "eip150_block": "0x0",
        "eip150_hash": ZERO_HASH,
        "eip155_block": "0x0",
        "eip158_block": "0x0",
        "byzantium_block": "0x0",
        "constantinople_block": "0x0",
        "petersburg_block": "0x0",
        "istanbul_block": "0x0",
        "muir_glacier_block": "0x0",
        "berlin_block": "0x0",
        "london_block": "0x0",
        "arrow_glacier_block": "0x0",
        "gray_glacier_block": "0x0"
    })
}
