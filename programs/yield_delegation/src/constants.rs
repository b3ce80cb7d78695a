use anchor_lang::prelude::*;

// SEEDS
// Globals = singleton
// Route = currency mint
// Collect config = profile_id + pub_id (little endian)
// Follow config = profile_id (little endian)
// Position = entity config key + counterparty
pub const GLOBALS_SEED: &[u8] = b"globals";
pub const ROUTE_SEED: &[u8] = b"currency_route";
pub const COLLECT_CONFIG_SEED: &[u8] = b"collect_config";
pub const FOLLOW_CONFIG_SEED: &[u8] = b"follow_config";
pub const POSITION_SEED: &[u8] = b"position";
pub const ESCROW_SEED: &[u8] = b"escrow";

#[constant]
pub const BPS_MAX: u16 = 10_000;

/// Upper bound (exclusive) on a configured lock duration: 180 days.
#[constant]
pub const MAX_LOCK: i64 = 180 * 24 * 60 * 60;
