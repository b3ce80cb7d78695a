use anchor_lang::prelude::*;
use crate::state::{EntityKey, RouteField};

#[event]
pub struct GlobalsInitialized {
    pub governance: Pubkey,
    pub hub_authority: Pubkey,
    pub treasury: Pubkey,
    pub treasury_fee_bps: u16,
    pub timestamp: i64,
}

#[event]
pub struct GovernanceChanged {
    pub previous: Pubkey,
    pub governance: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct TreasuryChanged {
    pub treasury: Pubkey,
    pub treasury_fee_bps: u16,
    pub timestamp: i64,
}

#[event]
pub struct RouteUpdated {
    pub currency: Pubkey,
    pub field: RouteField,
    pub value: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct ConfigInitialized {
    pub entity_config: Pubkey,
    pub key: EntityKey,
    pub amount: u64,
    pub currency: Pubkey,
    pub recipient: Pubkey,
    pub referral_fee_bps: u16,
    pub follower_only: bool,
    pub lock_duration: i64,
    pub timestamp: i64,
}

#[event]
pub struct PaymentProcessed {
    pub entity_config: Pubkey,
    pub payer: Pubkey,
    pub counterparty: Pubkey,
    pub treasury_amount: u64,
    pub referral_amount: u64,
    pub deposit_amount: u64,
    pub staked_amount: u64,
    /// `None` when nothing was left to deposit
    pub slot: Option<u64>,
    pub unlock_timestamp: i64,
    pub timestamp: i64,
}

/// A payment replaced a position that still pointed at an earlier slot.
#[event]
pub struct PositionOverwritten {
    pub entity_config: Pubkey,
    pub counterparty: Pubkey,
    pub previous_slot: u64,
    pub previous_staked_amount: u64,
    pub slot: u64,
}

#[event]
pub struct PositionReleased {
    pub entity_config: Pubkey,
    pub counterparty: Pubkey,
    pub recipient: Pubkey,
    pub slot: u64,
    pub staked_amount: u64,
    pub timestamp: i64,
}
