use anchor_lang::prelude::*;

pub mod accounting;
pub mod adapters;
pub mod constants;
pub mod errors;
pub mod events;
pub mod fees;
pub mod instructions;
pub mod state;

#[cfg(all(test, not(target_arch = "bpf")))]
pub(crate) mod test_utils;

use instructions::*;
use state::{EntityConfig, EntityKey, InitConfigParams};

declare_id!("6nrBrcz5yLxn5HdW5ZgoCUKSz1nC4uU7k6ruX25t3sjk");

#[program]
pub mod yield_delegation {
    use super::*;

    // === Governance ===

    /// Create the module globals; the signer becomes governance
    pub fn initialize_globals(
        ctx: Context<InitializeGlobals>,
        params: InitializeGlobalsParams,
    ) -> Result<()> {
        instructions::initialize_globals::handler(ctx, params)
    }

    /// Hand governance to a new authority
    pub fn set_governance(ctx: Context<UpdateGlobals>, new_governance: Pubkey) -> Result<()> {
        instructions::update_globals::set_governance(ctx, new_governance)
    }

    /// Change the treasury wallet
    pub fn set_treasury(ctx: Context<UpdateGlobals>, new_treasury: Pubkey) -> Result<()> {
        instructions::update_globals::set_treasury(ctx, new_treasury)
    }

    /// Change the treasury cut
    pub fn set_treasury_fee(ctx: Context<UpdateGlobals>, treasury_fee_bps: u16) -> Result<()> {
        instructions::update_globals::set_treasury_fee(ctx, treasury_fee_bps)
    }

    // === Currency Routes ===

    /// Route a whitelisted currency to its yield pool
    pub fn set_pool_route(ctx: Context<SetRoute>, pool: Pubkey) -> Result<()> {
        instructions::set_route::set_pool_route(ctx, pool)
    }

    /// Route a whitelisted currency to the pool's position token
    pub fn set_ticket_route(ctx: Context<SetRoute>, position_mint: Pubkey) -> Result<()> {
        instructions::set_route::set_ticket_route(ctx, position_mint)
    }

    // === Collect ===

    /// Configure a publication for paid collects (hub only)
    pub fn initialize_collect_config(
        ctx: Context<InitializeCollectConfig>,
        profile_id: u64,
        pub_id: u64,
        params: InitConfigParams,
    ) -> Result<()> {
        instructions::collect::initialize::handler(ctx, profile_id, pub_id, params)
    }

    /// Settle a collect and delegate the yield-bearing residual (hub only)
    pub fn process_collect(
        ctx: Context<ProcessPayment>,
        profile_id: u64,
        pub_id: u64,
        referrer_profile_id: u64,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::collect::process::handler(ctx, profile_id, pub_id, referrer_profile_id, data)
    }

    // === Follow ===

    /// Configure a profile for paid follows (hub only)
    pub fn initialize_follow_config(
        ctx: Context<InitializeFollowConfig>,
        profile_id: u64,
        params: InitConfigParams,
    ) -> Result<()> {
        instructions::follow::initialize::handler(ctx, profile_id, params)
    }

    /// Settle a follow and delegate the yield-bearing residual (hub only)
    pub fn process_follow(
        ctx: Context<ProcessPayment>,
        profile_id: u64,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::follow::process::handler(ctx, profile_id, data)
    }

    // === Positions ===

    /// Withdraw unlocked positions back to stake for the recipient
    pub fn undelegate<'info>(
        ctx: Context<'_, '_, 'info, 'info, Undelegate<'info>>,
        counterparties: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::undelegate::handler(ctx, counterparties)
    }

    /// Return the stored config for an entity
    pub fn get_config(ctx: Context<GetConfig>, key: EntityKey) -> Result<EntityConfig> {
        instructions::get_config::handler(ctx, key)
    }
}
