use anchor_lang::prelude::*;
use anchor_lang::error::Error;
use crate::state::{CurrencyRoute, ModuleGlobals};

/// Anchor error code carried by `err`, or `u32::MAX` for raw program errors.
pub fn error_code(err: &Error) -> u32 {
    match err {
        Error::AnchorError(e) => e.error_code_number,
        Error::ProgramError(_) => u32::MAX,
    }
}

pub fn globals(governance: Pubkey) -> ModuleGlobals {
    ModuleGlobals {
        governance,
        hub_program: Pubkey::new_unique(),
        hub_authority: Pubkey::new_unique(),
        treasury: Pubkey::new_unique(),
        treasury_fee_bps: 500,
        delegation_vault_program: Pubkey::new_unique(),
        next_slot: 0,
        total_staked: 0,
        total_positions: 0,
        bump: 255,
    }
}

pub fn route(currency: Pubkey) -> CurrencyRoute {
    CurrencyRoute {
        currency,
        yield_pool: Pubkey::new_unique(),
        position_mint: Pubkey::new_unique(),
        bump: 254,
    }
}
