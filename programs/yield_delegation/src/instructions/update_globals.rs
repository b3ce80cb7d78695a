use anchor_lang::prelude::*;
use crate::constants::GLOBALS_SEED;
use crate::errors::YieldDelegationError;
use crate::events::{GovernanceChanged, TreasuryChanged};
use crate::state::ModuleGlobals;

#[derive(Accounts)]
pub struct UpdateGlobals<'info> {
    pub governance: Signer<'info>,

    #[account(
        mut,
        seeds = [GLOBALS_SEED],
        bump = globals.bump,
        constraint = globals.is_governance(&governance.key()) @ YieldDelegationError::NotGovernance,
    )]
    pub globals: Account<'info, ModuleGlobals>,
}

pub fn set_governance(ctx: Context<UpdateGlobals>, new_governance: Pubkey) -> Result<()> {
    require!(new_governance != Pubkey::default(), YieldDelegationError::InvalidParameters);

    let globals = &mut ctx.accounts.globals;
    let previous = globals.governance;
    globals.governance = new_governance;

    msg!("Set governance to {}", new_governance);
    emit!(GovernanceChanged {
        previous,
        governance: new_governance,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn set_treasury(ctx: Context<UpdateGlobals>, new_treasury: Pubkey) -> Result<()> {
    require!(new_treasury != Pubkey::default(), YieldDelegationError::InvalidParameters);

    let globals = &mut ctx.accounts.globals;
    globals.treasury = new_treasury;

    msg!("Set treasury to {}", new_treasury);
    emit!(TreasuryChanged {
        treasury: globals.treasury,
        treasury_fee_bps: globals.treasury_fee_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn set_treasury_fee(ctx: Context<UpdateGlobals>, treasury_fee_bps: u16) -> Result<()> {
    ModuleGlobals::validate_treasury_fee(treasury_fee_bps)?;

    let globals = &mut ctx.accounts.globals;
    globals.treasury_fee_bps = treasury_fee_bps;

    msg!("Set treasury fee to {} bps", treasury_fee_bps);
    emit!(TreasuryChanged {
        treasury: globals.treasury,
        treasury_fee_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
