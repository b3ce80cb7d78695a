use anchor_lang::prelude::*;
use crate::constants::GLOBALS_SEED;
use crate::errors::YieldDelegationError;
use crate::events::GlobalsInitialized;
use crate::state::ModuleGlobals;

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct InitializeGlobalsParams {
    /// Program owning hub profile / follow / whitelist accounts
    pub hub_program: Pubkey,
    /// Signer the hub uses when calling in
    pub hub_authority: Pubkey,
    /// Treasury wallet
    pub treasury: Pubkey,
    /// Treasury cut in basis points
    pub treasury_fee_bps: u16,
    /// Delegation vault program
    pub delegation_vault_program: Pubkey,
}

#[derive(Accounts)]
pub struct InitializeGlobals<'info> {
    /// Becomes the governance authority
    #[account(mut)]
    pub governance: Signer<'info>,

    #[account(
        init,
        payer = governance,
        space = ModuleGlobals::SIZE,
        seeds = [GLOBALS_SEED],
        bump,
    )]
    pub globals: Account<'info, ModuleGlobals>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeGlobals>, params: InitializeGlobalsParams) -> Result<()> {
    ModuleGlobals::validate_treasury_fee(params.treasury_fee_bps)?;
    for key in [
        params.hub_program,
        params.hub_authority,
        params.treasury,
        params.delegation_vault_program,
    ] {
        require!(key != Pubkey::default(), YieldDelegationError::InvalidParameters);
    }

    let globals = &mut ctx.accounts.globals;
    globals.governance = ctx.accounts.governance.key();
    globals.hub_program = params.hub_program;
    globals.hub_authority = params.hub_authority;
    globals.treasury = params.treasury;
    globals.treasury_fee_bps = params.treasury_fee_bps;
    globals.delegation_vault_program = params.delegation_vault_program;
    globals.next_slot = 0;
    globals.total_staked = 0;
    globals.total_positions = 0;
    globals.bump = ctx.bumps.globals;

    msg!(
        "Initialized globals: governance {}, treasury {} at {} bps",
        globals.governance,
        globals.treasury,
        globals.treasury_fee_bps
    );

    emit!(GlobalsInitialized {
        governance: globals.governance,
        hub_authority: globals.hub_authority,
        treasury: globals.treasury,
        treasury_fee_bps: globals.treasury_fee_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
