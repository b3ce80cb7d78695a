use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use crate::accounting::{authorize_release, release};
use crate::adapters::DelegationVaultCpi;
use crate::constants::{ESCROW_SEED, GLOBALS_SEED, POSITION_SEED};
use crate::errors::YieldDelegationError;
use crate::events::PositionReleased;
use crate::state::{DelegationPosition, EntityConfig, ModuleGlobals};

#[derive(Accounts)]
pub struct Undelegate<'info> {
    /// Config recipient
    pub recipient: Signer<'info>,

    #[account(
        seeds = [GLOBALS_SEED],
        bump = globals.bump,
    )]
    pub globals: Box<Account<'info, ModuleGlobals>>,

    pub entity_config: Box<Account<'info, EntityConfig>>,

    /// CHECK: PDA signing as delegator
    #[account(
        seeds = [ESCROW_SEED],
        bump,
    )]
    pub escrow_authority: UncheckedAccount<'info>,

    /// Mint every position in the batch was delegated in
    pub position_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Receives the withdrawn position tokens
    #[account(
        mut,
        constraint = recipient_position_account.mint == position_mint.key() @ YieldDelegationError::InvalidTokenAccount,
        constraint = recipient_position_account.owner == recipient.key() @ YieldDelegationError::InvalidTokenAccount,
    )]
    pub recipient_position_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Fixed by globals
    #[account(
        executable,
        address = globals.delegation_vault_program @ YieldDelegationError::InvalidParameters,
    )]
    pub delegation_vault_program: UncheckedAccount<'info>,

    /// CHECK: Validated by the vault program
    #[account(mut)]
    pub vault_state: UncheckedAccount<'info>,

    /// CHECK: Validated by the vault program
    #[account(mut)]
    pub vault_position_account: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    // remaining_accounts: [position, delegation] per counterparty, in order
}

/// Withdraws the positions of `counterparties` back to stake for the
/// recipient. Any failing position aborts the whole batch.
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Undelegate<'info>>,
    counterparties: Vec<Pubkey>,
) -> Result<()> {
    let accounts = &ctx.accounts;
    let recipient = accounts.recipient.key();
    let entity_config = accounts.entity_config.key();

    authorize_release(&accounts.entity_config, &recipient)?;
    require!(
        !counterparties.is_empty()
            && ctx.remaining_accounts.len() == counterparties.len() * 2,
        YieldDelegationError::InvalidPositionAccount
    );

    let now = Clock::get()?.unix_timestamp;
    let (_, escrow_bump) = Pubkey::find_program_address(&[ESCROW_SEED], ctx.program_id);
    let bump = [escrow_bump];
    let seeds: &[&[u8]] = &[ESCROW_SEED, &bump];
    let signer_seeds: &[&[&[u8]]] = &[seeds];

    for (counterparty, pair) in counterparties.iter().zip(ctx.remaining_accounts.chunks(2)) {
        let position_info = &pair[0];
        let delegation_info = &pair[1];

        let (expected, _) = Pubkey::find_program_address(
            &[POSITION_SEED, entity_config.as_ref(), counterparty.as_ref()],
            ctx.program_id,
        );
        require_keys_eq!(
            position_info.key(),
            expected,
            YieldDelegationError::InvalidPositionAccount
        );
        let position: Account<'info, DelegationPosition> = Account::try_from(position_info)?;
        require_keys_eq!(
            position.entity_config,
            entity_config,
            YieldDelegationError::InvalidPositionAccount
        );
        position.assert_mint(&accounts.position_mint.key())?;

        let mut vault = DelegationVaultCpi {
            program: accounts.delegation_vault_program.to_account_info(),
            vault_state: accounts.vault_state.to_account_info(),
            delegation: delegation_info.clone(),
            vault_position_account: accounts.vault_position_account.to_account_info(),
            position_mint: accounts.position_mint.to_account_info(),
            escrow_authority: accounts.escrow_authority.to_account_info(),
            token_program: accounts.token_program.to_account_info(),
            escrow_position_account: None,
            payer: None,
            system_program: None,
            stake_destination: Some(accounts.recipient_position_account.to_account_info()),
            signer_seeds,
        };
        let delegation = release(&position, now, &mut vault)?;

        msg!(
            "Released slot {} ({} position tokens) from {} via {}",
            position.slot,
            position.staked_amount,
            counterparty,
            delegation
        );
        emit!(PositionReleased {
            entity_config,
            counterparty: *counterparty,
            recipient,
            slot: position.slot,
            staked_amount: position.staked_amount,
            timestamp: now,
        });
    }

    Ok(())
}
