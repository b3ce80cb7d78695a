use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::AccountMeta;
use anchor_spl::token_interface::TokenAccount;
use crate::accounting::{PositionBalance, YieldPool};
use crate::adapters::{instruction_data, invoke_external};
use crate::errors::YieldDelegationError;

/// CPI adapter for the external yield pool's `deposit_to` instruction. The
/// engine escrow PDA is the depositor and the beneficiary.
pub struct YieldPoolCpi<'a, 'info> {
    pub program: AccountInfo<'info>,
    pub pool: AccountInfo<'info>,
    pub pool_currency_vault: AccountInfo<'info>,
    pub currency_mint: AccountInfo<'info>,
    pub position_mint: AccountInfo<'info>,
    pub escrow_authority: AccountInfo<'info>,
    pub escrow_currency_account: AccountInfo<'info>,
    pub escrow_position_account: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

impl<'a, 'info> YieldPool for YieldPoolCpi<'a, 'info> {
    fn deposit_to(&mut self, beneficiary: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(
            *beneficiary,
            self.escrow_authority.key(),
            YieldDelegationError::InvalidPositionAccount
        );
        require_keys_eq!(
            *self.pool.owner,
            self.program.key(),
            YieldDelegationError::NoYieldPoolConfigured
        );

        let metas = vec![
            AccountMeta::new(self.pool.key(), false),
            AccountMeta::new(self.pool_currency_vault.key(), false),
            AccountMeta::new_readonly(self.currency_mint.key(), false),
            AccountMeta::new(self.position_mint.key(), false),
            AccountMeta::new_readonly(self.escrow_authority.key(), true),
            AccountMeta::new(self.escrow_currency_account.key(), false),
            AccountMeta::new(self.escrow_position_account.key(), false),
            AccountMeta::new_readonly(self.token_program.key(), false),
        ];
        let data = instruction_data("deposit_to", &(*beneficiary, amount))?;
        let infos = [
            self.pool.clone(),
            self.pool_currency_vault.clone(),
            self.currency_mint.clone(),
            self.position_mint.clone(),
            self.escrow_authority.clone(),
            self.escrow_currency_account.clone(),
            self.escrow_position_account.clone(),
            self.token_program.clone(),
        ];
        invoke_external(&self.program, metas, data, &infos, self.signer_seeds)
    }
}

/// Reads the escrow's position-token balance fresh from the account data.
pub struct EscrowPositionBalance<'a, 'info> {
    pub account: &'a mut InterfaceAccount<'info, TokenAccount>,
}

impl<'a, 'info> PositionBalance for EscrowPositionBalance<'a, 'info> {
    fn position_balance(&mut self) -> Result<u64> {
        self.account.reload()?;
        Ok(self.account.amount)
    }
}
