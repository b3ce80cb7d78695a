use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::AccountMeta;
use crate::accounting::DelegationVault;
use crate::adapters::{instruction_data, invoke_external};

/// CPI adapter for the external delegation vault. The engine escrow PDA acts
/// as delegator and signs every call; `owner` is the config recipient.
///
/// `payer`, `system_program` and `escrow_position_account` are only needed
/// when opening and funding a delegation, `stake_destination` only when
/// withdrawing.
pub struct DelegationVaultCpi<'a, 'info> {
    pub program: AccountInfo<'info>,
    pub vault_state: AccountInfo<'info>,
    pub delegation: AccountInfo<'info>,
    pub vault_position_account: AccountInfo<'info>,
    pub position_mint: AccountInfo<'info>,
    pub escrow_authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub escrow_position_account: Option<AccountInfo<'info>>,
    pub payer: Option<AccountInfo<'info>>,
    pub system_program: Option<AccountInfo<'info>>,
    pub stake_destination: Option<AccountInfo<'info>>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

fn required<'info>(account: &Option<AccountInfo<'info>>) -> Result<AccountInfo<'info>> {
    account
        .clone()
        .ok_or_else(|| error!(ErrorCode::AccountNotEnoughKeys))
}

impl<'a, 'info> DelegationVault for DelegationVaultCpi<'a, 'info> {
    fn create_delegation(
        &mut self,
        owner: &Pubkey,
        slot: u64,
        delegatee: &Pubkey,
        lock_duration: i64,
    ) -> Result<Pubkey> {
        let payer = required(&self.payer)?;
        let system_program = required(&self.system_program)?;

        let metas = vec![
            AccountMeta::new(self.vault_state.key(), false),
            AccountMeta::new(self.delegation.key(), false),
            AccountMeta::new_readonly(self.escrow_authority.key(), true),
            AccountMeta::new(payer.key(), true),
            AccountMeta::new_readonly(system_program.key(), false),
        ];
        let data = instruction_data(
            "create_delegation",
            &(*owner, slot, *delegatee, lock_duration),
        )?;
        let infos = [
            self.vault_state.clone(),
            self.delegation.clone(),
            self.escrow_authority.clone(),
            payer,
            system_program,
        ];
        invoke_external(&self.program, metas, data, &infos, self.signer_seeds)?;
        Ok(self.delegation.key())
    }

    fn fund_delegation(&mut self, owner: &Pubkey, slot: u64, amount: u64) -> Result<()> {
        let source = required(&self.escrow_position_account)?;

        let metas = vec![
            AccountMeta::new(self.vault_state.key(), false),
            AccountMeta::new(self.delegation.key(), false),
            AccountMeta::new_readonly(self.escrow_authority.key(), true),
            AccountMeta::new(source.key(), false),
            AccountMeta::new(self.vault_position_account.key(), false),
            AccountMeta::new_readonly(self.position_mint.key(), false),
            AccountMeta::new_readonly(self.token_program.key(), false),
        ];
        let data = instruction_data("fund_delegation", &(*owner, slot, amount))?;
        let infos = [
            self.vault_state.clone(),
            self.delegation.clone(),
            self.escrow_authority.clone(),
            source,
            self.vault_position_account.clone(),
            self.position_mint.clone(),
            self.token_program.clone(),
        ];
        invoke_external(&self.program, metas, data, &infos, self.signer_seeds)
    }

    fn withdraw_delegation_to_stake(
        &mut self,
        owner: &Pubkey,
        slot: u64,
        amount: u64,
    ) -> Result<Pubkey> {
        let destination = required(&self.stake_destination)?;

        let metas = vec![
            AccountMeta::new(self.vault_state.key(), false),
            AccountMeta::new(self.delegation.key(), false),
            AccountMeta::new_readonly(self.escrow_authority.key(), true),
            AccountMeta::new(self.vault_position_account.key(), false),
            AccountMeta::new(destination.key(), false),
            AccountMeta::new_readonly(self.position_mint.key(), false),
            AccountMeta::new_readonly(self.token_program.key(), false),
        ];
        let data = instruction_data("withdraw_delegation_to_stake", &(*owner, slot, amount))?;
        let infos = [
            self.vault_state.clone(),
            self.delegation.clone(),
            self.escrow_authority.clone(),
            self.vault_position_account.clone(),
            destination,
            self.position_mint.clone(),
            self.token_program.clone(),
        ];
        invoke_external(&self.program, metas, data, &infos, self.signer_seeds)?;
        Ok(self.delegation.key())
    }
}
