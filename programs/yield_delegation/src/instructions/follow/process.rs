use anchor_lang::prelude::*;
use crate::instructions::settlement::{check_payment, settle, ProcessPayment};
use crate::state::EntityKey;

/// Handles a follow forwarded by the hub. Follows never carry a referral.
pub fn handler(
    mut ctx: Context<ProcessPayment>,
    profile_id: u64,
    data: Vec<u8>,
) -> Result<()> {
    let accounts = &mut ctx.accounts;
    check_payment(&accounts.entity_config, EntityKey::Profile { profile_id }, &data)?;

    msg!("Follow of profile {} by {}", profile_id, accounts.counterparty.key());

    settle(accounts, ctx.program_id, None, ctx.bumps.position)
}
