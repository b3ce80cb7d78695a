use anchor_lang::prelude::*;
use crate::adapters::hub;
use crate::errors::YieldDelegationError;
use crate::instructions::settlement::{check_payment, settle, ProcessPayment, Referral};
use crate::state::{EntityConfig, EntityKey};

/// Collect-only gating on an already checked payment.
///
/// Follower-only publications require an active follow record for the
/// collector. A referral is resolved only when the config carries a referral
/// fee and the referrer is not the author's own profile.
pub(crate) fn gate_collect(
    config: &EntityConfig,
    hub_program: &Pubkey,
    collector: &Pubkey,
    referrer_profile_id: u64,
    follow_record: Option<&AccountInfo>,
    referrer_profile: Option<&AccountInfo>,
) -> Result<Option<Referral>> {
    if config.follower_only {
        let record = follow_record.ok_or(YieldDelegationError::FollowerOnly)?;
        let following = hub::is_follower(record, hub_program, config.key.profile_id(), collector)?;
        require!(following, YieldDelegationError::FollowerOnly);
    }

    match config.referral_for(referrer_profile_id) {
        Some(fee_bps) => {
            let profile = referrer_profile.ok_or(YieldDelegationError::NotHubAccount)?;
            let owner = hub::profile_owner(profile, hub_program, referrer_profile_id)?;
            Ok(Some(Referral { fee_bps, owner }))
        }
        None => Ok(None),
    }
}

/// Handles a collect forwarded by the hub.
pub fn handler(
    mut ctx: Context<ProcessPayment>,
    profile_id: u64,
    pub_id: u64,
    referrer_profile_id: u64,
    data: Vec<u8>,
) -> Result<()> {
    let accounts = &mut ctx.accounts;
    let collector = accounts.counterparty.key();
    check_payment(
        &accounts.entity_config,
        EntityKey::Publication { profile_id, pub_id },
        &data,
    )?;

    let follow_record = accounts.follow_record.as_ref().map(|a| a.to_account_info());
    let referrer_profile = accounts.referrer_profile.as_ref().map(|a| a.to_account_info());
    let referral = gate_collect(
        &accounts.entity_config,
        &accounts.globals.hub_program,
        &collector,
        referrer_profile_id,
        follow_record.as_ref(),
        referrer_profile.as_ref(),
    )?;

    msg!("Collect of publication {}/{} by {}", profile_id, pub_id, collector);

    settle(accounts, ctx.program_id, referral, ctx.bumps.position)
}
