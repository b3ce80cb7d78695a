use anchor_lang::prelude::*;
use crate::errors::YieldDelegationError;

// =============================================================================
// HUB ACCOUNT READER
// =============================================================================
//
// The social-graph hub owns profile ownership, follow records and the
// currency whitelist. This program only reads them: the account must be owned
// by the configured hub program, and the payload after the hub's 8-byte
// discriminator is Borsh.
// =============================================================================

/// Profile ownership record, used to pay a referrer's owner.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct HubProfile {
    pub profile_id: u64,
    pub owner: Pubkey,
}

/// Follow relationship between a profile and a wallet.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct HubFollowRecord {
    pub profile_id: u64,
    pub follower: Pubkey,
    pub active: bool,
}

/// Whitelist entry for a settlement currency.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct HubCurrencyEntry {
    pub currency: Pubkey,
    pub whitelisted: bool,
}

const HUB_DISCRIMINATOR_LEN: usize = 8;

pub fn read_hub_account<T: AnchorDeserialize>(info: &AccountInfo, hub_program: &Pubkey) -> Result<T> {
    require_keys_eq!(*info.owner, *hub_program, YieldDelegationError::NotHubAccount);
    let data = info.try_borrow_data()?;
    require!(
        data.len() > HUB_DISCRIMINATOR_LEN,
        YieldDelegationError::NotHubAccount
    );
    let mut payload = &data[HUB_DISCRIMINATOR_LEN..];
    T::deserialize(&mut payload).map_err(|_| error!(YieldDelegationError::NotHubAccount))
}

/// A whitelist entry that was never created means "not whitelisted".
pub fn is_currency_whitelisted(
    info: &AccountInfo,
    hub_program: &Pubkey,
    currency: &Pubkey,
) -> Result<bool> {
    if info.data_is_empty() {
        return Ok(false);
    }
    let entry: HubCurrencyEntry = read_hub_account(info, hub_program)?;
    Ok(entry.whitelisted && entry.currency == *currency)
}

pub fn is_follower(
    info: &AccountInfo,
    hub_program: &Pubkey,
    profile_id: u64,
    follower: &Pubkey,
) -> Result<bool> {
    if info.data_is_empty() {
        return Ok(false);
    }
    let record: HubFollowRecord = read_hub_account(info, hub_program)?;
    Ok(record.active && record.profile_id == profile_id && record.follower == *follower)
}

pub fn profile_owner(info: &AccountInfo, hub_program: &Pubkey, profile_id: u64) -> Result<Pubkey> {
    let profile: HubProfile = read_hub_account(info, hub_program)?;
    require!(
        profile.profile_id == profile_id,
        YieldDelegationError::NotHubAccount
    );
    Ok(profile.owner)
}
