use anchor_lang::prelude::*;
use crate::constants::{BPS_MAX, COLLECT_CONFIG_SEED, FOLLOW_CONFIG_SEED, MAX_LOCK};
use crate::errors::YieldDelegationError;
use crate::state::CurrencyRoute;

// =============================================================================
// ENTITY CONFIG
// =============================================================================
//
// One snapshot per social-graph entity. Publications and profiles share the
// same record; the key tells them apart and decides which optional fields
// (referral fee, follower gate) may be set.
//
// A config account that was never initialized reads as the zero default with
// `initialized == false`. Callers must treat that as "no config".
// =============================================================================

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKey {
    /// A collectible publication, addressed by its author's profile
    Publication { profile_id: u64, pub_id: u64 },
    /// A followable profile
    Profile { profile_id: u64 },
}

impl Default for EntityKey {
    fn default() -> Self {
        EntityKey::Profile { profile_id: 0 }
    }
}

impl EntityKey {
    pub const SIZE: usize = 1 + 8 + 8;

    pub fn profile_id(&self) -> u64 {
        match self {
            EntityKey::Publication { profile_id, .. } => *profile_id,
            EntityKey::Profile { profile_id } => *profile_id,
        }
    }

    /// Config PDA for this entity.
    pub fn config_address(&self, program_id: &Pubkey) -> (Pubkey, u8) {
        match self {
            EntityKey::Publication { profile_id, pub_id } => Pubkey::find_program_address(
                &[
                    COLLECT_CONFIG_SEED,
                    profile_id.to_le_bytes().as_ref(),
                    pub_id.to_le_bytes().as_ref(),
                ],
                program_id,
            ),
            EntityKey::Profile { profile_id } => Pubkey::find_program_address(
                &[FOLLOW_CONFIG_SEED, profile_id.to_le_bytes().as_ref()],
                program_id,
            ),
        }
    }

    /// Referral attribution and follower gating only exist on publications.
    pub fn supports_collect_options(&self) -> bool {
        matches!(self, EntityKey::Publication { .. })
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitConfigParams {
    /// Gross fee charged per action
    pub amount: u64,
    /// Settlement currency mint
    pub currency: Pubkey,
    /// Owner of the resulting delegation positions
    pub recipient: Pubkey,
    /// Referral cut in basis points (publications only)
    pub referral_fee_bps: Option<u16>,
    /// Restrict the action to existing followers (publications only)
    pub follower_only: Option<bool>,
    /// Seconds a delegation stays locked
    pub lock_duration: i64,
}

impl InitConfigParams {
    /// Validates the parameters against the entity kind, the external
    /// whitelist answer and the currency route (if one exists).
    pub fn validate(
        &self,
        key: &EntityKey,
        currency_whitelisted: bool,
        route: Option<&CurrencyRoute>,
    ) -> Result<()> {
        require!(currency_whitelisted, YieldDelegationError::InvalidParameters);
        require!(
            self.recipient != Pubkey::default(),
            YieldDelegationError::InvalidParameters
        );
        require!(self.amount > 0, YieldDelegationError::InvalidParameters);
        require!(
            self.lock_duration > 0 && self.lock_duration < MAX_LOCK,
            YieldDelegationError::InvalidParameters
        );

        if self.referral_fee_bps.is_some() || self.follower_only.is_some() {
            require!(
                key.supports_collect_options(),
                YieldDelegationError::InvalidParameters
            );
        }
        if let Some(referral_fee_bps) = self.referral_fee_bps {
            require!(
                referral_fee_bps <= BPS_MAX,
                YieldDelegationError::InvalidParameters
            );
        }

        let route = route.ok_or(YieldDelegationError::InvalidParameters)?;
        require_keys_eq!(
            route.currency,
            self.currency,
            YieldDelegationError::InvalidParameters
        );
        require!(route.has_pool(), YieldDelegationError::InvalidParameters);
        require!(
            route.has_position_token(),
            YieldDelegationError::InvalidParameters
        );
        Ok(())
    }
}

#[account]
#[derive(Default)]
pub struct EntityConfig {
    /// Which entity this config belongs to
    pub key: EntityKey,
    /// Gross fee charged per action
    pub amount: u64,
    /// Settlement currency mint
    pub currency: Pubkey,
    /// Owner of every position opened through this entity
    pub recipient: Pubkey,
    /// Referral cut in basis points on the treasury-adjusted remainder
    pub referral_fee_bps: u16,
    /// Only followers of the author's profile may pay
    pub follower_only: bool,
    /// Seconds a delegation stays locked
    pub lock_duration: i64,
    /// Set once the hub has initialized this entity
    pub initialized: bool,
    /// PDA bump seed
    pub bump: u8,
}

impl EntityConfig {
    pub const SIZE: usize = 8 +  // discriminator
        EntityKey::SIZE +        // key
        8 +                      // amount
        32 +                     // currency
        32 +                     // recipient
        2 +                      // referral_fee_bps
        1 +                      // follower_only
        8 +                      // lock_duration
        1 +                      // initialized
        1;                       // bump

    /// Zero-valued config for an entity that was never initialized.
    pub fn uninitialized(key: EntityKey) -> Self {
        EntityConfig {
            key,
            ..Default::default()
        }
    }

    /// Snapshot of already validated parameters.
    pub fn from_params(key: EntityKey, params: &InitConfigParams, bump: u8) -> Self {
        EntityConfig {
            key,
            amount: params.amount,
            currency: params.currency,
            recipient: params.recipient,
            referral_fee_bps: params.referral_fee_bps.unwrap_or(0),
            follower_only: params.follower_only.unwrap_or(false),
            lock_duration: params.lock_duration,
            initialized: true,
            bump,
        }
    }

    /// Reads a config PDA, falling back to the zero default when the account
    /// has not been created.
    pub fn load_or_default(info: &AccountInfo, key: EntityKey) -> Result<Self> {
        if info.data_is_empty() || *info.owner != crate::ID {
            return Ok(EntityConfig::uninitialized(key));
        }
        let data = info.try_borrow_data()?;
        EntityConfig::try_deserialize(&mut &data[..])
    }

    pub fn assert_initialized(&self) -> Result<()> {
        require!(self.initialized, YieldDelegationError::ConfigNotInitialized);
        Ok(())
    }

    /// Payment data must name exactly the configured currency and amount.
    pub fn assert_payment_matches(&self, currency: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(*currency, self.currency, YieldDelegationError::NotWhitelisted);
        require!(amount == self.amount, YieldDelegationError::NotWhitelisted);
        Ok(())
    }

    /// Referral rate to apply for a collect, or `None` for the plain path.
    /// A referrer equal to the author's own profile earns nothing.
    pub fn referral_for(&self, referrer_profile_id: u64) -> Option<u16> {
        if self.referral_fee_bps == 0 || referrer_profile_id == self.key.profile_id() {
            None
        } else {
            Some(self.referral_fee_bps)
        }
    }

    pub fn unlock_timestamp(&self, now: i64) -> Result<i64> {
        now.checked_add(self.lock_duration)
            .ok_or_else(|| error!(YieldDelegationError::ArithmeticOverflow))
    }
}
