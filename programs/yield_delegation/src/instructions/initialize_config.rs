use anchor_lang::prelude::*;
use crate::adapters::hub;
use crate::events::ConfigInitialized;
use crate::state::{CurrencyRoute, EntityConfig, EntityKey, InitConfigParams, ModuleGlobals};

/// Validates `params` for `key` and snapshots them into `config`.
///
/// Shared by the collect and follow surfaces; the Accounts structs differ only
/// in the config PDA seeds.
pub(crate) fn write_config<'info>(
    config: &mut Account<'info, EntityConfig>,
    globals: &ModuleGlobals,
    key: EntityKey,
    params: &InitConfigParams,
    currency_whitelist: &AccountInfo<'info>,
    currency_route: &AccountInfo<'info>,
    bump: u8,
) -> Result<()> {
    let whitelisted =
        hub::is_currency_whitelisted(currency_whitelist, &globals.hub_program, &params.currency)?;
    let route = CurrencyRoute::load_optional(currency_route)?;
    params.validate(&key, whitelisted, route.as_ref())?;

    let entity_config = config.key();
    config.set_inner(EntityConfig::from_params(key, params, bump));

    msg!(
        "Initialized {:?}: {} per action in {}, locked {}s for {}",
        key,
        config.amount,
        config.currency,
        config.lock_duration,
        config.recipient
    );

    emit!(ConfigInitialized {
        entity_config,
        key,
        amount: config.amount,
        currency: config.currency,
        recipient: config.recipient,
        referral_fee_bps: config.referral_fee_bps,
        follower_only: config.follower_only,
        lock_duration: config.lock_duration,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
