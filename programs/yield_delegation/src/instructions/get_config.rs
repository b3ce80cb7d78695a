use anchor_lang::prelude::*;
use crate::errors::YieldDelegationError;
use crate::state::{EntityConfig, EntityKey};

#[derive(Accounts)]
pub struct GetConfig<'info> {
    /// CHECK: Checked against the PDA for the requested key; may not exist
    pub entity_config: UncheckedAccount<'info>,
}

/// Returns the stored config for `key`, or the zero default when the entity
/// was never initialized.
pub fn handler(ctx: Context<GetConfig>, key: EntityKey) -> Result<EntityConfig> {
    let info = ctx.accounts.entity_config.to_account_info();
    let (expected, _) = key.config_address(ctx.program_id);
    require_keys_eq!(info.key(), expected, YieldDelegationError::EntityMismatch);

    let config = EntityConfig::load_or_default(&info, key)?;
    msg!(
        "{:?}: initialized {}, amount {}, recipient {}",
        key,
        config.initialized,
        config.amount,
        config.recipient
    );
    Ok(config)
}
