use anchor_lang::prelude::*;
use crate::constants::{COLLECT_CONFIG_SEED, GLOBALS_SEED, ROUTE_SEED};
use crate::errors::YieldDelegationError;
use crate::instructions::initialize_config::write_config;
use crate::state::{EntityConfig, EntityKey, InitConfigParams, ModuleGlobals};

#[derive(Accounts)]
#[instruction(profile_id: u64, pub_id: u64, params: InitConfigParams)]
pub struct InitializeCollectConfig<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        seeds = [GLOBALS_SEED],
        bump = globals.bump,
    )]
    pub globals: Box<Account<'info, ModuleGlobals>>,

    #[account(
        constraint = globals.is_hub(&hub_authority.key()) @ YieldDelegationError::NotHub,
    )]
    pub hub_authority: Signer<'info>,

    /// Hub whitelist entry for `params.currency`
    /// CHECK: Decoded and owner-checked by the hub adapter
    pub currency_whitelist: UncheckedAccount<'info>,

    /// Route for `params.currency`; may not exist yet
    /// CHECK: Address fixed by seeds, contents read by `CurrencyRoute::load_optional`
    #[account(
        seeds = [ROUTE_SEED, params.currency.as_ref()],
        bump,
    )]
    pub currency_route: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        space = EntityConfig::SIZE,
        seeds = [
            COLLECT_CONFIG_SEED,
            profile_id.to_le_bytes().as_ref(),
            pub_id.to_le_bytes().as_ref(),
        ],
        bump,
    )]
    pub entity_config: Box<Account<'info, EntityConfig>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    mut ctx: Context<InitializeCollectConfig>,
    profile_id: u64,
    pub_id: u64,
    params: InitConfigParams,
) -> Result<()> {
    let accounts = &mut ctx.accounts;
    let currency_whitelist = accounts.currency_whitelist.to_account_info();
    let currency_route = accounts.currency_route.to_account_info();

    write_config(
        &mut accounts.entity_config,
        &accounts.globals,
        EntityKey::Publication { profile_id, pub_id },
        &params,
        &currency_whitelist,
        &currency_route,
        ctx.bumps.entity_config,
    )
}
