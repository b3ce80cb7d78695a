use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;
use crate::adapters::hub;
use crate::constants::{GLOBALS_SEED, ROUTE_SEED};
use crate::events::RouteUpdated;
use crate::state::{CurrencyRoute, ModuleGlobals, RouteField};

#[derive(Accounts)]
pub struct SetRoute<'info> {
    #[account(mut)]
    pub governance: Signer<'info>,

    #[account(
        seeds = [GLOBALS_SEED],
        bump = globals.bump,
    )]
    pub globals: Account<'info, ModuleGlobals>,

    pub currency_mint: InterfaceAccount<'info, Mint>,

    /// Hub whitelist entry for `currency_mint`
    /// CHECK: Decoded and owner-checked by the hub adapter
    pub currency_whitelist: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = governance,
        space = CurrencyRoute::SIZE,
        seeds = [ROUTE_SEED, currency_mint.key().as_ref()],
        bump,
    )]
    pub currency_route: Account<'info, CurrencyRoute>,

    pub system_program: Program<'info, System>,
}

fn set_route(ctx: Context<SetRoute>, field: RouteField, value: Pubkey) -> Result<()> {
    let globals = &ctx.accounts.globals;
    let caller = ctx.accounts.governance.key();
    globals.assert_governance(&caller)?;

    let currency = ctx.accounts.currency_mint.key();
    let whitelisted = hub::is_currency_whitelisted(
        &ctx.accounts.currency_whitelist.to_account_info(),
        &globals.hub_program,
        &currency,
    )?;

    let route = &mut ctx.accounts.currency_route;
    route.update(globals, &caller, currency, whitelisted, field, value)?;
    route.bump = ctx.bumps.currency_route;

    msg!("Set {:?} route for {} to {}", field, currency, value);
    emit!(RouteUpdated {
        currency,
        field,
        value,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn set_pool_route(ctx: Context<SetRoute>, pool: Pubkey) -> Result<()> {
    set_route(ctx, RouteField::YieldPool, pool)
}

pub fn set_ticket_route(ctx: Context<SetRoute>, position_mint: Pubkey) -> Result<()> {
    set_route(ctx, RouteField::PositionToken, position_mint)
}
