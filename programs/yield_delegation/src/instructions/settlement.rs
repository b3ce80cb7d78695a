use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};
use crate::accounting::{accrue, AccrualRequest};
use crate::adapters::{DelegationVaultCpi, EscrowPositionBalance, YieldPoolCpi};
use crate::constants::{ESCROW_SEED, GLOBALS_SEED, POSITION_SEED, ROUTE_SEED};
use crate::errors::YieldDelegationError;
use crate::events::{PaymentProcessed, PositionOverwritten};
use crate::fees::split;
use crate::state::{CurrencyRoute, DelegationPosition, EntityConfig, EntityKey, ModuleGlobals};

// =============================================================================
// PAYMENT SETTLEMENT
// =============================================================================
//
// Both entry surfaces settle a payment the same way:
//
//   1. Split the gross fee into treasury, referral and deposit
//   2. Pull each cut from the payer (treasury, referrer, escrow)
//   3. Deposit the escrowed residual into the currency's yield pool
//   4. Delegate the measured position tokens under a new global slot
//   5. Record the delegation against (entity config, counterparty)
//
// The collect and follow handlers perform their own gating before calling in.
// =============================================================================

/// Opaque payment data the hub forwards from the caller.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentData {
    pub currency: Pubkey,
    pub amount: u64,
}

impl PaymentData {
    pub fn decode(data: &[u8]) -> Result<Self> {
        PaymentData::try_from_slice(data)
            .map_err(|_| error!(YieldDelegationError::InvalidParameters))
    }
}

/// The config must belong to `key` and the payment data must name exactly
/// its currency and amount.
pub(crate) fn check_payment(config: &EntityConfig, key: EntityKey, data: &[u8]) -> Result<PaymentData> {
    require!(config.key == key, YieldDelegationError::EntityMismatch);
    let payment = PaymentData::decode(data)?;
    config.assert_payment_matches(&payment.currency, payment.amount)?;
    Ok(payment)
}

#[derive(Accounts)]
pub struct ProcessPayment<'info> {
    /// Wallet paying the fee
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [GLOBALS_SEED],
        bump = globals.bump,
    )]
    pub globals: Box<Account<'info, ModuleGlobals>>,

    #[account(
        constraint = globals.is_hub(&hub_authority.key()) @ YieldDelegationError::NotHub,
    )]
    pub hub_authority: Signer<'info>,

    #[account(
        constraint = entity_config.initialized @ YieldDelegationError::ConfigNotInitialized,
    )]
    pub entity_config: Box<Account<'info, EntityConfig>>,

    /// Collector or follower, named as delegatee
    /// CHECK: Any wallet; only its key is recorded
    pub counterparty: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        space = DelegationPosition::SIZE,
        seeds = [POSITION_SEED, entity_config.key().as_ref(), counterparty.key().as_ref()],
        bump,
    )]
    pub position: Box<Account<'info, DelegationPosition>>,

    #[account(
        address = entity_config.currency @ YieldDelegationError::NotWhitelisted,
    )]
    pub currency_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        seeds = [ROUTE_SEED, currency_mint.key().as_ref()],
        bump = currency_route.bump,
        constraint = currency_route.is_usable() @ YieldDelegationError::NoYieldPoolConfigured,
    )]
    pub currency_route: Box<Account<'info, CurrencyRoute>>,

    #[account(
        mut,
        constraint = payer_currency_account.mint == currency_mint.key() @ YieldDelegationError::InvalidTokenAccount,
        constraint = payer_currency_account.owner == payer.key() @ YieldDelegationError::InvalidTokenAccount,
    )]
    pub payer_currency_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = treasury_currency_account.mint == currency_mint.key() @ YieldDelegationError::InvalidTokenAccount,
        constraint = treasury_currency_account.owner == globals.treasury @ YieldDelegationError::InvalidTokenAccount,
    )]
    pub treasury_currency_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Hub profile of the referrer; collect with referral only
    /// CHECK: Decoded and owner-checked by the hub adapter
    pub referrer_profile: Option<UncheckedAccount<'info>>,

    /// Referrer owner's token account; collect with referral only
    #[account(mut)]
    pub referrer_currency_account: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    /// Hub follow record of the counterparty; follower-only collects
    /// CHECK: Decoded and owner-checked by the hub adapter
    pub follow_record: Option<UncheckedAccount<'info>>,

    /// CHECK: PDA signer over the escrow token accounts
    #[account(
        seeds = [ESCROW_SEED],
        bump,
    )]
    pub escrow_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = escrow_currency_account.mint == currency_mint.key() @ YieldDelegationError::InvalidTokenAccount,
        constraint = escrow_currency_account.owner == escrow_authority.key() @ YieldDelegationError::InvalidTokenAccount,
    )]
    pub escrow_currency_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Must be the route's position mint; minted by the pool program
    #[account(
        mut,
        address = currency_route.position_mint @ YieldDelegationError::NoYieldPoolConfigured,
    )]
    pub position_mint: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = escrow_position_account.mint == position_mint.key() @ YieldDelegationError::InvalidTokenAccount,
        constraint = escrow_position_account.owner == escrow_authority.key() @ YieldDelegationError::InvalidTokenAccount,
    )]
    pub escrow_position_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Must be the route's pool; ownership checked by the pool adapter
    #[account(
        mut,
        address = currency_route.yield_pool @ YieldDelegationError::NoYieldPoolConfigured,
    )]
    pub yield_pool: UncheckedAccount<'info>,

    /// CHECK: Owner of `yield_pool`, checked by the pool adapter
    #[account(executable)]
    pub yield_pool_program: UncheckedAccount<'info>,

    /// CHECK: Pool custody, validated by the pool program
    #[account(mut)]
    pub pool_currency_vault: UncheckedAccount<'info>,

    /// CHECK: Fixed by globals
    #[account(
        executable,
        address = globals.delegation_vault_program @ YieldDelegationError::InvalidParameters,
    )]
    pub delegation_vault_program: UncheckedAccount<'info>,

    /// CHECK: Validated by the vault program
    #[account(mut)]
    pub vault_state: UncheckedAccount<'info>,

    /// Delegation account for the slot being opened
    /// CHECK: Validated by the vault program
    #[account(mut)]
    pub delegation: UncheckedAccount<'info>,

    /// CHECK: Validated by the vault program
    #[account(mut)]
    pub vault_position_account: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// Where a referral cut goes, already resolved against the hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Referral {
    pub fee_bps: u16,
    pub owner: Pubkey,
}

fn pay<'info>(
    accounts: &ProcessPayment<'info>,
    to: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    transfer_checked(
        CpiContext::new(
            accounts.token_program.to_account_info(),
            TransferChecked {
                from: accounts.payer_currency_account.to_account_info(),
                mint: accounts.currency_mint.to_account_info(),
                to,
                authority: accounts.payer.to_account_info(),
            },
        ),
        amount,
        accounts.currency_mint.decimals,
    )
}

/// Settles one payment and records the resulting position.
pub(crate) fn settle<'info>(
    accounts: &mut ProcessPayment<'info>,
    program_id: &Pubkey,
    referral: Option<Referral>,
    position_bump: u8,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let gross = accounts.entity_config.amount;
    let fees = split(
        gross,
        accounts.globals.treasury_fee_bps,
        referral.as_ref().map(|r| r.fee_bps),
    )?;

    pay(accounts, accounts.treasury_currency_account.to_account_info(), fees.treasury)?;
    if let Some(referral) = &referral {
        let referrer_account = accounts
            .referrer_currency_account
            .as_ref()
            .ok_or(YieldDelegationError::InvalidTokenAccount)?;
        require_keys_eq!(
            referrer_account.owner,
            referral.owner,
            YieldDelegationError::InvalidTokenAccount
        );
        require_keys_eq!(
            referrer_account.mint,
            accounts.currency_mint.key(),
            YieldDelegationError::InvalidTokenAccount
        );
        pay(accounts, referrer_account.to_account_info(), fees.referral)?;
    }
    pay(accounts, accounts.escrow_currency_account.to_account_info(), fees.deposit)?;

    let (escrow, escrow_bump) = Pubkey::find_program_address(&[ESCROW_SEED], program_id);
    let bump = [escrow_bump];
    let seeds: &[&[u8]] = &[ESCROW_SEED, &bump];
    let signer_seeds: &[&[&[u8]]] = &[seeds];

    let escrow_authority = accounts.escrow_authority.to_account_info();
    let escrow_position_info = accounts.escrow_position_account.to_account_info();
    let position_mint = accounts.position_mint.to_account_info();
    let token_program = accounts.token_program.to_account_info();

    let mut pool = YieldPoolCpi {
        program: accounts.yield_pool_program.to_account_info(),
        pool: accounts.yield_pool.to_account_info(),
        pool_currency_vault: accounts.pool_currency_vault.to_account_info(),
        currency_mint: accounts.currency_mint.to_account_info(),
        position_mint: position_mint.clone(),
        escrow_authority: escrow_authority.clone(),
        escrow_currency_account: accounts.escrow_currency_account.to_account_info(),
        escrow_position_account: escrow_position_info.clone(),
        token_program: token_program.clone(),
        signer_seeds,
    };
    let mut vault = DelegationVaultCpi {
        program: accounts.delegation_vault_program.to_account_info(),
        vault_state: accounts.vault_state.to_account_info(),
        delegation: accounts.delegation.to_account_info(),
        vault_position_account: accounts.vault_position_account.to_account_info(),
        position_mint,
        escrow_authority,
        token_program,
        escrow_position_account: Some(escrow_position_info),
        payer: Some(accounts.payer.to_account_info()),
        system_program: Some(accounts.system_program.to_account_info()),
        stake_destination: None,
        signer_seeds,
    };

    let config = &accounts.entity_config;
    let request = AccrualRequest {
        recipient: config.recipient,
        counterparty: accounts.counterparty.key(),
        deposit_amount: fees.deposit,
        lock_duration: config.lock_duration,
    };
    let unlock_timestamp = config.unlock_timestamp(now)?;
    let entity_config = config.key();
    let position_mint_key = accounts.position_mint.key();

    let mut balance = EscrowPositionBalance {
        account: &mut accounts.escrow_position_account,
    };
    let accrual = accrue(
        &mut accounts.globals,
        &accounts.currency_route,
        &escrow,
        &request,
        &mut pool,
        &mut balance,
        &mut vault,
    )?;

    if let Some(accrual) = &accrual {
        let displaced = accounts.position.overwrite(DelegationPosition {
            entity_config,
            counterparty: request.counterparty,
            recipient: request.recipient,
            position_mint: position_mint_key,
            slot: accrual.slot,
            staked_amount: accrual.staked_amount,
            unlock_timestamp,
            created_at: now,
            bump: position_bump,
        });
        if let Some(previous) = displaced {
            msg!(
                "Overwrote position at slot {} for {}",
                previous.slot,
                request.counterparty
            );
            emit!(PositionOverwritten {
                entity_config,
                counterparty: request.counterparty,
                previous_slot: previous.slot,
                previous_staked_amount: previous.staked_amount,
                slot: accrual.slot,
            });
        }
    }

    emit!(PaymentProcessed {
        entity_config,
        payer: accounts.payer.key(),
        counterparty: request.counterparty,
        treasury_amount: fees.treasury,
        referral_amount: fees.referral,
        deposit_amount: fees.deposit,
        staked_amount: accrual.map_or(0, |a| a.staked_amount),
        slot: accrual.map(|a| a.slot),
        unlock_timestamp,
        timestamp: now,
    });

    Ok(())
}

#[cfg(all(test, not(target_arch = "bpf")))]
mod tests {
    use super::*;

    #[test]
    fn decodes_payment_data() {
        let currency = Pubkey::new_unique();
        let data = PaymentData { currency, amount: 100 }.try_to_vec().unwrap();
        assert_eq!(PaymentData::decode(&data).unwrap(), PaymentData { currency, amount: 100 });
    }

    #[test]
    fn malformed_payment_data_is_invalid() {
        let err = PaymentData::decode(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            crate::test_utils::error_code(&err),
            u32::from(YieldDelegationError::InvalidParameters)
        );
    }

    fn config(key: EntityKey, currency: Pubkey) -> EntityConfig {
        let mut config = EntityConfig::uninitialized(key);
        config.amount = 100;
        config.currency = currency;
        config.initialized = true;
        config
    }

    #[test]
    fn payment_must_target_the_named_entity() {
        let currency = Pubkey::new_unique();
        let key = EntityKey::Profile { profile_id: 3 };
        let data = PaymentData { currency, amount: 100 }.try_to_vec().unwrap();
        let c = config(key, currency);

        assert_eq!(check_payment(&c, key, &data).unwrap().amount, 100);

        let err = check_payment(&c, EntityKey::Profile { profile_id: 4 }, &data).unwrap_err();
        assert_eq!(
            crate::test_utils::error_code(&err),
            u32::from(YieldDelegationError::EntityMismatch)
        );

        let short = PaymentData { currency, amount: 99 }.try_to_vec().unwrap();
        let err = check_payment(&c, key, &short).unwrap_err();
        assert_eq!(
            crate::test_utils::error_code(&err),
            u32::from(YieldDelegationError::NotWhitelisted)
        );
    }
}
