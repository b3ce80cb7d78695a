use anchor_lang::prelude::*;
use crate::errors::YieldDelegationError;
use crate::state::{CurrencyRoute, DelegationPosition, EntityConfig, ModuleGlobals};

// =============================================================================
// DELEGATION ACCOUNTING
// =============================================================================
//
// deposit -> measure -> allocate slot -> open delegation -> fund delegation,
// and the reverse gate that hands an unlocked position back to its recipient.
//
// The external protocols sit behind the three traits below. On chain they are
// CPI adapters (see `adapters`); in tests they are in-memory fakes.
// =============================================================================

/// Yield-bearing pool that turns settlement currency into position tokens.
pub trait YieldPool {
    /// Deposit `amount` of settlement currency, minting position tokens to
    /// `beneficiary`.
    fn deposit_to(&mut self, beneficiary: &Pubkey, amount: u64) -> Result<()>;
}

/// Position-token balance held by the engine escrow.
pub trait PositionBalance {
    fn position_balance(&mut self) -> Result<u64>;
}

/// Time-locked delegation vault for position tokens.
pub trait DelegationVault {
    fn create_delegation(
        &mut self,
        owner: &Pubkey,
        slot: u64,
        delegatee: &Pubkey,
        lock_duration: i64,
    ) -> Result<Pubkey>;

    fn fund_delegation(&mut self, owner: &Pubkey, slot: u64, amount: u64) -> Result<()>;

    fn withdraw_delegation_to_stake(
        &mut self,
        owner: &Pubkey,
        slot: u64,
        amount: u64,
    ) -> Result<Pubkey>;
}

#[derive(Clone, Copy, Debug)]
pub struct AccrualRequest {
    /// Config recipient, owner of the delegation
    pub recipient: Pubkey,
    /// Collector or follower named as delegatee
    pub counterparty: Pubkey,
    /// Residual after treasury and referral cuts
    pub deposit_amount: u64,
    /// Seconds the delegation stays locked
    pub lock_duration: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accrual {
    pub slot: u64,
    pub staked_amount: u64,
    pub delegation: Pubkey,
}

/// Deposits the residual into the yield pool and delegates whatever the pool
/// actually minted under a freshly allocated global slot.
///
/// The staked amount is the escrow's position-token balance delta across the
/// deposit, never a value reported by the pool. A zero deposit (every unit
/// went to treasury and referral) opens nothing and returns `None`.
pub fn accrue<P, B, V>(
    globals: &mut ModuleGlobals,
    route: &CurrencyRoute,
    escrow: &Pubkey,
    request: &AccrualRequest,
    pool: &mut P,
    balance: &mut B,
    vault: &mut V,
) -> Result<Option<Accrual>>
where
    P: YieldPool,
    B: PositionBalance,
    V: DelegationVault,
{
    route.resolve()?;
    if request.deposit_amount == 0 {
        msg!("Nothing left to deposit for {}", request.counterparty);
        return Ok(None);
    }

    let before = balance.position_balance()?;
    pool.deposit_to(escrow, request.deposit_amount)?;
    let after = balance.position_balance()?;

    let staked_amount = after
        .checked_sub(before)
        .ok_or(YieldDelegationError::ArithmeticOverflow)?;
    require!(staked_amount > 0, YieldDelegationError::NothingStaked);

    let slot = globals.allocate_slot()?;
    let delegation = vault.create_delegation(
        &request.recipient,
        slot,
        &request.counterparty,
        request.lock_duration,
    )?;
    vault.fund_delegation(&request.recipient, slot, staked_amount)?;
    globals.record_stake(staked_amount)?;

    msg!(
        "Delegated {} position tokens (deposit {}) at slot {} to {}",
        staked_amount,
        request.deposit_amount,
        slot,
        request.counterparty
    );

    Ok(Some(Accrual {
        slot,
        staked_amount,
        delegation,
    }))
}

/// Only the config recipient may withdraw positions opened through it.
pub fn authorize_release(config: &EntityConfig, caller: &Pubkey) -> Result<()> {
    require!(
        config.initialized && config.recipient == *caller,
        YieldDelegationError::NotAuthorized
    );
    Ok(())
}

/// Withdraws one unlocked position back to stake. The engine keeps no
/// withdrawn flag; a repeated release is for the vault to reject.
pub fn release<V: DelegationVault>(
    position: &DelegationPosition,
    now: i64,
    vault: &mut V,
) -> Result<Pubkey> {
    position.assert_unlocked(now)?;
    vault.withdraw_delegation_to_stake(&position.recipient, position.slot, position.staked_amount)
}

#[cfg(all(test, not(target_arch = "bpf")))]
mod tests {
    use super::*;
    use crate::fees::split;
    use crate::state::EntityKey;
    use crate::test_utils::{error_code, globals, route};
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::rc::Rc;

    /// Pool minting `num / den` position tokens per unit deposited.
    struct FakePool {
        escrow_balance: Rc<Cell<u64>>,
        num: u64,
        den: u64,
        fail: bool,
        deposits: Vec<(Pubkey, u64)>,
    }

    impl FakePool {
        fn new(escrow_balance: Rc<Cell<u64>>, num: u64, den: u64) -> Self {
            FakePool { escrow_balance, num, den, fail: false, deposits: vec![] }
        }
    }

    impl YieldPool for FakePool {
        fn deposit_to(&mut self, beneficiary: &Pubkey, amount: u64) -> Result<()> {
            if self.fail {
                return err!(YieldDelegationError::ArithmeticOverflow);
            }
            self.deposits.push((*beneficiary, amount));
            let minted = amount * self.num / self.den;
            self.escrow_balance.set(self.escrow_balance.get() + minted);
            Ok(())
        }
    }

    struct EscrowBalance(Rc<Cell<u64>>);

    impl PositionBalance for EscrowBalance {
        fn position_balance(&mut self) -> Result<u64> {
            Ok(self.0.get())
        }
    }

    #[derive(Default)]
    struct FakeVault {
        escrow_balance: Rc<Cell<u64>>,
        created: Vec<(Pubkey, u64, Pubkey, i64)>,
        funded: Vec<(Pubkey, u64, u64)>,
        withdrawn: HashSet<u64>,
        fail_create: bool,
    }

    impl DelegationVault for FakeVault {
        fn create_delegation(
            &mut self,
            owner: &Pubkey,
            slot: u64,
            delegatee: &Pubkey,
            lock_duration: i64,
        ) -> Result<Pubkey> {
            if self.fail_create {
                return err!(YieldDelegationError::InvalidParameters);
            }
            self.created.push((*owner, slot, *delegatee, lock_duration));
            Ok(Pubkey::new_unique())
        }

        fn fund_delegation(&mut self, owner: &Pubkey, slot: u64, amount: u64) -> Result<()> {
            let held = self.escrow_balance.get();
            require!(held >= amount, YieldDelegationError::ArithmeticOverflow);
            self.escrow_balance.set(held - amount);
            self.funded.push((*owner, slot, amount));
            Ok(())
        }

        fn withdraw_delegation_to_stake(
            &mut self,
            _owner: &Pubkey,
            slot: u64,
            _amount: u64,
        ) -> Result<Pubkey> {
            require!(self.withdrawn.insert(slot), YieldDelegationError::InvalidPositionAccount);
            Ok(Pubkey::new_unique())
        }
    }

    struct Harness {
        globals: ModuleGlobals,
        route: CurrencyRoute,
        escrow: Pubkey,
        pool: FakePool,
        balance: EscrowBalance,
        vault: FakeVault,
    }

    impl Harness {
        fn new(num: u64, den: u64) -> Self {
            let shared = Rc::new(Cell::new(0));
            Harness {
                globals: globals(Pubkey::new_unique()),
                route: route(Pubkey::new_unique()),
                escrow: Pubkey::new_unique(),
                pool: FakePool::new(shared.clone(), num, den),
                balance: EscrowBalance(shared.clone()),
                vault: FakeVault { escrow_balance: shared, ..Default::default() },
            }
        }

        fn accrue(&mut self, request: &AccrualRequest) -> Result<Option<Accrual>> {
            accrue(
                &mut self.globals,
                &self.route,
                &self.escrow,
                request,
                &mut self.pool,
                &mut self.balance,
                &mut self.vault,
            )
        }

        fn opened(&mut self, request: &AccrualRequest) -> Accrual {
            self.accrue(request).unwrap().expect("delegation opened")
        }
    }

    fn request(deposit_amount: u64) -> AccrualRequest {
        AccrualRequest {
            recipient: Pubkey::new_unique(),
            counterparty: Pubkey::new_unique(),
            deposit_amount,
            lock_duration: 3_600,
        }
    }

    fn position_from(accrual: &Accrual, req: &AccrualRequest, now: i64) -> DelegationPosition {
        DelegationPosition {
            entity_config: Pubkey::new_unique(),
            counterparty: req.counterparty,
            recipient: req.recipient,
            position_mint: Pubkey::new_unique(),
            slot: accrual.slot,
            staked_amount: accrual.staked_amount,
            unlock_timestamp: now + req.lock_duration,
            created_at: now,
            bump: 255,
        }
    }

    #[test]
    fn delegates_the_measured_delta_not_the_deposit() {
        let mut h = Harness::new(1, 1);
        let fees = split(100, 500, None).unwrap();
        assert_eq!((fees.treasury, fees.deposit), (5, 95));

        // pool mints 9 ticket units for every 10 deposited
        h.pool.num = 9;
        h.pool.den = 10;
        let req = request(fees.deposit);
        let accrual = h.opened(&req);

        assert_eq!(accrual.staked_amount, 85);
        assert_eq!(h.pool.deposits, vec![(h.escrow, 95)]);
        assert_eq!(h.vault.funded, vec![(req.recipient, 0, 85)]);
        assert_eq!(
            h.vault.created,
            vec![(req.recipient, 0, req.counterparty, 3_600)]
        );
        assert_eq!(h.balance.0.get(), 0);
        assert_eq!(h.globals.total_staked, 85);
        assert_eq!(h.globals.total_positions, 1);
    }

    #[test]
    fn pre_existing_escrow_balance_is_not_delegated() {
        let mut h = Harness::new(1, 1);
        h.balance.0.set(1_000);
        let accrual = h.opened(&request(95));
        assert_eq!(accrual.staked_amount, 95);
        assert_eq!(h.balance.0.get(), 1_000);
    }

    #[test]
    fn slots_are_global_across_entities_and_recipients() {
        let mut h = Harness::new(1, 1);
        let first = h.opened(&request(10));
        let second = h.opened(&request(10));
        let third = h.opened(&request(10));
        assert!(first.slot < second.slot && second.slot < third.slot);
        assert_eq!(h.globals.next_slot, 3);
    }

    #[test]
    fn unusable_route_stops_before_any_deposit() {
        let mut h = Harness::new(1, 1);
        h.route.yield_pool = Pubkey::default();
        let err = h.accrue(&request(95)).unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::NoYieldPoolConfigured));
        assert!(h.pool.deposits.is_empty());
        assert_eq!(h.globals.next_slot, 0);
    }

    #[test]
    fn external_failures_propagate() {
        let mut h = Harness::new(1, 1);
        h.pool.fail = true;
        assert!(h.accrue(&request(95)).is_err());
        assert!(h.vault.created.is_empty());

        let mut h = Harness::new(1, 1);
        h.vault.fail_create = true;
        assert!(h.accrue(&request(95)).is_err());
        assert!(h.vault.funded.is_empty());
    }

    #[test]
    fn zero_mint_is_rejected() {
        let mut h = Harness::new(0, 1);
        let err = h.accrue(&request(95)).unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::NothingStaked));
        assert!(h.vault.created.is_empty());
    }

    #[test]
    fn withdrawal_is_gated_on_unlock_time() {
        let mut h = Harness::new(1, 1);
        let req = request(95);
        let accrual = h.opened(&req);
        let position = position_from(&accrual, &req, 1_000);

        let err = release(&position, position.unlock_timestamp - 1, &mut h.vault).unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::LockNotElapsed));
        assert!(h.vault.withdrawn.is_empty());

        release(&position, position.unlock_timestamp + 1, &mut h.vault).unwrap();
        assert!(h.vault.withdrawn.contains(&accrual.slot));

        // second release is refused by the vault, not the engine
        let err = release(&position, position.unlock_timestamp + 2, &mut h.vault).unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::InvalidPositionAccount));
    }

    #[test]
    fn only_the_recipient_may_release() {
        let recipient = Pubkey::new_unique();
        let mut config = EntityConfig::uninitialized(EntityKey::Profile { profile_id: 1 });
        config.recipient = recipient;
        config.initialized = true;

        authorize_release(&config, &recipient).unwrap();
        let err = authorize_release(&config, &Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::NotAuthorized));

        let never_set = EntityConfig::uninitialized(EntityKey::Profile { profile_id: 2 });
        let err = authorize_release(&never_set, &Pubkey::default()).unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::NotAuthorized));
    }

    #[test]
    fn zero_deposit_opens_no_delegation() {
        let mut h = Harness::new(1, 1);
        let fees = split(100, 500, Some(10_000)).unwrap();
        assert_eq!((fees.treasury, fees.referral, fees.deposit), (5, 95, 0));

        assert!(h.accrue(&request(fees.deposit)).unwrap().is_none());
        assert!(h.pool.deposits.is_empty());
        assert!(h.vault.created.is_empty());
        assert_eq!(h.globals.next_slot, 0);
        assert_eq!(h.globals.total_positions, 0);
    }

    #[test]
    fn successive_counterparties_of_one_entity_get_increasing_slots() {
        let mut h = Harness::new(1, 1);
        let first_req = request(95);
        let second_req = request(95);
        assert_ne!(first_req.counterparty, second_req.counterparty);

        let first = position_from(&h.opened(&first_req), &first_req, 1_000);
        let second = position_from(&h.opened(&second_req), &second_req, 1_001);
        assert!(second.slot > first.slot);
        assert_eq!(h.vault.created.len(), 2);
    }
}
