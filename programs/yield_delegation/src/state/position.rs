use anchor_lang::prelude::*;
use crate::errors::YieldDelegationError;

/// Withdrawal state seen from the engine's side. `Withdrawn` is only known
/// to the delegation vault, so it has no variant here.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionStatus {
    /// Lock period still running
    Locked,
    /// Lock elapsed, the recipient may withdraw
    Eligible,
}

/// The delegation opened for one counterparty of one entity.
///
/// A later payment by the same counterparty overwrites this record; the
/// delegation at the previous slot is then no longer referenced here.
#[account]
pub struct DelegationPosition {
    /// Entity config this position was opened through
    pub entity_config: Pubkey,
    /// Collector or follower the delegation names as delegatee
    pub counterparty: Pubkey,
    /// Config recipient, the only party allowed to withdraw
    pub recipient: Pubkey,
    /// Position-token mint the delegation is denominated in
    pub position_mint: Pubkey,
    /// Delegation vault slot
    pub slot: u64,
    /// Position tokens actually delegated (measured balance delta)
    pub staked_amount: u64,
    /// Earliest time the position may be withdrawn
    pub unlock_timestamp: i64,
    /// When the position was written
    pub created_at: i64,
    /// PDA bump seed
    pub bump: u8,
}

impl DelegationPosition {
    pub const SIZE: usize = 8 +  // discriminator
        32 +                     // entity_config
        32 +                     // counterparty
        32 +                     // recipient
        32 +                     // position_mint
        8 +                      // slot
        8 +                      // staked_amount
        8 +                      // unlock_timestamp
        8 +                      // created_at
        1;                       // bump

    pub fn status(&self, now: i64) -> PositionStatus {
        if now < self.unlock_timestamp {
            PositionStatus::Locked
        } else {
            PositionStatus::Eligible
        }
    }

    pub fn assert_unlocked(&self, now: i64) -> Result<()> {
        require!(
            self.status(now) == PositionStatus::Eligible,
            YieldDelegationError::LockNotElapsed
        );
        Ok(())
    }

    /// Withdrawals go out in the mint the position was opened in, even if the
    /// currency route has since been pointed at another one.
    pub fn assert_mint(&self, mint: &Pubkey) -> Result<()> {
        require_keys_eq!(
            self.position_mint,
            *mint,
            YieldDelegationError::InvalidPositionAccount
        );
        Ok(())
    }

    /// True when this account already holds a written position.
    pub fn is_open(&self) -> bool {
        self.entity_config != Pubkey::default()
    }

    /// Replaces the record with `next`, returning the record it displaced if
    /// one was open. The displaced delegation stays in the vault under its
    /// old slot and is no longer reachable from here.
    pub fn overwrite(&mut self, next: DelegationPosition) -> Option<DelegationPosition> {
        let previous = std::mem::replace(self, next);
        previous.is_open().then_some(previous)
    }
}

#[cfg(all(test, not(target_arch = "bpf")))]
mod tests {
    use super::*;
    use crate::test_utils::error_code;

    fn position(unlock_timestamp: i64) -> DelegationPosition {
        DelegationPosition {
            entity_config: Pubkey::new_unique(),
            counterparty: Pubkey::new_unique(),
            recipient: Pubkey::new_unique(),
            position_mint: Pubkey::new_unique(),
            slot: 0,
            staked_amount: 95,
            unlock_timestamp,
            created_at: unlock_timestamp - 60,
            bump: 255,
        }
    }

    #[test]
    fn unlock_boundary_is_inclusive() {
        let p = position(1_000);
        assert_eq!(p.status(999), PositionStatus::Locked);
        assert_eq!(p.status(1_000), PositionStatus::Eligible);
        assert_eq!(p.status(1_001), PositionStatus::Eligible);
        assert!(p.assert_unlocked(999).is_err());
        assert!(p.assert_unlocked(1_000).is_ok());
    }

    fn empty() -> DelegationPosition {
        DelegationPosition {
            entity_config: Pubkey::default(),
            counterparty: Pubkey::default(),
            recipient: Pubkey::default(),
            position_mint: Pubkey::default(),
            slot: 0,
            staked_amount: 0,
            unlock_timestamp: 0,
            created_at: 0,
            bump: 0,
        }
    }

    #[test]
    fn first_write_displaces_nothing() {
        let mut record = empty();
        assert!(!record.is_open());

        let next = position(1_000);
        assert!(record.overwrite(next.clone()).is_none());
        assert!(record.is_open());
        assert_eq!(record.slot, next.slot);
        assert_eq!(record.counterparty, next.counterparty);
    }

    #[test]
    fn repayment_by_same_counterparty_replaces_the_record() {
        let mut record = empty();
        let first = position(1_000);
        record.overwrite(first.clone());

        let mut second = first.clone();
        second.slot = 7;
        second.staked_amount = 40;
        second.unlock_timestamp = 5_000;

        let displaced = record.overwrite(second).unwrap();
        assert_eq!(displaced.slot, 0);
        assert_eq!(displaced.staked_amount, 95);
        assert_eq!(record.slot, 7);
        assert_eq!(record.staked_amount, 40);
        assert_eq!(record.counterparty, first.counterparty);
        assert_eq!(record.status(1_001), PositionStatus::Locked);
    }

    #[test]
    fn withdrawal_mint_is_the_one_recorded_at_open() {
        let p = position(1_000);
        assert!(p.assert_mint(&p.position_mint).is_ok());
        // route re-pointed at a new ticket mint after the position opened
        let err = p.assert_mint(&Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::InvalidPositionAccount));
    }
}
