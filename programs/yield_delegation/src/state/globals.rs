use anchor_lang::prelude::*;
use crate::constants::BPS_MAX;
use crate::errors::YieldDelegationError;

// =============================================================================
// MODULE GLOBALS
// =============================================================================
//
// Singleton PDA holding the protocol-wide settings every flow reads: who
// governs routes, which hub may call in, where the treasury cut goes, and
// the one delegation slot counter shared by every recipient and entity.
//
// Every accrual takes this account as writable, so the runtime serialises
// slot allocation across the whole program. That is a single point of
// contention.
// =============================================================================

#[account]
pub struct ModuleGlobals {
    /// Authority allowed to mutate currency routes and these globals
    pub governance: Pubkey,
    /// Program that owns hub profile, follow and whitelist accounts
    pub hub_program: Pubkey,
    /// Signer the hub presents when it calls into this program
    pub hub_authority: Pubkey,
    /// Wallet whose token accounts receive the treasury cut
    pub treasury: Pubkey,
    /// Treasury cut in basis points, always below half of BPS_MAX
    pub treasury_fee_bps: u16,
    /// Delegation vault program positions are delegated into
    pub delegation_vault_program: Pubkey,

    // === Accounting ===
    /// Next delegation slot to hand out
    pub next_slot: u64,
    /// Position tokens delegated over the program's lifetime
    pub total_staked: u64,
    /// Positions opened over the program's lifetime
    pub total_positions: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl ModuleGlobals {
    pub const SIZE: usize = 8 +  // discriminator
        32 +                     // governance
        32 +                     // hub_program
        32 +                     // hub_authority
        32 +                     // treasury
        2 +                      // treasury_fee_bps
        32 +                     // delegation_vault_program
        8 +                      // next_slot
        8 +                      // total_staked
        8 +                      // total_positions
        1;                       // bump

    pub fn is_governance(&self, caller: &Pubkey) -> bool {
        self.governance == *caller
    }

    pub fn assert_governance(&self, caller: &Pubkey) -> Result<()> {
        require!(self.is_governance(caller), YieldDelegationError::NotGovernance);
        Ok(())
    }

    pub fn is_hub(&self, caller: &Pubkey) -> bool {
        self.hub_authority == *caller
    }

    /// Treasury fee must stay strictly below half of BPS_MAX.
    pub fn validate_treasury_fee(fee_bps: u16) -> Result<()> {
        require!(fee_bps < BPS_MAX / 2, YieldDelegationError::InvalidParameters);
        Ok(())
    }

    /// Hand out the current slot and advance the counter.
    pub fn allocate_slot(&mut self) -> Result<u64> {
        let slot = self.next_slot;
        self.next_slot = slot
            .checked_add(1)
            .ok_or(YieldDelegationError::ArithmeticOverflow)?;
        Ok(slot)
    }

    pub fn record_stake(&mut self, staked_amount: u64) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_add(staked_amount)
            .ok_or(YieldDelegationError::ArithmeticOverflow)?;
        self.total_positions = self
            .total_positions
            .checked_add(1)
            .ok_or(YieldDelegationError::ArithmeticOverflow)?;
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "bpf")))]
mod tests {
    use super::*;
    use crate::test_utils::{error_code, globals};

    #[test]
    fn slots_are_strictly_increasing() {
        let mut g = globals(Pubkey::new_unique());
        let slots: Vec<u64> = (0..5).map(|_| g.allocate_slot().unwrap()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4]);
        assert_eq!(g.next_slot, 5);
    }

    #[test]
    fn slot_counter_overflow_is_an_error() {
        let mut g = globals(Pubkey::new_unique());
        g.next_slot = u64::MAX;
        let err = g.allocate_slot().unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::ArithmeticOverflow));
        assert_eq!(g.next_slot, u64::MAX);
    }

    #[test]
    fn only_governance_passes() {
        let governance = Pubkey::new_unique();
        let g = globals(governance);
        assert!(g.assert_governance(&governance).is_ok());

        let err = g.assert_governance(&Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::NotGovernance));
    }

    #[test]
    fn treasury_fee_must_be_below_half() {
        assert!(ModuleGlobals::validate_treasury_fee(0).is_ok());
        assert!(ModuleGlobals::validate_treasury_fee(4_999).is_ok());
        assert!(ModuleGlobals::validate_treasury_fee(5_000).is_err());
    }
}
