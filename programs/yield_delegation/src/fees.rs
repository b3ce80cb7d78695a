use anchor_lang::prelude::*;
use crate::constants::BPS_MAX;
use crate::errors::YieldDelegationError;

/// Three-way split of a gross fee. The parts always sum to the gross amount;
/// integer-division dust accrues to `deposit`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeSplit {
    pub treasury: u64,
    pub referral: u64,
    pub deposit: u64,
}

#[cfg(all(test, not(target_arch = "bpf")))]
impl FeeSplit {
    pub fn total(&self) -> Option<u64> {
        self.treasury.checked_add(self.referral)?.checked_add(self.deposit)
    }
}

fn bps_of(amount: u64, bps: u16) -> Result<u64> {
    require!(bps <= BPS_MAX, YieldDelegationError::InvalidParameters);
    let portion = (amount as u128)
        .checked_mul(bps as u128)
        .ok_or(YieldDelegationError::ArithmeticOverflow)?
        / BPS_MAX as u128;
    // portion <= amount, so it always fits back into u64
    Ok(portion as u64)
}

/// Splits `gross` into treasury, referral and deposit parts.
///
/// The treasury cut is always taken first on the full amount. The referral
/// cut, when present, is taken from what remains, so a referral can never
/// eat into the treasury's share.
pub fn split(gross: u64, treasury_fee_bps: u16, referral_fee_bps: Option<u16>) -> Result<FeeSplit> {
    let treasury = bps_of(gross, treasury_fee_bps)?;
    let remainder = gross - treasury;

    let referral = match referral_fee_bps {
        Some(bps) => bps_of(remainder, bps)?,
        None => 0,
    };

    Ok(FeeSplit {
        treasury,
        referral,
        deposit: remainder - referral,
    })
}
