pub mod hub;
pub mod yield_pool;
pub mod delegation_vault;

pub use hub::*;
pub use yield_pool::*;
pub use delegation_vault::*;

use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;

/// Anchor instruction discriminator: first 8 bytes of sha256("global:<name>").
pub(crate) fn sighash(name: &str) -> [u8; 8] {
    let preimage = format!("global:{}", name);
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    discriminator
}

pub(crate) fn instruction_data<T: AnchorSerialize>(name: &str, args: &T) -> Result<Vec<u8>> {
    let mut data = sighash(name).to_vec();
    args.serialize(&mut data)
        .map_err(|_| error!(ErrorCode::InstructionDidNotSerialize))?;
    Ok(data)
}

/// Builds and signs a CPI into an external Anchor-style program.
pub(crate) fn invoke_external<'info>(
    program: &AccountInfo<'info>,
    metas: Vec<AccountMeta>,
    data: Vec<u8>,
    infos: &[AccountInfo<'info>],
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let ix = Instruction {
        program_id: program.key(),
        accounts: metas,
        data,
    };
    let mut account_infos = infos.to_vec();
    account_infos.push(program.clone());
    invoke_signed(&ix, &account_infos, signer_seeds).map_err(anchor_lang::error::Error::from)?;
    Ok(())
}

#[cfg(all(test, not(target_arch = "bpf")))]
mod tests {
    use super::*;

    #[test]
    fn sighash_prefixes_instruction_data() {
        let data = instruction_data("deposit_to", &(Pubkey::default(), 95u64)).unwrap();
        assert_eq!(&data[..8], &sighash("deposit_to"));
        assert_eq!(data.len(), 8 + 32 + 8);
        assert_eq!(&data[40..], &95u64.to_le_bytes());
        assert_ne!(sighash("deposit_to"), sighash("fund_delegation"));
    }
}
