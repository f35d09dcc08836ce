use anchor_lang::prelude::*;

use crate::errors::VaultError;

/// The vault's program-derived address and its canonical bump.
///
/// Seeds are `[underlying_mint]`. The custody token account lives at this
/// address and is its own token authority; the share mint uses it as mint
/// authority. There is no private key, so the only way to sign for it is
/// through a `VaultSigner` handed out after re-derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultIdentity {
    pub token_mint: Pubkey,
    pub address: Pubkey,
    pub bump: u8,
}

impl VaultIdentity {
    pub fn derive(program_id: &Pubkey, token_mint: &Pubkey) -> Self {
        let (address, bump) = Pubkey::find_program_address(&[token_mint.as_ref()], program_id);
        Self {
            token_mint: *token_mint,
            address,
            bump,
        }
    }

    /// Re-derive and check a caller-supplied address and bump in one go.
    pub fn verify(
        program_id: &Pubkey,
        token_mint: &Pubkey,
        address: &Pubkey,
        bump: u8,
    ) -> Result<VaultSigner> {
        Self::derive(program_id, token_mint).authorize(address, bump)
    }

    /// Hand out a signer only if `address`/`bump` are exactly this identity.
    pub fn authorize(&self, address: &Pubkey, bump: u8) -> Result<VaultSigner> {
        if *address != self.address {
            return Err(error!(VaultError::IdentityMismatch).with_pubkeys((*address, self.address)));
        }
        if bump != self.bump {
            return Err(error!(VaultError::IdentityMismatch).with_values((bump, self.bump)));
        }
        Ok(VaultSigner {
            address: self.address,
            token_mint: self.token_mint,
            bump: [self.bump],
        })
    }
}

/// Signing capability for the vault PDA, scoped to one instruction.
///
/// Not `Clone`/`Copy`: processors borrow it for the CPIs of the instruction
/// that verified it and drop it on return.
#[derive(Debug)]
pub struct VaultSigner {
    address: Pubkey,
    token_mint: Pubkey,
    bump: [u8; 1],
}

impl VaultSigner {
    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn seeds(&self) -> [&[u8]; 2] {
        [self.token_mint.as_ref(), &self.bump]
    }
}
