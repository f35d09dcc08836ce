use anchor_lang::prelude::*;

use crate::errors::VaultError;

/// Binding between an underlying mint, its xToken mint and the custody account
///
/// Written once by `initialize` and never mutated. The vault bump is kept so
/// instructions without a bump argument (emit_price, withdraw_nested) can
/// still check the custody address against the canonical derivation.
#[account]
pub struct VaultConfig {
    /// Mint of the staked token
    pub token_mint: Pubkey,         // 32 bytes

    /// Mint of the xToken issued against the vault
    pub x_token_mint: Pubkey,       // 32 bytes

    /// Custody token account, also the vault PDA
    pub token_vault: Pubkey,        // 32 bytes

    /// Canonical bump of the vault PDA
    pub vault_bump: u8,             // 1 byte

    /// Bump seed for this config PDA
    pub bump: u8,                   // 1 byte

    // Padding for future upgrades
    pub _reserved: [u8; 64],        // 64 bytes
}

/// Accounts supplied to an instruction that identify the vault
#[derive(Clone, Copy, Debug)]
pub struct VaultKeys {
    pub program_id: Pubkey,
    pub token_mint: Pubkey,
    pub x_token_mint: Pubkey,
    pub token_vault: Pubkey,
}

/// A participant's wallet and token accounts for one stake/unstake
#[derive(Clone, Copy, Debug)]
pub struct HolderAccounts {
    /// Wallet that signed the transaction
    pub authority: Pubkey,
    /// Token account for the underlying mint
    pub token_account: Pubkey,
    /// Token account for the xToken mint
    pub x_token_account: Pubkey,
}

impl VaultConfig {
    /// Check the supplied accounts against what initialize bound
    pub fn check_binding(&self, keys: &VaultKeys) -> Result<()> {
        require_keys_eq!(keys.token_mint, self.token_mint, VaultError::AssetIdentityMismatch);
        require_keys_eq!(keys.x_token_mint, self.x_token_mint, VaultError::AssetIdentityMismatch);
        require_keys_eq!(keys.token_vault, self.token_vault, VaultError::IdentityMismatch);
        Ok(())
    }
}
