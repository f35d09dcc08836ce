// Constants for the Staking Vault program

/// Seed for the vault config PDA (followed by the underlying mint)
pub const CONFIG_SEED: &[u8] = b"config";

/// Space for VaultConfig account (8 discriminator + 32 token_mint + 32 x_token_mint +
/// 32 token_vault + 1 vault_bump + 1 bump + 64 padding)
pub const VAULT_CONFIG_SIZE: usize = 8 + 32 + 32 + 32 + 1 + 1 + 64;

/// Fixed-point scale used when reporting the exchange rate
pub const PRICE_SCALE: u128 = 1_000_000_000;

/// Number of decimal places carried by PRICE_SCALE
pub const PRICE_DECIMALS: usize = 9;
