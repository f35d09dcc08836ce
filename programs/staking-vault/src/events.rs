use anchor_lang::prelude::*;

/// Event emitted when a vault is bound to its underlying and share mints
#[event]
pub struct VaultInitialized {
    pub token_mint: Pubkey,
    pub x_token_mint: Pubkey,
    pub token_vault: Pubkey,
    pub initializer: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when tokens are staked for xTokens
#[event]
pub struct Staked {
    pub token_vault: Pubkey,
    pub user: Pubkey,
    pub amount: u64,
    pub shares_minted: u64,
    pub timestamp: i64,
}

/// Event emitted when xTokens are redeemed for tokens
#[event]
pub struct Unstaked {
    pub token_vault: Pubkey,
    pub user: Pubkey,
    pub shares_burned: u64,
    pub amount: u64,
    pub timestamp: i64,
}

/// Exchange rate before and after a stake or unstake
#[event]
pub struct PriceChange {
    pub old_rate_e9: u128,
    pub old_rate: String,
    pub new_rate_e9: u128,
    pub new_rate: String,
}

/// Current exchange rate, underlying per share
#[event]
pub struct Price {
    pub rate_e9: u128,
    pub rate: String,
}

/// Event emitted when a stray vault ATA is drained and closed
#[event]
pub struct NestedWithdrawn {
    pub token_vault: Pubkey,
    pub nested_account: Pubkey,
    pub amount: u64,
    pub refundee: Pubkey,
    pub timestamp: i64,
}
