// Staking Vault - stake a token, receive xTokens priced at vault balance / xToken supply
// Yield sent straight to the vault raises the rate for every holder at once

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod identity;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod state;

use instructions::*;

declare_id!("2xoAoRGcm47pSQZShj5muH8b763iyREz388bw2YGQS6L");

#[program]
pub mod staking_vault {
    use super::*;

    /// Bind a token mint and its xToken mint to a vault PDA
    ///
    /// - `vault_bump` must be the canonical bump of `[token_mint]`
    /// - xToken mint authority must be the vault PDA, supply zero
    /// - Creates the custody token account at the PDA
    pub fn initialize(ctx: Context<Initialize>, vault_bump: u8) -> Result<()> {
        instructions::initialize::handler(ctx, vault_bump)
    }

    /// Stake tokens and receive xTokens at the current rate
    ///
    /// First stake (no xTokens outstanding) is 1:1; afterwards
    /// shares = floor(amount * supply / vault balance).
    pub fn stake(ctx: Context<Stake>, vault_bump: u8, amount: u64) -> Result<()> {
        instructions::stake::handler(ctx, vault_bump, amount)
    }

    /// Burn xTokens and receive floor(amount * vault balance / supply) tokens
    pub fn unstake(ctx: Context<Unstake>, vault_bump: u8, amount: u64) -> Result<()> {
        instructions::unstake::handler(ctx, vault_bump, amount)
    }

    /// Emit the current rate as a `Price` event; no state changes
    pub fn emit_price(ctx: Context<EmitPrice>) -> Result<()> {
        instructions::emit_price::handler(ctx)
    }

    /// Move tokens from the vault's own ATA back into custody and close it
    pub fn withdraw_nested(ctx: Context<WithdrawNested>) -> Result<()> {
        instructions::withdraw_nested::handler(ctx)
    }
}
