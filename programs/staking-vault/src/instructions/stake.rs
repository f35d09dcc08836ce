use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    errors::*,
    events::*,
    identity::VaultIdentity,
    ledger::{Authority, CpiLedger, TokenLedger},
    math,
    state::*,
};

/// Stake tokens into the vault and receive xTokens
///
/// Mint, owner and PDA checks are done by `process_stake` rather than by
/// account constraints, so a bad bump surfaces as `IdentityMismatch`.
#[derive(Accounts)]
pub struct Stake<'info> {
    pub token_mint: Account<'info, Mint>,

    #[account(mut)]
    pub x_token_mint: Account<'info, Mint>,

    /// Depositor's token account (source)
    #[account(mut)]
    pub token_from: Account<'info, TokenAccount>,

    pub token_from_authority: Signer<'info>,

    /// Custody account at the vault PDA
    #[account(mut)]
    pub token_vault: Account<'info, TokenAccount>,

    /// Depositor's xToken account (destination)
    #[account(mut)]
    pub x_token_to: Account<'info, TokenAccount>,

    #[account(
        seeds = [CONFIG_SEED, token_mint.key().as_ref()],
        bump = config.bump,
    )]
    pub config: Account<'info, VaultConfig>,

    pub token_program: Program<'info, Token>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeOutcome {
    pub shares_out: u64,
    pub price_before: u128,
    pub price_after: u128,
}

pub fn process_stake<L: TokenLedger>(
    ledger: &mut L,
    config: &VaultConfig,
    keys: &VaultKeys,
    holder: &HolderAccounts,
    vault_bump: u8,
    amount: u64,
) -> Result<StakeOutcome> {
    // CHECKS
    if amount == 0 {
        return Err(error!(VaultError::InvalidAmount).with_values((amount, 0u64)));
    }

    let signer = VaultIdentity::verify(
        &keys.program_id,
        &keys.token_mint,
        &keys.token_vault,
        vault_bump,
    )?;
    config.check_binding(keys)?;

    let source = ledger.token_account(&holder.token_account)?;
    require_keys_eq!(source.mint, keys.token_mint, VaultError::AssetIdentityMismatch);
    require_keys_eq!(source.owner, holder.authority, VaultError::InvalidOwner);
    if source.amount < amount {
        return Err(error!(VaultError::InvalidAmount).with_values((amount, source.amount)));
    }

    let destination = ledger.token_account(&holder.x_token_account)?;
    require_keys_eq!(destination.mint, keys.x_token_mint, VaultError::AssetIdentityMismatch);

    // Balance and supply are read once; everything below is computed from them
    let vault_balance = ledger.balance_of(&keys.token_vault)?;
    let share_supply = ledger.supply_of(&keys.x_token_mint)?;

    let shares_out = math::deposit_to_shares(amount, vault_balance, share_supply)?;
    if shares_out == 0 {
        // Deposit is worth less than one share unit at the current rate
        return Err(error!(VaultError::InvalidAmount).with_values((amount, shares_out)));
    }

    let balance_after = vault_balance
        .checked_add(amount)
        .ok_or(error!(VaultError::ArithmeticOverflow))?;
    let supply_after = share_supply
        .checked_add(shares_out)
        .ok_or(error!(VaultError::ArithmeticOverflow))?;

    // INTERACTIONS
    ledger.transfer(
        &keys.token_mint,
        &holder.token_account,
        &keys.token_vault,
        amount,
        Authority::Holder(holder.authority),
    )?;
    ledger.mint_to(&keys.x_token_mint, &holder.x_token_account, shares_out, &signer)?;

    Ok(StakeOutcome {
        shares_out,
        price_before: math::price_e9(vault_balance, share_supply),
        price_after: math::price_e9(balance_after, supply_after),
    })
}

pub fn handler(ctx: Context<Stake>, vault_bump: u8, amount: u64) -> Result<()> {
    let accounts = &ctx.accounts;
    let keys = VaultKeys {
        program_id: *ctx.program_id,
        token_mint: accounts.token_mint.key(),
        x_token_mint: accounts.x_token_mint.key(),
        token_vault: accounts.token_vault.key(),
    };
    let holder = HolderAccounts {
        authority: accounts.token_from_authority.key(),
        token_account: accounts.token_from.key(),
        x_token_account: accounts.x_token_to.key(),
    };

    let mut ledger = CpiLedger::new(
        accounts.token_program.to_account_info(),
        vec![
            accounts.token_mint.to_account_info(),
            accounts.x_token_mint.to_account_info(),
            accounts.token_from.to_account_info(),
            accounts.token_from_authority.to_account_info(),
            accounts.token_vault.to_account_info(),
            accounts.x_token_to.to_account_info(),
        ],
    );

    let outcome =
        process_stake(&mut ledger, &accounts.config, &keys, &holder, vault_bump, amount)?;

    msg!("Staked {} for {} xTokens", amount, outcome.shares_out);

    emit!(Staked {
        token_vault: keys.token_vault,
        user: holder.authority,
        amount,
        shares_minted: outcome.shares_out,
        timestamp: Clock::get()?.unix_timestamp,
    });
    emit!(PriceChange {
        old_rate_e9: outcome.price_before,
        old_rate: math::format_price(outcome.price_before),
        new_rate_e9: outcome.price_after,
        new_rate: math::format_price(outcome.price_after),
    });

    Ok(())
}
