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

/// Redeem xTokens for a proportional share of the vault
#[derive(Accounts)]
pub struct Unstake<'info> {
    pub token_mint: Account<'info, Mint>,

    #[account(mut)]
    pub x_token_mint: Account<'info, Mint>,

    /// Holder's xToken account, burned from
    #[account(mut)]
    pub x_token_from: Account<'info, TokenAccount>,

    pub x_token_from_authority: Signer<'info>,

    /// Custody account at the vault PDA
    #[account(mut)]
    pub token_vault: Account<'info, TokenAccount>,

    /// Holder's token account (destination)
    #[account(mut)]
    pub token_to: Account<'info, TokenAccount>,

    #[account(
        seeds = [CONFIG_SEED, token_mint.key().as_ref()],
        bump = config.bump,
    )]
    pub config: Account<'info, VaultConfig>,

    pub token_program: Program<'info, Token>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnstakeOutcome {
    pub deposit_out: u64,
    pub price_before: u128,
    pub price_after: u128,
}

pub fn process_unstake<L: TokenLedger>(
    ledger: &mut L,
    config: &VaultConfig,
    keys: &VaultKeys,
    holder: &HolderAccounts,
    vault_bump: u8,
    shares: u64,
) -> Result<UnstakeOutcome> {
    // CHECKS
    if shares == 0 {
        return Err(error!(VaultError::InvalidAmount).with_values((shares, 0u64)));
    }

    let signer = VaultIdentity::verify(
        &keys.program_id,
        &keys.token_mint,
        &keys.token_vault,
        vault_bump,
    )?;
    config.check_binding(keys)?;

    let source = ledger.token_account(&holder.x_token_account)?;
    require_keys_eq!(source.mint, keys.x_token_mint, VaultError::AssetIdentityMismatch);
    require_keys_eq!(source.owner, holder.authority, VaultError::InvalidOwner);
    if source.amount < shares {
        return Err(error!(VaultError::InvalidAmount).with_values((shares, source.amount)));
    }

    let destination = ledger.token_account(&holder.token_account)?;
    require_keys_eq!(destination.mint, keys.token_mint, VaultError::AssetIdentityMismatch);

    let vault_balance = ledger.balance_of(&keys.token_vault)?;
    let share_supply = ledger.supply_of(&keys.x_token_mint)?;

    let deposit_out = math::shares_to_deposit(shares, vault_balance, share_supply)?;
    if deposit_out > vault_balance {
        msg!(
            "Redemption of {} shares owes {} but vault holds {}",
            shares,
            deposit_out,
            vault_balance
        );
        return Err(error!(VaultError::InsufficientVaultBalance)
            .with_values((deposit_out, vault_balance)));
    }
    if deposit_out == 0 {
        // Shares are worth less than one token unit; burning them would pay nothing
        return Err(error!(VaultError::InvalidAmount).with_values((shares, deposit_out)));
    }

    let balance_after = vault_balance - deposit_out;
    let supply_after = share_supply
        .checked_sub(shares)
        .ok_or(error!(VaultError::InsufficientVaultBalance))?;

    // INTERACTIONS: burn first, then pay out
    ledger.burn(&keys.x_token_mint, &holder.x_token_account, shares, &holder.authority)?;
    ledger.transfer(
        &keys.token_mint,
        &keys.token_vault,
        &holder.token_account,
        deposit_out,
        Authority::Vault(&signer),
    )?;

    Ok(UnstakeOutcome {
        deposit_out,
        price_before: math::price_e9(vault_balance, share_supply),
        price_after: math::price_e9(balance_after, supply_after),
    })
}

pub fn handler(ctx: Context<Unstake>, vault_bump: u8, amount: u64) -> Result<()> {
    let accounts = &ctx.accounts;
    let keys = VaultKeys {
        program_id: *ctx.program_id,
        token_mint: accounts.token_mint.key(),
        x_token_mint: accounts.x_token_mint.key(),
        token_vault: accounts.token_vault.key(),
    };
    let holder = HolderAccounts {
        authority: accounts.x_token_from_authority.key(),
        token_account: accounts.token_to.key(),
        x_token_account: accounts.x_token_from.key(),
    };

    let mut ledger = CpiLedger::new(
        accounts.token_program.to_account_info(),
        vec![
            accounts.token_mint.to_account_info(),
            accounts.x_token_mint.to_account_info(),
            accounts.x_token_from.to_account_info(),
            accounts.x_token_from_authority.to_account_info(),
            accounts.token_vault.to_account_info(),
            accounts.token_to.to_account_info(),
        ],
    );

    let outcome =
        process_unstake(&mut ledger, &accounts.config, &keys, &holder, vault_bump, amount)?;

    msg!("Unstaked {} xTokens for {}", amount, outcome.deposit_out);

    emit!(Unstaked {
        token_vault: keys.token_vault,
        user: holder.authority,
        shares_burned: amount,
        amount: outcome.deposit_out,
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
