use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::get_associated_token_address,
    token::{Mint, Token, TokenAccount},
};

use crate::{
    constants::*,
    errors::*,
    events::*,
    identity::VaultIdentity,
    ledger::{Authority, CpiLedger, TokenLedger},
    state::*,
};

/// Recover tokens sent to the vault's own associated token account
///
/// Wallets sometimes send to ATA(owner = vault PDA) instead of the vault
/// itself. Those funds are invisible to the exchange rate until they are moved
/// back into custody and the stray account is closed.
#[derive(Accounts)]
pub struct WithdrawNested<'info> {
    /// Receives the stray account's rent
    #[account(mut)]
    pub refundee: Signer<'info>,

    pub token_mint: Account<'info, Mint>,

    pub x_token_mint: Account<'info, Mint>,

    /// Custody account at the vault PDA
    #[account(mut)]
    pub token_vault: Account<'info, TokenAccount>,

    /// The stray account, validated in `process_withdraw_nested`
    #[account(mut)]
    pub token_vault_nested_ata: Account<'info, TokenAccount>,

    #[account(
        seeds = [CONFIG_SEED, token_mint.key().as_ref()],
        bump = config.bump,
    )]
    pub config: Account<'info, VaultConfig>,

    pub token_program: Program<'info, Token>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RescueOutcome {
    pub amount: u64,
    pub vault_balance: u64,
}

pub fn process_withdraw_nested<L: TokenLedger>(
    ledger: &mut L,
    config: &VaultConfig,
    keys: &VaultKeys,
    nested: &Pubkey,
    refundee: &Pubkey,
) -> Result<RescueOutcome> {
    // CHECKS
    let identity = VaultIdentity::derive(&keys.program_id, &keys.token_mint);
    let signer = identity.authorize(&keys.token_vault, config.vault_bump)?;
    config.check_binding(keys)?;

    require_keys_neq!(*nested, keys.token_vault, VaultError::UnauthorizedRescueTarget);

    let expected = get_associated_token_address(&identity.address, &keys.token_mint);
    require_keys_eq!(*nested, expected, VaultError::UnauthorizedRescueTarget);

    let stray = ledger.token_account(nested)?;
    require_keys_eq!(stray.mint, keys.token_mint, VaultError::UnauthorizedRescueTarget);
    require_keys_eq!(stray.owner, identity.address, VaultError::UnauthorizedRescueTarget);

    let vault_balance = ledger
        .balance_of(&keys.token_vault)?
        .checked_add(stray.amount)
        .ok_or(error!(VaultError::ArithmeticOverflow))?;

    // INTERACTIONS
    if stray.amount > 0 {
        ledger.transfer(
            &keys.token_mint,
            nested,
            &keys.token_vault,
            stray.amount,
            Authority::Vault(&signer),
        )?;
    }
    ledger.close_account(nested, refundee, &signer)?;

    Ok(RescueOutcome {
        amount: stray.amount,
        vault_balance,
    })
}

pub fn handler(ctx: Context<WithdrawNested>) -> Result<()> {
    let accounts = &ctx.accounts;
    let keys = VaultKeys {
        program_id: *ctx.program_id,
        token_mint: accounts.token_mint.key(),
        x_token_mint: accounts.x_token_mint.key(),
        token_vault: accounts.token_vault.key(),
    };
    let nested = accounts.token_vault_nested_ata.key();
    let refundee = accounts.refundee.key();

    let mut ledger = CpiLedger::new(
        accounts.token_program.to_account_info(),
        vec![
            accounts.refundee.to_account_info(),
            accounts.token_mint.to_account_info(),
            accounts.token_vault.to_account_info(),
            accounts.token_vault_nested_ata.to_account_info(),
        ],
    );

    let outcome =
        process_withdraw_nested(&mut ledger, &accounts.config, &keys, &nested, &refundee)?;

    msg!("Recovered {} from stray account {}", outcome.amount, nested);

    emit!(NestedWithdrawn {
        token_vault: keys.token_vault,
        nested_account: nested,
        amount: outcome.amount,
        refundee,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
