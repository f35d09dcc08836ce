use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    events::*,
    identity::VaultIdentity,
    ledger::{CpiLedger, TokenLedger},
    math,
    state::*,
};

/// Read-only: report the current underlying-per-share rate
#[derive(Accounts)]
pub struct EmitPrice<'info> {
    pub token_mint: Account<'info, Mint>,

    pub x_token_mint: Account<'info, Mint>,

    pub token_vault: Account<'info, TokenAccount>,

    #[account(
        seeds = [CONFIG_SEED, token_mint.key().as_ref()],
        bump = config.bump,
    )]
    pub config: Account<'info, VaultConfig>,

    pub token_program: Program<'info, Token>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceReport {
    pub rate_e9: u128,
    pub rate: String,
}

/// Takes the ledger by shared reference, so it cannot move tokens
pub fn process_emit_price<L: TokenLedger>(
    ledger: &L,
    config: &VaultConfig,
    keys: &VaultKeys,
) -> Result<PriceReport> {
    VaultIdentity::verify(
        &keys.program_id,
        &keys.token_mint,
        &keys.token_vault,
        config.vault_bump,
    )?;
    config.check_binding(keys)?;

    let rate_e9 = math::price_e9(
        ledger.balance_of(&keys.token_vault)?,
        ledger.supply_of(&keys.x_token_mint)?,
    );

    Ok(PriceReport {
        rate_e9,
        rate: math::format_price(rate_e9),
    })
}

pub fn handler(ctx: Context<EmitPrice>) -> Result<()> {
    let accounts = &ctx.accounts;
    let keys = VaultKeys {
        program_id: *ctx.program_id,
        token_mint: accounts.token_mint.key(),
        x_token_mint: accounts.x_token_mint.key(),
        token_vault: accounts.token_vault.key(),
    };
    let ledger = CpiLedger::new(
        accounts.token_program.to_account_info(),
        vec![
            accounts.x_token_mint.to_account_info(),
            accounts.token_vault.to_account_info(),
        ],
    );

    let report = process_emit_price(&ledger, &accounts.config, &keys)?;

    emit!(Price {
        rate_e9: report.rate_e9,
        rate: report.rate,
    });

    Ok(())
}
