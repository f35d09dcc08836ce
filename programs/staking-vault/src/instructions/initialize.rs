use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    errors::*,
    events::*,
    identity::{VaultIdentity, VaultSigner},
    ledger::{mint_view, MintView},
    state::*,
};

/// Bind an underlying mint and an xToken mint to a new vault
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Pays for the custody account and the config
    #[account(mut)]
    pub initializer: Signer<'info>,

    /// Mint of the token users stake
    pub token_mint: Account<'info, Mint>,

    /// Mint of the xToken, whose mint authority must already be the vault PDA
    pub x_token_mint: Account<'info, Mint>,

    /// Custody account at the vault PDA, its own token authority
    #[account(
        init,
        payer = initializer,
        seeds = [token_mint.key().as_ref()],
        bump,
        token::mint = token_mint,
        token::authority = token_vault,
    )]
    pub token_vault: Account<'info, TokenAccount>,

    /// Vault binding PDA
    #[account(
        init,
        payer = initializer,
        space = VAULT_CONFIG_SIZE,
        seeds = [CONFIG_SEED, token_mint.key().as_ref()],
        bump
    )]
    pub config: Account<'info, VaultConfig>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Validate everything initialize binds.
///
/// The xToken mint must be a fresh mint controlled by the vault: otherwise
/// shares could exist that the vault never issued.
pub fn validate_binding(
    program_id: &Pubkey,
    token_mint: &Pubkey,
    x_token_mint: &Pubkey,
    x_token_mint_state: &MintView,
    token_vault: &Pubkey,
    vault_bump: u8,
) -> Result<VaultSigner> {
    let signer = VaultIdentity::verify(program_id, token_mint, token_vault, vault_bump)?;

    require_keys_neq!(*token_mint, *x_token_mint, VaultError::AssetIdentityMismatch);

    let authority = x_token_mint_state.mint_authority.unwrap_or_default();
    require_keys_eq!(authority, signer.address(), VaultError::AssetIdentityMismatch);

    if x_token_mint_state.supply != 0 {
        return Err(error!(VaultError::AssetIdentityMismatch)
            .with_values((x_token_mint_state.supply, 0u64)));
    }

    Ok(signer)
}

pub fn handler(ctx: Context<Initialize>, vault_bump: u8) -> Result<()> {
    let x_mint = &ctx.accounts.x_token_mint;
    let x_token_mint_state = mint_view(x_mint);

    // The custody account is already created by `init`; a failed check here
    // rolls that back with the rest of the transaction
    let signer = validate_binding(
        ctx.program_id,
        &ctx.accounts.token_mint.key(),
        &x_mint.key(),
        &x_token_mint_state,
        &ctx.accounts.token_vault.key(),
        vault_bump,
    )?;

    let config = &mut ctx.accounts.config;
    config.token_mint = ctx.accounts.token_mint.key();
    config.x_token_mint = x_mint.key();
    config.token_vault = signer.address();
    config.vault_bump = vault_bump;
    config.bump = ctx.bumps.config;
    config._reserved = [0; 64];

    msg!("Vault {} bound to mint {}", config.token_vault, config.token_mint);

    emit!(VaultInitialized {
        token_mint: config.token_mint,
        x_token_mint: config.x_token_mint,
        token_vault: config.token_vault,
        initializer: ctx.accounts.initializer.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
