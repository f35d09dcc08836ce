use anchor_lang::prelude::*;

use crate::{constants::*, errors::VaultError};

/// Calculate shares to mint for a deposit
///
/// - No shares outstanding: shares = deposit (1:1, even if the vault is prefilled)
/// - Otherwise: shares = floor(deposit * share_supply / vault_balance)
///
/// Flooring keeps any remainder in the vault for existing holders.
pub fn deposit_to_shares(deposit: u64, vault_balance: u64, share_supply: u64) -> Result<u64> {
    if share_supply == 0 {
        return Ok(deposit);
    }

    // Shares outstanding against an empty vault means the books are already wrong
    if vault_balance == 0 {
        return Err(error!(VaultError::InsufficientVaultBalance)
            .with_values((vault_balance, share_supply)));
    }

    let shares = (deposit as u128)
        .checked_mul(share_supply as u128)
        .ok_or(error!(VaultError::ArithmeticOverflow))?
        .checked_div(vault_balance as u128)
        .ok_or(error!(VaultError::DivisionByZero))?;

    u64::try_from(shares).map_err(|_| error!(VaultError::ArithmeticOverflow))
}

/// Calculate underlying released for burning `shares`
///
/// underlying = floor(shares * vault_balance / share_supply)
pub fn shares_to_deposit(shares: u64, vault_balance: u64, share_supply: u64) -> Result<u64> {
    if share_supply == 0 {
        return Err(error!(VaultError::DivisionByZero));
    }

    let underlying = (shares as u128)
        .checked_mul(vault_balance as u128)
        .ok_or(error!(VaultError::ArithmeticOverflow))?
        .checked_div(share_supply as u128)
        .ok_or(error!(VaultError::DivisionByZero))?;

    u64::try_from(underlying).map_err(|_| error!(VaultError::ArithmeticOverflow))
}

/// Underlying per share scaled by PRICE_SCALE. Reports 1:1 while no shares exist.
pub fn price_e9(vault_balance: u64, share_supply: u64) -> u128 {
    if share_supply == 0 {
        return PRICE_SCALE;
    }
    // u64 * 1e9 always fits in u128
    (vault_balance as u128) * PRICE_SCALE / (share_supply as u128)
}

/// Render a PRICE_SCALE fixed-point value as a trimmed decimal, e.g. "1.2"
pub fn format_price(rate_e9: u128) -> String {
    let whole = rate_e9 / PRICE_SCALE;
    let frac = rate_e9 % PRICE_SCALE;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", frac, width = PRICE_DECIMALS);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
