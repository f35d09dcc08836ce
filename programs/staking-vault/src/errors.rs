use anchor_lang::prelude::*;

/// Custom error codes for the Staking Vault program
///
/// Every check that can raise one of these runs before the first token movement
/// of an instruction, so a failure never leaves a partial transfer behind.
#[error_code]
pub enum VaultError {
    #[msg("Supplied bump does not re-derive the vault address")]
    IdentityMismatch,

    #[msg("Amount must be greater than zero and covered by the authorizing balance")]
    InvalidAmount,

    #[msg("Arithmetic overflow in exchange rate computation")]
    ArithmeticOverflow,

    #[msg("Redemption exceeds the vault balance - accounting invariant violated")]
    InsufficientVaultBalance,

    #[msg("Rescue target is not a stray account owned by the vault")]
    UnauthorizedRescueTarget,

    #[msg("Supplied mint or account does not match the vault binding")]
    AssetIdentityMismatch,

    #[msg("Token account is not owned by the signer")]
    InvalidOwner,

    #[msg("Cannot divide by zero - vault has no shares outstanding")]
    DivisionByZero,
}
