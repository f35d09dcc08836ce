#![allow(dead_code)]

use std::collections::HashMap;

use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use staking_vault::{
    errors::VaultError,
    identity::{VaultIdentity, VaultSigner},
    ledger::{Authority, MintView, TokenAccountView, TokenLedger},
    state::{HolderAccounts, VaultConfig, VaultKeys},
};

/// Rent an SPL token account carries; refunded on close
pub const TOKEN_ACCOUNT_RENT: u64 = 2_039_280;

/// In-memory stand-in for the SPL Token program.
///
/// Enforces the same owner / mint-authority rules as the real program and can
/// run a closure as one transaction (state restored on error).
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    mints: HashMap<Pubkey, MintView>,
    accounts: HashMap<Pubkey, TokenAccountView>,
    pub lamports: HashMap<Pubkey, u64>,
}

impl MemoryLedger {
    pub fn create_mint(&mut self, mint_authority: Option<Pubkey>, decimals: u8) -> Pubkey {
        let mint = Pubkey::new_unique();
        self.mints.insert(
            mint,
            MintView {
                supply: 0,
                decimals,
                mint_authority,
            },
        );
        mint
    }

    pub fn create_account(&mut self, mint: &Pubkey, owner: &Pubkey) -> Pubkey {
        let address = Pubkey::new_unique();
        self.create_account_at(&address, mint, owner);
        address
    }

    pub fn create_account_at(&mut self, address: &Pubkey, mint: &Pubkey, owner: &Pubkey) {
        assert!(self.mints.contains_key(mint), "unknown mint");
        assert!(!self.accounts.contains_key(address), "account exists");
        self.accounts.insert(
            *address,
            TokenAccountView {
                mint: *mint,
                owner: *owner,
                amount: 0,
            },
        );
        self.lamports.insert(*address, TOKEN_ACCOUNT_RENT);
    }

    /// Mint by an authority outside the vault (airdrops, test funding)
    pub fn airdrop(&mut self, to: &Pubkey, amount: u64) {
        let account = self.accounts.get_mut(to).expect("account");
        account.amount += amount;
        let mint = self.mints.get_mut(&account.mint).expect("mint");
        mint.supply += amount;
    }

    pub fn exists(&self, account: &Pubkey) -> bool {
        self.accounts.contains_key(account)
    }

    pub fn balance(&self, account: &Pubkey) -> u64 {
        self.accounts[account].amount
    }

    pub fn supply(&self, mint: &Pubkey) -> u64 {
        self.mints[mint].supply
    }

    pub fn lamports_of(&self, key: &Pubkey) -> u64 {
        self.lamports.get(key).copied().unwrap_or(0)
    }

    /// Run `op` as a single transaction
    pub fn atomic<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.clone();
        let result = op(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn account_mut(&mut self, key: &Pubkey) -> Result<&mut TokenAccountView> {
        self.accounts
            .get_mut(key)
            .ok_or(ProgramError::UninitializedAccount.into())
    }
}

impl TokenLedger for MemoryLedger {
    fn token_account(&self, account: &Pubkey) -> Result<TokenAccountView> {
        self.accounts
            .get(account)
            .copied()
            .ok_or(ProgramError::UninitializedAccount.into())
    }

    fn mint(&self, mint: &Pubkey) -> Result<MintView> {
        self.mints
            .get(mint)
            .copied()
            .ok_or(ProgramError::UninitializedAccount.into())
    }

    fn transfer(
        &mut self,
        mint: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
        authority: Authority<'_>,
    ) -> Result<()> {
        let source = self.token_account(from)?;
        let destination = self.token_account(to)?;
        if source.mint != *mint || destination.mint != *mint {
            return Err(ProgramError::InvalidAccountData.into());
        }
        if source.owner != authority.key() {
            return Err(ProgramError::MissingRequiredSignature.into());
        }
        if source.amount < amount {
            return Err(ProgramError::InsufficientFunds.into());
        }
        self.account_mut(from)?.amount -= amount;
        let destination = self.account_mut(to)?;
        destination.amount = destination
            .amount
            .checked_add(amount)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        Ok(())
    }

    fn mint_to(
        &mut self,
        mint: &Pubkey,
        to: &Pubkey,
        amount: u64,
        authority: &VaultSigner,
    ) -> Result<()> {
        let state = self.mint(mint)?;
        if state.mint_authority != Some(authority.address()) {
            return Err(ProgramError::MissingRequiredSignature.into());
        }
        if self.token_account(to)?.mint != *mint {
            return Err(ProgramError::InvalidAccountData.into());
        }
        let supply = state
            .supply
            .checked_add(amount)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        self.account_mut(to)?.amount += amount;
        self.mints.get_mut(mint).expect("mint").supply = supply;
        Ok(())
    }

    fn burn(&mut self, mint: &Pubkey, from: &Pubkey, amount: u64, owner: &Pubkey) -> Result<()> {
        let source = self.token_account(from)?;
        if source.mint != *mint {
            return Err(ProgramError::InvalidAccountData.into());
        }
        if source.owner != *owner {
            return Err(ProgramError::MissingRequiredSignature.into());
        }
        if source.amount < amount {
            return Err(ProgramError::InsufficientFunds.into());
        }
        self.account_mut(from)?.amount -= amount;
        self.mints.get_mut(mint).expect("mint").supply -= amount;
        Ok(())
    }

    fn close_account(
        &mut self,
        account: &Pubkey,
        refund_to: &Pubkey,
        authority: &VaultSigner,
    ) -> Result<()> {
        let state = self.token_account(account)?;
        if state.owner != authority.address() {
            return Err(ProgramError::MissingRequiredSignature.into());
        }
        if state.amount != 0 {
            return Err(ProgramError::InvalidAccountData.into());
        }
        self.accounts.remove(account);
        let rent = self.lamports.remove(account).unwrap_or(0);
        *self.lamports.entry(*refund_to).or_insert(0) += rent;
        Ok(())
    }
}

/// A vault as `initialize` leaves it: custody account at the PDA, xToken mint
/// controlled by the PDA, binding recorded.
pub struct VaultFixture {
    pub ledger: MemoryLedger,
    pub keys: VaultKeys,
    pub config: VaultConfig,
    pub vault_bump: u8,
    /// Outside authority of the staked token, used for airdrops
    pub token_mint_authority: Pubkey,
}

impl VaultFixture {
    pub fn new() -> Self {
        let mut ledger = MemoryLedger::default();
        let program_id = staking_vault::id();
        let token_mint_authority = Pubkey::new_unique();
        let token_mint = ledger.create_mint(Some(token_mint_authority), 9);

        let identity = VaultIdentity::derive(&program_id, &token_mint);
        let x_token_mint = ledger.create_mint(Some(identity.address), 9);
        ledger.create_account_at(&identity.address, &token_mint, &identity.address);

        let keys = VaultKeys {
            program_id,
            token_mint,
            x_token_mint,
            token_vault: identity.address,
        };
        let config = VaultConfig {
            token_mint,
            x_token_mint,
            token_vault: identity.address,
            vault_bump: identity.bump,
            bump: 0,
            _reserved: [0; 64],
        };

        Self {
            ledger,
            keys,
            config,
            vault_bump: identity.bump,
            token_mint_authority,
        }
    }

    /// New wallet with token and xToken accounts, funded with `tokens`
    pub fn holder(&mut self, tokens: u64) -> HolderAccounts {
        let authority = Pubkey::new_unique();
        let token_account = self.ledger.create_account(&self.keys.token_mint, &authority);
        let x_token_account = self.ledger.create_account(&self.keys.x_token_mint, &authority);
        if tokens > 0 {
            self.ledger.airdrop(&token_account, tokens);
        }
        HolderAccounts {
            authority,
            token_account,
            x_token_account,
        }
    }

    pub fn vault_balance(&self) -> u64 {
        self.ledger.balance(&self.keys.token_vault)
    }

    pub fn share_supply(&self) -> u64 {
        self.ledger.supply(&self.keys.x_token_mint)
    }

    pub fn nested_ata(&self) -> Pubkey {
        get_associated_token_address(&self.keys.token_vault, &self.keys.token_mint)
    }
}

pub fn assert_vault_error<T: std::fmt::Debug>(result: Result<T>, expected: VaultError) {
    match result {
        Err(Error::AnchorError(err)) => assert_eq!(
            err.error_code_number,
            u32::from(expected),
            "expected {:?}, got {}",
            expected,
            err.error_name
        ),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}
