use anchor_lang::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, CloseAccount, Mint, MintTo, TokenAccount, TransferChecked};

use crate::identity::VaultSigner;

/// The fields of an SPL token account the vault cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAccountView {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

/// The fields of an SPL mint the vault cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintView {
    pub supply: u64,
    pub decimals: u8,
    pub mint_authority: Option<Pubkey>,
}

pub fn mint_view(state: &Mint) -> MintView {
    MintView {
        supply: state.supply,
        decimals: state.decimals,
        mint_authority: state.mint_authority.into(),
    }
}

/// Who authorizes a token movement
#[derive(Clone, Copy, Debug)]
pub enum Authority<'a> {
    /// An ordinary wallet that signed the transaction
    Holder(Pubkey),
    /// The vault PDA, via the capability of the current instruction
    Vault(&'a VaultSigner),
}

impl Authority<'_> {
    pub fn key(&self) -> Pubkey {
        match self {
            Authority::Holder(key) => *key,
            Authority::Vault(signer) => signer.address(),
        }
    }
}

/// Token issuance service used by the processors.
///
/// On chain this is the SPL Token program reached through CPI; tests plug in
/// an in-memory ledger. Reads always reflect writes made earlier in the same
/// instruction.
pub trait TokenLedger {
    fn token_account(&self, account: &Pubkey) -> Result<TokenAccountView>;

    fn mint(&self, mint: &Pubkey) -> Result<MintView>;

    fn balance_of(&self, account: &Pubkey) -> Result<u64> {
        Ok(self.token_account(account)?.amount)
    }

    fn supply_of(&self, mint: &Pubkey) -> Result<u64> {
        Ok(self.mint(mint)?.supply)
    }

    fn transfer(
        &mut self,
        mint: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
        authority: Authority<'_>,
    ) -> Result<()>;

    fn mint_to(&mut self, mint: &Pubkey, to: &Pubkey, amount: u64, authority: &VaultSigner)
        -> Result<()>;

    /// Burns are always signed by the wallet that owns `from`
    fn burn(&mut self, mint: &Pubkey, from: &Pubkey, amount: u64, owner: &Pubkey) -> Result<()>;

    fn close_account(
        &mut self,
        account: &Pubkey,
        refund_to: &Pubkey,
        authority: &VaultSigner,
    ) -> Result<()>;
}

/// `TokenLedger` backed by SPL Token CPIs over the accounts of an instruction
pub struct CpiLedger<'info> {
    token_program: AccountInfo<'info>,
    accounts: Vec<AccountInfo<'info>>,
}

impl<'info> CpiLedger<'info> {
    pub fn new(token_program: AccountInfo<'info>, accounts: Vec<AccountInfo<'info>>) -> Self {
        Self {
            token_program,
            accounts,
        }
    }

    fn info(&self, key: &Pubkey) -> Result<AccountInfo<'info>> {
        self.accounts
            .iter()
            .find(|info| info.key == key)
            .cloned()
            .ok_or_else(|| {
                msg!("Account {} not passed to instruction", key);
                error!(ErrorCode::AccountNotEnoughKeys)
            })
    }

    fn token_owned(&self, key: &Pubkey) -> Result<AccountInfo<'info>> {
        let info = self.info(key)?;
        require_keys_eq!(*info.owner, token::ID, ErrorCode::AccountOwnedByWrongProgram);
        Ok(info)
    }
}

impl<'info> TokenLedger for CpiLedger<'info> {
    fn token_account(&self, account: &Pubkey) -> Result<TokenAccountView> {
        let info = self.token_owned(account)?;
        let data = info.try_borrow_data()?;
        let state = TokenAccount::try_deserialize(&mut &data[..])?;
        Ok(TokenAccountView {
            mint: state.mint,
            owner: state.owner,
            amount: state.amount,
        })
    }

    fn mint(&self, mint: &Pubkey) -> Result<MintView> {
        let info = self.token_owned(mint)?;
        let data = info.try_borrow_data()?;
        let state = Mint::try_deserialize(&mut &data[..])?;
        Ok(mint_view(&state))
    }

    fn transfer(
        &mut self,
        mint: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
        authority: Authority<'_>,
    ) -> Result<()> {
        let decimals = self.mint(mint)?.decimals;
        let accounts = TransferChecked {
            from: self.info(from)?,
            mint: self.info(mint)?,
            to: self.info(to)?,
            authority: self.info(&authority.key())?,
        };
        match authority {
            Authority::Holder(_) => token::transfer_checked(
                CpiContext::new(self.token_program.clone(), accounts),
                amount,
                decimals,
            ),
            Authority::Vault(signer) => {
                let seeds = signer.seeds();
                let signer_seeds: &[&[&[u8]]] = &[&seeds[..]];
                token::transfer_checked(
                    CpiContext::new_with_signer(self.token_program.clone(), accounts, signer_seeds),
                    amount,
                    decimals,
                )
            }
        }
    }

    fn mint_to(
        &mut self,
        mint: &Pubkey,
        to: &Pubkey,
        amount: u64,
        authority: &VaultSigner,
    ) -> Result<()> {
        let seeds = authority.seeds();
        let signer_seeds: &[&[&[u8]]] = &[&seeds[..]];
        token::mint_to(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                MintTo {
                    mint: self.info(mint)?,
                    to: self.info(to)?,
                    authority: self.info(&authority.address())?,
                },
                signer_seeds,
            ),
            amount,
        )
    }

    fn burn(&mut self, mint: &Pubkey, from: &Pubkey, amount: u64, owner: &Pubkey) -> Result<()> {
        token::burn(
            CpiContext::new(
                self.token_program.clone(),
                Burn {
                    mint: self.info(mint)?,
                    from: self.info(from)?,
                    authority: self.info(owner)?,
                },
            ),
            amount,
        )
    }

    fn close_account(
        &mut self,
        account: &Pubkey,
        refund_to: &Pubkey,
        authority: &VaultSigner,
    ) -> Result<()> {
        let seeds = authority.seeds();
        let signer_seeds: &[&[&[u8]]] = &[&seeds[..]];
        token::close_account(CpiContext::new_with_signer(
            self.token_program.clone(),
            CloseAccount {
                account: self.info(account)?,
                destination: self.info(refund_to)?,
                authority: self.info(&authority.address())?,
            },
            signer_seeds,
        ))
    }
}
