//! DLC Stablecoin Contract
//!
//! Fungible token with protocol-controlled minting and burning. Only
//! authorized protocol contracts (the loan engine) can mint against
//! collateral or burn on repayment. 6 decimals, matching the USD
//! precision of the loan accounting.

use odra::casper_types::U128;
use odra::prelude::*;
use crate::errors::DlcError;

/// DLC Stablecoin Contract
#[odra::module]
pub struct DlcStablecoin {
    /// Token name
    name: Var<String>,
    /// Token symbol
    symbol: Var<String>,
    /// Decimals (6)
    decimals: Var<u8>,
    /// Total supply
    total_supply: Var<U128>,
    /// Balance mapping
    balances: Mapping<Address, U128>,
    /// Allowance mapping (owner -> spender -> amount)
    allowances: Mapping<(Address, Address), U128>,
    /// Contract owner, allowed to manage minters
    owner: Var<Address>,
    /// Authorized minters (protocol contracts)
    authorized_minters: Mapping<Address, bool>,
}

#[odra::module]
impl DlcStablecoin {
    /// Initialize the stablecoin
    pub fn init(&mut self, name: String, symbol: String) {
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(6);
        self.total_supply.set(U128::zero());
        self.owner.set(self.env().caller());
    }

    // ========== Standard Token Functions ==========

    /// Get token name
    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    /// Get token symbol
    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    /// Get decimals
    pub fn decimals(&self) -> u8 {
        self.decimals.get_or_default()
    }

    /// Get total supply
    pub fn total_supply(&self) -> U128 {
        self.total_supply.get_or_default()
    }

    /// Get balance of an account
    pub fn balance_of(&self, account: Address) -> U128 {
        self.balances.get(&account).unwrap_or_default()
    }

    /// Get allowance for spender
    pub fn allowance(&self, owner: Address, spender: Address) -> U128 {
        self.allowances.get(&(owner, spender)).unwrap_or_default()
    }

    /// Transfer tokens to recipient
    pub fn transfer(&mut self, recipient: Address, amount: U128) -> bool {
        let sender = self.env().caller();
        self.transfer_internal(sender, recipient, amount);
        true
    }

    /// Approve spender to spend tokens
    pub fn approve(&mut self, spender: Address, amount: U128) -> bool {
        let owner = self.env().caller();
        self.allowances.set(&(owner, spender), amount);
        true
    }

    /// Transfer tokens from owner to recipient (requires allowance)
    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U128) -> bool {
        let spender = self.env().caller();

        let current_allowance = self.allowance(owner, spender);
        if current_allowance < amount {
            self.env().revert(DlcError::InsufficientBalance);
        }

        self.transfer_internal(owner, recipient, amount);
        self.allowances.set(&(owner, spender), current_allowance - amount);
        true
    }

    // ========== Protocol Functions (Restricted) ==========

    /// Mint new tokens (only authorized minters)
    pub fn mint(&mut self, to: Address, amount: U128) {
        self.require_authorized_minter();

        self.balances.set(&to, self.balance_of(to) + amount);
        self.total_supply.set(self.total_supply() + amount);
    }

    /// Burn tokens from account (only authorized minters, used for repayment)
    pub fn burn(&mut self, from: Address, amount: U128) {
        self.require_authorized_minter();

        let current_balance = self.balance_of(from);
        if current_balance < amount {
            self.env().revert(DlcError::InsufficientBalance);
        }
        self.balances.set(&from, current_balance - amount);
        self.total_supply.set(self.total_supply() - amount);
    }

    // ========== Admin Functions ==========

    /// Add an authorized minter (owner only)
    pub fn add_minter(&mut self, minter: Address) {
        self.require_owner();
        self.authorized_minters.set(&minter, true);
    }

    /// Remove an authorized minter (owner only)
    pub fn remove_minter(&mut self, minter: Address) {
        self.require_owner();
        self.authorized_minters.set(&minter, false);
    }

    /// Check if address is authorized minter
    pub fn is_minter(&self, account: Address) -> bool {
        self.authorized_minters.get(&account).unwrap_or(false)
    }

    pub fn get_owner(&self) -> Option<Address> {
        self.owner.get()
    }

    // ========== Internal Functions ==========

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U128) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(DlcError::InsufficientBalance);
        }

        self.balances.set(&from, from_balance - amount);
        self.balances.set(&to, self.balance_of(to) + amount);
    }

    fn require_authorized_minter(&self) {
        if !self.is_minter(self.env().caller()) {
            self.env().revert(DlcError::UnauthorizedMinter);
        }
    }

    fn require_owner(&self) {
        if self.owner.get() != Some(self.env().caller()) {
            self.env().revert(DlcError::Unauthorized);
        }
    }
}
