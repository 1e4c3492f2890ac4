//! Collateralized Loan Engine
//!
//! Reference protocol contract built on the DLC manager. Each loan is a
//! vault: BTC collateral locked in a DLC on one side, stablecoin debt
//! minted against it on the other. The engine implements the full
//! `DlcProtocol` callback surface, so funding confirmations, price
//! answers and close finalizations all arrive from the manager within
//! the originating transaction.
//!
//! Entry points speak `U128`; the ratio helpers work on native `u128`,
//! multiply before dividing, and a full-range BTC price cannot overflow
//! or lose precision to ordering.

use odra::casper_types::bytesrepr::Bytes;
use odra::casper_types::{PublicKey, U128};
use odra::prelude::*;
use odra::ContractRef;

use crate::dlc_manager::DlcManagerContractRef;
use crate::errors::DlcError;
use crate::events;
use crate::stablecoin::DlcStablecoinContractRef;
use crate::types::{
    DlcUuid, Loan, LoanStatus, PricePoint, BPS_DIVISOR, OUTCOME_SCALE, SATS_PRICE_TO_USD6,
};

/// USD value (6 decimals) of BTC collateral given in sats and a 1e8
/// shifted price: sats (1e8) * price (1e8) / 1e10 lands on 1e6.
pub fn collateral_value_usd(btc_collateral: u128, btc_price: u128) -> u128 {
    btc_collateral * btc_price / SATS_PRICE_TO_USD6
}

/// A vault needs liquidation when its collateral-to-debt ratio has fallen
/// to the liquidation ratio or below. Equality liquidates. Debt-free
/// vaults never do.
pub fn check_liquidation_internal(
    vault_loan: u128,
    liquidation_ratio: u128,
    collateral_value: u128,
) -> bool {
    if vault_loan == 0 {
        return false;
    }
    collateral_value * BPS_DIVISOR / vault_loan <= liquidation_ratio
}

/// Share of the collateral owed to the protocol on liquidation, in basis
/// points: debt plus the liquidation fee, over the collateral value,
/// capped at 100%.
pub fn payout_ratio_bps(vault_loan: u128, liquidation_fee: u128, collateral_value: u128) -> u128 {
    if collateral_value == 0 {
        return BPS_DIVISOR;
    }
    let ratio = vault_loan * (BPS_DIVISOR + liquidation_fee) / collateral_value;
    ratio.min(BPS_DIVISOR)
}

/// Same share on the 1e8 outcome scale the DLC close consumes.
pub fn liquidation_outcome(vault_loan: u128, liquidation_fee: u128, collateral_value: u128) -> u128 {
    if collateral_value == 0 {
        return OUTCOME_SCALE;
    }
    let outcome = vault_loan * (BPS_DIVISOR + liquidation_fee) * BPS_DIVISOR / collateral_value;
    outcome.min(OUTCOME_SCALE)
}

#[odra::module(events = [
    events::SetupLoan,
    events::Borrow,
    events::Repay,
    events::LiquidateLoan
])]
pub struct LoanEngine {
    /// Contract owner (deployer)
    owner: Var<Address>,
    /// Address of the DLC manager; the only account allowed to invoke
    /// the callback entry points
    dlc_manager: Var<Address>,
    /// Stablecoin minted against collateral
    stablecoin: Var<Address>,
    /// Off-chain wallet passed to every DLC this engine creates
    protocol_wallet: Var<Address>,
    /// Loan records by id; ids start at 1 and are never reused
    loans: Mapping<U128, Loan>,
    /// Reverse index from DLC uuid to loan id
    loans_by_uuid: Mapping<DlcUuid, U128>,
    loan_count: Var<U128>,
}

#[odra::module]
impl LoanEngine {
    pub fn init(&mut self, dlc_manager: Address, stablecoin: Address, protocol_wallet: Address) {
        self.owner.set(self.env().caller());
        self.dlc_manager.set(dlc_manager);
        self.stablecoin.set(stablecoin);
        self.protocol_wallet.set(protocol_wallet);
        self.loan_count.set(U128::zero());
    }

    // ========== Loan Lifecycle ==========

    /// Open a new vault. Requests a DLC for the collateral and returns
    /// the loan id; the vault becomes borrowable once the protocol
    /// wallet confirms the BTC funding transaction.
    pub fn setup_loan(
        &mut self,
        btc_deposit: U128,
        liquidation_ratio: U128,
        liquidation_fee: U128,
        emergency_refund_time: U128,
    ) -> U128 {
        let caller = self.env().caller();
        let loan_id = self.loan_count.get_or_default() + U128::one();
        self.loan_count.set(loan_id);

        let response = self.manager().create_dlc(
            caller,
            emergency_refund_time,
            self.env().self_address(),
            self.require_var(&self.protocol_wallet),
            loan_id,
        );

        self.loans.set(&loan_id, Loan {
            loan_id,
            owner: caller,
            dlc_uuid: Some(response.uuid),
            vault_collateral: btc_deposit,
            vault_loan: U128::zero(),
            liquidation_ratio,
            liquidation_fee,
            status: LoanStatus::Ready,
            funding_tx_id: None,
            closing_tx_id: None,
        });
        self.loans_by_uuid.set(&response.uuid, loan_id);

        self.env().emit_event(events::SetupLoan {
            loan_id,
            owner: caller,
            uuid: response.uuid,
            vault_collateral: btc_deposit,
            event_source: String::from(events::SETUP_LOAN),
        });
        loan_id
    }

    /// Draw stablecoin against a funded vault. Only the vault owner may
    /// borrow; debt accrues without limit checks here since liquidation
    /// enforces the ratio.
    pub fn borrow(&mut self, loan_id: U128, amount: U128) -> bool {
        let mut loan = self.require_loan(loan_id);
        self.require_loan_owner(&loan);
        if !matches!(loan.status, LoanStatus::Funded) {
            self.env().revert(DlcError::VaultNotFunded);
        }

        loan.vault_loan += amount;
        let vault_loan = loan.vault_loan;
        let owner = loan.owner;
        self.loans.set(&loan_id, loan);

        self.token().mint(owner, amount);

        self.env().emit_event(events::Borrow {
            loan_id,
            amount,
            vault_loan,
            event_source: String::from(events::BORROW),
        });
        true
    }

    /// Pay debt back. Burns the stablecoin from the caller; repaying more
    /// than the outstanding debt fails, so the debt never goes negative.
    pub fn repay(&mut self, loan_id: U128, amount: U128) -> bool {
        let mut loan = self.require_loan(loan_id);
        self.require_loan_owner(&loan);
        if !matches!(loan.status, LoanStatus::Funded) {
            self.env().revert(DlcError::VaultNotFunded);
        }
        if amount > loan.vault_loan {
            self.env().revert(DlcError::RepayExceedsDebt);
        }

        loan.vault_loan -= amount;
        let vault_loan = loan.vault_loan;
        let owner = loan.owner;
        self.loans.set(&loan_id, loan);

        self.token().burn(owner, amount);

        self.env().emit_event(events::Repay {
            loan_id,
            amount,
            vault_loan,
            event_source: String::from(events::REPAY),
        });
        true
    }

    /// Close a debt-free vault. A vault still waiting for funding closes
    /// the same way as one whose debt was fully repaid; either path
    /// requests a zero-outcome DLC close so every sat of collateral
    /// returns to the vault owner.
    pub fn close_loan(&mut self, loan_id: U128) -> bool {
        let mut loan = self.require_loan(loan_id);
        self.require_loan_owner(&loan);
        if !matches!(loan.status, LoanStatus::Ready | LoanStatus::Funded) {
            self.env().revert(DlcError::VaultNotFunded);
        }
        if !loan.vault_loan.is_zero() {
            self.env().revert(DlcError::LoanNotRepaid);
        }

        loan.status = LoanStatus::PreRepaid;
        let uuid = self.require_uuid(&loan);
        self.loans.set(&loan_id, loan);

        self.manager().close_dlc(uuid, U128::zero());
        true
    }

    /// Kick off a liquidation check. Permissionless: anyone may request a
    /// fresh price for a funded vault; the decision happens in
    /// `get_btc_price_callback` once the signed price arrives.
    pub fn attempt_liquidate(&mut self, loan_id: U128) -> bool {
        let loan = self.require_loan(loan_id);
        if !matches!(loan.status, LoanStatus::Funded) {
            self.env().revert(DlcError::VaultNotFunded);
        }
        let uuid = self.require_uuid(&loan);
        self.manager().get_btc_price(uuid);
        true
    }

    /// Relay a signed price package to the manager for this vault's DLC.
    pub fn validate_price_data(
        &mut self,
        loan_id: U128,
        timestamp: u64,
        prices: Vec<PricePoint>,
        signature: Bytes,
        pubkey: PublicKey,
    ) -> bool {
        let loan = self.require_loan(loan_id);
        let uuid = self.require_uuid(&loan);
        self.manager().validate_price_data(
            uuid,
            timestamp,
            prices,
            signature,
            pubkey,
            self.env().self_address(),
        );
        true
    }

    // ========== Manager Callbacks ==========

    /// Funding confirmation relayed by the manager. Flips the vault from
    /// Ready to Funded and records the BTC transaction id.
    pub fn set_status_funded(&mut self, uuid: DlcUuid, funding_tx_id: String) {
        self.require_manager();
        let loan_id = self.require_loan_id(uuid);
        let mut loan = self.require_loan(loan_id);
        loan.status = LoanStatus::Funded;
        loan.funding_tx_id = Some(funding_tx_id);
        self.loans.set(&loan_id, loan);
    }

    /// Signed BTC price answer. Decides liquidation: a healthy vault
    /// reverts the whole transaction, an undercollateralized one moves to
    /// PreLiquidated and requests the DLC close at the computed payout.
    pub fn get_btc_price_callback(&mut self, btc_price: U128, uuid: DlcUuid) {
        self.require_manager();
        let loan_id = self.require_loan_id(uuid);
        let mut loan = self.require_loan(loan_id);
        if !matches!(loan.status, LoanStatus::Funded) {
            self.env().revert(DlcError::VaultNotFunded);
        }

        let vault_loan = loan.vault_loan.as_u128();
        let fee = loan.liquidation_fee.as_u128();
        let collateral_value =
            collateral_value_usd(loan.vault_collateral.as_u128(), btc_price.as_u128());
        if !check_liquidation_internal(vault_loan, loan.liquidation_ratio.as_u128(), collateral_value)
        {
            self.env().revert(DlcError::DoesNotNeedLiquidation);
        }

        let payout_ratio = payout_ratio_bps(vault_loan, fee, collateral_value);
        let outcome = liquidation_outcome(vault_loan, fee, collateral_value);

        loan.status = LoanStatus::PreLiquidated;
        self.loans.set(&loan_id, loan);

        self.manager().close_dlc(uuid, U128::from(outcome));

        self.env().emit_event(events::LiquidateLoan {
            uuid,
            btc_price,
            payout_ratio: U128::from(payout_ratio),
            event_source: String::from(events::LIQUIDATE_LOAN),
        });
    }

    /// Close finalization relayed by the manager. Maps the pending state
    /// to its terminal counterpart; terminal records stay queryable.
    pub fn post_close_dlc_handler(&mut self, uuid: DlcUuid) {
        self.require_manager();
        let loan_id = self.require_loan_id(uuid);
        let mut loan = self.require_loan(loan_id);
        loan.status = match loan.status {
            LoanStatus::PreRepaid => LoanStatus::Repaid,
            LoanStatus::PreLiquidated => LoanStatus::Liquidated,
            _ => self.env().revert(DlcError::UnknownLoan),
        };
        self.loans.set(&loan_id, loan);
    }

    // ========== Query Functions ==========

    pub fn get_loan(&self, loan_id: U128) -> Option<Loan> {
        self.loans.get(&loan_id)
    }

    pub fn get_loan_by_uuid(&self, uuid: DlcUuid) -> Loan {
        self.require_loan(self.require_loan_id(uuid))
    }

    pub fn get_loan_count(&self) -> U128 {
        self.loan_count.get_or_default()
    }

    /// Dry-run liquidation check for off-chain monitoring.
    pub fn check_liquidation(&self, loan_id: U128, btc_price: U128) -> bool {
        let loan = self.require_loan(loan_id);
        let collateral_value =
            collateral_value_usd(loan.vault_collateral.as_u128(), btc_price.as_u128());
        check_liquidation_internal(
            loan.vault_loan.as_u128(),
            loan.liquidation_ratio.as_u128(),
            collateral_value,
        )
    }

    /// Payout ratio in basis points the protocol would claim at the
    /// given price.
    pub fn get_payout_ratio(&self, loan_id: U128, btc_price: U128) -> U128 {
        let loan = self.require_loan(loan_id);
        let vault_loan = loan.vault_loan.as_u128();
        let collateral_value =
            collateral_value_usd(loan.vault_collateral.as_u128(), btc_price.as_u128());
        if !check_liquidation_internal(vault_loan, loan.liquidation_ratio.as_u128(), collateral_value)
        {
            return U128::zero();
        }
        U128::from(payout_ratio_bps(
            vault_loan,
            loan.liquidation_fee.as_u128(),
            collateral_value,
        ))
    }

    pub fn get_owner(&self) -> Option<Address> {
        self.owner.get()
    }

    // ========== Internal Functions ==========

    fn manager(&self) -> DlcManagerContractRef {
        DlcManagerContractRef::new(self.env().clone(), self.require_var(&self.dlc_manager))
    }

    fn token(&self) -> DlcStablecoinContractRef {
        DlcStablecoinContractRef::new(self.env().clone(), self.require_var(&self.stablecoin))
    }

    fn require_var(&self, var: &Var<Address>) -> Address {
        match var.get() {
            Some(addr) => addr,
            None => self.env().revert(DlcError::Unauthorized),
        }
    }

    fn require_manager(&self) {
        if Some(self.env().caller()) != self.dlc_manager.get() {
            self.env().revert(DlcError::Unauthorized);
        }
    }

    fn require_loan(&self, loan_id: U128) -> Loan {
        match self.loans.get(&loan_id) {
            Some(loan) => loan,
            None => self.env().revert(DlcError::UnknownLoan),
        }
    }

    fn require_loan_id(&self, uuid: DlcUuid) -> U128 {
        match self.loans_by_uuid.get(&uuid) {
            Some(loan_id) => loan_id,
            None => self.env().revert(DlcError::UnknownLoan),
        }
    }

    fn require_loan_owner(&self, loan: &Loan) {
        if self.env().caller() != loan.owner {
            self.env().revert(DlcError::Unauthorized);
        }
    }

    fn require_uuid(&self, loan: &Loan) -> DlcUuid {
        match loan.dlc_uuid {
            Some(uuid) => uuid,
            None => self.env().revert(DlcError::UnknownLoan),
        }
    }
}
