//! DLC Manager Contract
//!
//! Owns DLC records end to end: creation on behalf of whitelisted protocol
//! contracts, funding confirmation by the protocol wallet, close request
//! and close finalization with outcome reconciliation. Composes the
//! attestor registry, the contract authorization tables, the oracle
//! validator and the open-DLC receipt map as submodules, so every
//! lifecycle step commits or aborts within one transaction.
//!
//! Lifecycle: Requested -> Funded -> ClosingRequested -> Closed.
//! No transition reverses; closing an already-closed DLC fails without
//! mutation.

use odra::casper_types::bytesrepr::{Bytes, ToBytes};
use odra::casper_types::{PublicKey, U128};
use odra::prelude::*;
use odra::ContractRef;
use sha2::{Digest, Sha256};

use crate::attestor_registry::AttestorRegistry;
use crate::authorization::AuthorizationRegistry;
use crate::errors::DlcError;
use crate::events;
use crate::oracle_validator::OracleValidator;
use crate::receipt::OpenDlcReceipt;
use crate::types::{Attestor, CreateDlcResponse, Dlc, DlcStatus, DlcUuid, PricePoint, OUTCOME_SCALE};

/// Callback surface every protocol contract must expose. All calls happen
/// synchronously inside the manager's transaction.
#[odra::external_contract]
pub trait DlcProtocol {
    fn set_status_funded(&mut self, uuid: DlcUuid, funding_tx_id: String);
    fn post_close_dlc_handler(&mut self, uuid: DlcUuid);
    fn get_btc_price_callback(&mut self, btc_price: U128, uuid: DlcUuid);
}

#[odra::module(events = [
    events::CreateDlc,
    events::SetStatusFunded,
    events::CloseDlc,
    events::PostCloseDlc,
    events::GetBtcPrice,
    events::RegisterAttestor,
    events::DeregisterAttestor,
    events::MintOpenDlc,
    events::BurnOpenDlc
])]
pub struct DlcManager {
    /// Contract owner (deployer)
    owner: Var<Address>,
    /// DLC records by uuid
    dlcs: Mapping<DlcUuid, Dlc>,
    /// Internal counter disambiguating same-block creations
    local_nonce: Var<U128>,
    attestors: SubModule<AttestorRegistry>,
    authorization: SubModule<AuthorizationRegistry>,
    oracle: SubModule<OracleValidator>,
    receipts: SubModule<OpenDlcReceipt>,
}

#[odra::module]
impl DlcManager {
    pub fn init(&mut self) {
        self.owner.set(self.env().caller());
        self.local_nonce.set(U128::zero());
    }

    // ========== Attestor Registry ==========

    /// Register a new attestor endpoint (owner only).
    pub fn register_attestor(&mut self, dns: String) -> U128 {
        self.require_owner();
        let id = self.attestors.register(dns.clone());
        self.env().emit_event(events::RegisterAttestor {
            id,
            dns,
            event_source: String::from(events::REGISTER_ATTESTOR),
        });
        id
    }

    /// Deregister an attestor by id (owner only). The id is never reused.
    pub fn deregister_attestor(&mut self, id: U128) -> U128 {
        self.require_owner();
        let id = self.attestors.deregister(id);
        self.env().emit_event(events::DeregisterAttestor {
            id,
            event_source: String::from(events::DEREGISTER_ATTESTOR),
        });
        id
    }

    /// Look up an active attestor. Reverts for unknown or inactive ids.
    pub fn get_registered_attestor(&self, id: U128) -> Attestor {
        self.attestors.get(id)
    }

    /// All active attestors in registration order.
    pub fn get_all_attestors(&self) -> Vec<Attestor> {
        self.attestors.list_active()
    }

    // ========== Contract Authorization ==========

    /// Allow a protocol contract to request DLC creation (owner only).
    pub fn whitelist_contract(&mut self, contract_address: Address) -> bool {
        self.require_owner();
        self.authorization.whitelist(contract_address);
        true
    }

    pub fn de_whitelist_contract(&mut self, contract_address: Address) -> bool {
        self.require_owner();
        self.authorization.de_whitelist(contract_address);
        true
    }

    pub fn is_contract_whitelisted(&self, contract_address: Address) -> bool {
        self.authorization.is_whitelisted(contract_address)
    }

    /// Register a protocol contract for the loan-facing path (owner only).
    pub fn register_contract(&mut self, contract_address: Address) -> bool {
        self.require_owner();
        self.authorization.register(contract_address);
        true
    }

    pub fn unregister_contract(&mut self, contract_address: Address) -> bool {
        self.require_owner();
        self.authorization.unregister(contract_address);
        true
    }

    pub fn is_contract_registered(&self, contract_address: Address) -> bool {
        self.authorization.is_registered(contract_address)
    }

    // ========== Oracle Trust ==========

    /// Add or remove a trusted oracle signing key (owner only).
    pub fn set_trusted_oracle(&mut self, pubkey: PublicKey, trusted: bool) -> bool {
        self.require_owner();
        self.oracle.set_trusted(pubkey, trusted);
        true
    }

    pub fn is_trusted_oracle(&self, pubkey: PublicKey) -> bool {
        self.oracle.is_trusted(pubkey)
    }

    // ========== DLC Lifecycle ==========

    /// Create a new DLC on behalf of a whitelisted protocol contract.
    ///
    /// The uuid is derived from transaction-local identifiers (block time,
    /// an internal counter and the caller-supplied nonce), never from
    /// wall-clock randomness, so any number of same-block creations yield
    /// distinct uuids. Mints the open-dlc receipt to the manager itself
    /// and returns the uuid with the selected attestors synchronously.
    pub fn create_dlc(
        &mut self,
        creator: Address,
        emergency_refund_time: U128,
        callback_contract: Address,
        protocol_wallet: Address,
        nonce: U128,
    ) -> CreateDlcResponse {
        let caller = self.env().caller();
        if !self.authorization.is_whitelisted(caller) {
            self.env().revert(DlcError::NotWhitelisted);
        }

        let uuid = self.generate_uuid(nonce, caller);
        let attestors = self.select_attestors();

        self.dlcs.set(&uuid, Dlc {
            uuid,
            creator,
            callback_contract,
            protocol_wallet,
            emergency_refund_time,
            nonce,
            status: DlcStatus::Requested,
            outcome: None,
            actual_closing_time: None,
            funding_tx_id: None,
            attestors: attestors.clone(),
        });

        let self_address = self.env().self_address();
        self.receipts.mint(uuid, self_address);

        self.env().emit_event(events::CreateDlc {
            uuid,
            creator,
            callback_contract,
            protocol_wallet,
            emergency_refund_time,
            nonce,
            attestors: attestors.clone(),
            event_source: String::from(events::CREATE_DLC),
        });

        CreateDlcResponse { uuid, attestors }
    }

    /// Confirm the BTC funding transaction. Only the DLC's protocol wallet
    /// may call this, and only while the DLC is still in Requested state.
    /// Notifies the registered callback contract in the same transaction.
    pub fn set_status_funded(
        &mut self,
        uuid: DlcUuid,
        funding_tx_id: String,
        callback_contract: Address,
    ) -> bool {
        let mut dlc = self.require_dlc(uuid);
        let caller = self.env().caller();
        if caller != dlc.protocol_wallet || callback_contract != dlc.callback_contract {
            self.env().revert(DlcError::Unauthorized);
        }
        if !self.authorization.is_registered(callback_contract) {
            self.env().revert(DlcError::ContractNotRegistered);
        }
        if !matches!(dlc.status, DlcStatus::Requested) {
            self.env().revert(DlcError::AlreadyFunded);
        }

        dlc.status = DlcStatus::Funded;
        dlc.funding_tx_id = Some(funding_tx_id.clone());
        self.dlcs.set(&uuid, dlc);

        DlcProtocolContractRef::new(self.env().clone(), callback_contract)
            .set_status_funded(uuid, funding_tx_id.clone());

        self.env().emit_event(events::SetStatusFunded {
            uuid,
            funding_tx_id,
            event_source: String::from(events::SET_STATUS_FUNDED),
        });
        true
    }

    /// Request closing with an agreed outcome on the 1e8 scale.
    ///
    /// Callable by the manager owner or by a whitelisted/registered
    /// protocol contract; end users must go through their protocol
    /// contract.
    pub fn close_dlc(&mut self, uuid: DlcUuid, outcome: U128) -> bool {
        let mut dlc = self.require_dlc(uuid);
        let caller = self.env().caller();
        if !self.is_owner(caller)
            && !self.authorization.is_whitelisted(caller)
            && !self.authorization.is_registered(caller)
        {
            self.env().revert(DlcError::Unauthorized);
        }
        if outcome > U128::from(OUTCOME_SCALE) {
            self.env().revert(DlcError::OutOfBoundsOutcome);
        }
        if matches!(dlc.status, DlcStatus::ClosingRequested | DlcStatus::Closed) {
            self.env().revert(DlcError::AlreadyClosed);
        }

        dlc.status = DlcStatus::ClosingRequested;
        dlc.outcome = Some(outcome);
        let creator = dlc.creator;
        self.dlcs.set(&uuid, dlc);

        self.env().emit_event(events::CloseDlc {
            uuid,
            creator,
            outcome,
            event_source: String::from(events::CLOSE_DLC),
        });
        true
    }

    /// Finalize a close once the attestor network settled the DLC.
    ///
    /// Reconciles the oracle-observed outcome against the requested one,
    /// burns the ownership receipt and notifies the callback contract.
    pub fn post_close_dlc(
        &mut self,
        uuid: DlcUuid,
        callback_contract: Address,
        oracle_outcome: U128,
    ) -> bool {
        let mut dlc = self.require_dlc(uuid);
        let caller = self.env().caller();
        if !self.is_owner(caller) && caller != dlc.protocol_wallet {
            self.env().revert(DlcError::Unauthorized);
        }
        if callback_contract != dlc.callback_contract {
            self.env().revert(DlcError::Unauthorized);
        }
        if matches!(dlc.status, DlcStatus::Closed) {
            self.env().revert(DlcError::AlreadyClosed);
        }
        match dlc.outcome {
            Some(outcome) if outcome == oracle_outcome => {}
            _ => self.env().revert(DlcError::DifferentOutcomes),
        }

        let now = self.env().get_block_time();
        dlc.status = DlcStatus::Closed;
        dlc.actual_closing_time = Some(now);
        self.dlcs.set(&uuid, dlc);

        self.receipts.burn(uuid);

        DlcProtocolContractRef::new(self.env().clone(), callback_contract)
            .post_close_dlc_handler(uuid);

        self.env().emit_event(events::PostCloseDlc {
            uuid,
            outcome: oracle_outcome,
            actual_closing_time: now,
            event_source: String::from(events::POST_CLOSE_DLC),
        });
        true
    }

    // ========== Oracle Price Flow ==========

    /// Beacon for off-chain oracles: emits a price request for an existing
    /// DLC. Permissionless; the answer arrives via `validate_price_data`.
    pub fn get_btc_price(&mut self, uuid: DlcUuid) -> bool {
        let dlc = self.require_dlc(uuid);
        self.env().emit_event(events::GetBtcPrice {
            uuid,
            caller: self.env().caller(),
            creator: dlc.creator,
            callback_contract: dlc.callback_contract,
            event_source: String::from(events::GET_BTC_PRICE),
        });
        true
    }

    /// Authenticate a signed price package and forward its BTC price to
    /// the callback contract, all within this transaction. An untrusted
    /// signer or a stale package fails before any downstream effect.
    pub fn validate_price_data(
        &mut self,
        uuid: DlcUuid,
        timestamp: u64,
        prices: Vec<PricePoint>,
        signature: Bytes,
        pubkey: PublicKey,
        callback_contract: Address,
    ) -> bool {
        let btc_price = self.oracle.validate(timestamp, &prices, &signature, &pubkey);
        DlcProtocolContractRef::new(self.env().clone(), callback_contract)
            .get_btc_price_callback(btc_price, uuid);
        true
    }

    // ========== Query Functions ==========

    pub fn get_dlc(&self, uuid: DlcUuid) -> Option<Dlc> {
        self.dlcs.get(&uuid)
    }

    /// Current receipt holder, if the DLC is still open.
    pub fn get_open_dlc_owner(&self, uuid: DlcUuid) -> Option<Address> {
        self.receipts.owner_of(uuid)
    }

    /// Number of currently open DLCs (receipts in existence).
    pub fn get_open_dlc_count(&self) -> u64 {
        self.receipts.supply()
    }

    pub fn get_owner(&self) -> Option<Address> {
        self.owner.get()
    }

    // ========== Internal Functions ==========

    fn is_owner(&self, caller: Address) -> bool {
        self.owner.get().map_or(false, |owner| owner == caller)
    }

    fn require_owner(&self) {
        if !self.is_owner(self.env().caller()) {
            self.env().revert(DlcError::Unauthorized);
        }
    }

    fn require_dlc(&self, uuid: DlcUuid) -> Dlc {
        match self.dlcs.get(&uuid) {
            Some(dlc) => dlc,
            None => self.env().revert(DlcError::UnknownDlc),
        }
    }

    /// Derive a 32-byte uuid from transaction-local identifiers. The
    /// internal counter guarantees distinct uuids for creations landing in
    /// the same block with equal caller nonces.
    fn generate_uuid(&mut self, nonce: U128, caller: Address) -> DlcUuid {
        let counter = self.local_nonce.get_or_default();
        self.local_nonce.set(counter + U128::one());

        let caller_bytes = match caller.to_bytes() {
            Ok(bytes) => bytes,
            Err(_) => self.env().revert(DlcError::SerializationFailure),
        };

        let mut hasher = Sha256::new();
        hasher.update(self.env().get_block_time().to_be_bytes());
        hasher.update(counter.as_u128().to_be_bytes());
        hasher.update(nonce.as_u128().to_be_bytes());
        hasher.update(caller_bytes);
        hasher.finalize().into()
    }

    /// Deterministic attestor selection: every other active attestor,
    /// starting at the first (indices 0, 2, 4, ...). Swapping the rule
    /// only touches this function.
    fn select_attestors(&self) -> Vec<Attestor> {
        self.attestors.list_active().into_iter().step_by(2).collect()
    }
}
