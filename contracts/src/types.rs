//! Common types used across the DLC coordination protocol.
//!
//! All on-chain amounts, ids and ratios are `U128`, mirroring the
//! 128-bit ledger uint; pure arithmetic helpers work on native `u128`
//! and convert at the entry-point boundary.

use odra::casper_types::U128;
use odra::prelude::*;

/// 32-byte DLC identifier, unique and immutable once created.
pub type DlcUuid = [u8; 32];

/// Maximum close outcome: 100_000_000 = 100.000000%.
pub const OUTCOME_SCALE: u128 = 100_000_000;

/// Basis points divisor (10000 = 100%).
pub const BPS_DIVISOR: u128 = 10_000;

/// BTC prices are shifted by 1e8 (satoshi precision).
pub const PRICE_SHIFT: u128 = 100_000_000;

/// Divisor converting sats (8 dec) * price (8 dec) into 6-decimal USD.
pub const SATS_PRICE_TO_USD6: u128 = 10_000_000_000;

/// Lifecycle of a DLC record. Transitions only move forward.
#[odra::odra_type]
#[derive(Copy, Default)]
pub enum DlcStatus {
    /// Announced on-chain, waiting for the BTC funding transaction
    #[default]
    Requested = 0,
    /// Funding transaction confirmed by the protocol wallet
    Funded = 1,
    /// Close requested with an agreed outcome, waiting for attestation
    ClosingRequested = 2,
    /// Settled; the ownership receipt is burned
    Closed = 3,
}

/// Lifecycle of a loan vault. Transitions only move forward.
#[odra::odra_type]
#[derive(Copy, Default)]
pub enum LoanStatus {
    #[default]
    NotReady = 0,
    Ready = 1,
    Funded = 2,
    PreRepaid = 3,
    PreLiquidated = 4,
    Repaid = 5,
    Liquidated = 6,
}

impl LoanStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::NotReady => "not-ready",
            LoanStatus::Ready => "ready",
            LoanStatus::Funded => "funded",
            LoanStatus::PreRepaid => "pre-repaid",
            LoanStatus::PreLiquidated => "pre-liquidated",
            LoanStatus::Repaid => "repaid",
            LoanStatus::Liquidated => "liquidated",
        }
    }
}

/// A registered attestor endpoint.
#[odra::odra_type]
pub struct Attestor {
    /// Network endpoint of the attestor
    pub dns: String,
}

/// Internal attestor record; deregistering clears `active` but the id is
/// never reassigned.
#[odra::odra_type]
pub struct AttestorRecord {
    pub dns: String,
    pub active: bool,
}

/// A single symbol/value pair inside a signed price package.
#[odra::odra_type]
pub struct PricePoint {
    /// Asset symbol, e.g. "BTC"
    pub symbol: String,
    /// Price shifted by 1e8
    pub value: U128,
}

/// On-chain DLC record, owned exclusively by the manager.
#[odra::odra_type]
pub struct Dlc {
    /// Unique 32-byte identifier
    pub uuid: DlcUuid,
    /// Account that initiated the creation (tx origin of the request)
    pub creator: Address,
    /// Protocol contract receiving lifecycle callbacks
    pub callback_contract: Address,
    /// Off-chain wallet authorized to confirm funding and finalize closes
    pub protocol_wallet: Address,
    /// Block time after which an emergency refund may be broadcast
    pub emergency_refund_time: U128,
    /// Caller-supplied nonce used for same-block uuid disambiguation
    pub nonce: U128,
    pub status: DlcStatus,
    /// Outcome recorded at close request, on the 1e8 scale
    pub outcome: Option<U128>,
    /// Block time of finalization
    pub actual_closing_time: Option<u64>,
    /// BTC funding transaction id, recorded by the protocol wallet
    pub funding_tx_id: Option<String>,
    /// Snapshot of the attestors backing this DLC, in selection order
    pub attestors: Vec<Attestor>,
}

/// Response returned to the requesting protocol contract by `create_dlc`.
#[odra::odra_type]
pub struct CreateDlcResponse {
    pub uuid: DlcUuid,
    pub attestors: Vec<Attestor>,
}

/// Per-loan vault bookkeeping. Terminal records are retained for audit.
#[odra::odra_type]
pub struct Loan {
    /// Sequential id, starting at 1
    pub loan_id: U128,
    pub owner: Address,
    pub dlc_uuid: Option<DlcUuid>,
    /// Locked BTC collateral in sats (8 decimals)
    pub vault_collateral: U128,
    /// Outstanding debt in 6-decimal stablecoin units; never negative
    pub vault_loan: U128,
    /// Minimum collateral-to-debt ratio in basis points (14000 = 140%)
    pub liquidation_ratio: U128,
    /// Liquidator premium in basis points
    pub liquidation_fee: U128,
    pub status: LoanStatus,
    pub funding_tx_id: Option<String>,
    pub closing_tx_id: Option<String>,
}
