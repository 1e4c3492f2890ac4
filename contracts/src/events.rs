//! Structured protocol events.
//!
//! Events are the append-only log consumed by off-chain indexers and the
//! attestor network. Every event carries an `event_source` tag of the form
//! `"dlclink:<action>:v1"`; the tag and the field set of each event are a
//! compatibility surface and must not change within a version.

use odra::casper_types::U128;
use odra::prelude::*;
use crate::types::{Attestor, DlcUuid};

pub const CREATE_DLC: &str = "dlclink:create-dlc:v1";
pub const SET_STATUS_FUNDED: &str = "dlclink:set-status-funded:v1";
pub const CLOSE_DLC: &str = "dlclink:close-dlc:v1";
pub const POST_CLOSE_DLC: &str = "dlclink:post-close-dlc:v1";
pub const GET_BTC_PRICE: &str = "dlclink:get-btc-price:v1";
pub const REGISTER_ATTESTOR: &str = "dlclink:register-attestor:v1";
pub const DEREGISTER_ATTESTOR: &str = "dlclink:deregister-attestor:v1";
pub const MINT_OPEN_DLC: &str = "dlclink:mint-open-dlc:v1";
pub const BURN_OPEN_DLC: &str = "dlclink:burn-open-dlc:v1";
pub const SETUP_LOAN: &str = "dlclink:setup-loan:v1";
pub const BORROW: &str = "dlclink:borrow:v1";
pub const REPAY: &str = "dlclink:repay:v1";
pub const LIQUIDATE_LOAN: &str = "dlclink:liquidate-loan:v1";

#[odra::event]
pub struct CreateDlc {
    pub uuid: DlcUuid,
    pub creator: Address,
    pub callback_contract: Address,
    pub protocol_wallet: Address,
    pub emergency_refund_time: U128,
    pub nonce: U128,
    pub attestors: Vec<Attestor>,
    pub event_source: String,
}

#[odra::event]
pub struct SetStatusFunded {
    pub uuid: DlcUuid,
    pub funding_tx_id: String,
    pub event_source: String,
}

#[odra::event]
pub struct CloseDlc {
    pub uuid: DlcUuid,
    pub creator: Address,
    pub outcome: U128,
    pub event_source: String,
}

#[odra::event]
pub struct PostCloseDlc {
    pub uuid: DlcUuid,
    pub outcome: U128,
    pub actual_closing_time: u64,
    pub event_source: String,
}

#[odra::event]
pub struct GetBtcPrice {
    pub uuid: DlcUuid,
    pub caller: Address,
    pub creator: Address,
    pub callback_contract: Address,
    pub event_source: String,
}

#[odra::event]
pub struct RegisterAttestor {
    pub id: U128,
    pub dns: String,
    pub event_source: String,
}

#[odra::event]
pub struct DeregisterAttestor {
    pub id: U128,
    pub event_source: String,
}

#[odra::event]
pub struct MintOpenDlc {
    pub uuid: DlcUuid,
    pub recipient: Address,
    pub event_source: String,
}

#[odra::event]
pub struct BurnOpenDlc {
    pub uuid: DlcUuid,
    pub event_source: String,
}

#[odra::event]
pub struct SetupLoan {
    pub loan_id: U128,
    pub owner: Address,
    pub uuid: DlcUuid,
    pub vault_collateral: U128,
    pub event_source: String,
}

#[odra::event]
pub struct Borrow {
    pub loan_id: U128,
    pub amount: U128,
    pub vault_loan: U128,
    pub event_source: String,
}

#[odra::event]
pub struct Repay {
    pub loan_id: U128,
    pub amount: U128,
    pub vault_loan: U128,
    pub event_source: String,
}

#[odra::event]
pub struct LiquidateLoan {
    pub uuid: DlcUuid,
    pub btc_price: U128,
    pub payout_ratio: U128,
    pub event_source: String,
}
