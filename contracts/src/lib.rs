//! CSPR-DLC Contracts
//!
//! On-chain coordination layer for Discreet Log Contracts (DLCs) backed
//! by an off-chain attestor network.
//!
//! ## Architecture
//!
//! - **DlcManager**: DLC lifecycle (create, fund, close, finalize) plus
//!   the attestor registry, contract authorization tables, oracle
//!   signature validation and open-DLC ownership receipts
//! - **LoanEngine**: Reference protocol contract; collateralized
//!   stablecoin loans with borrow/repay and price-driven liquidation
//! - **Stablecoin**: 6-decimal token with mint/burn access control
//!
//! The attestor network observes contract events (tagged
//! `dlclink:<action>:v1`) and answers through the protocol wallet, so a
//! single transaction always either fully commits a lifecycle step across
//! manager and protocol contract, or aborts it.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod events;

// Contract modules
pub mod attestor_registry;
pub mod authorization;
pub mod oracle_validator;
pub mod receipt;
pub mod dlc_manager;
pub mod loan_engine;
pub mod stablecoin;
