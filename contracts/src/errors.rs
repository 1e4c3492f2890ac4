//! Protocol error definitions.
//!
//! Discriminants are part of the external interface: off-chain tooling
//! matches on the numeric codes, so they must stay stable. DLC-manager
//! errors live in the 1xx range, loan-engine errors in the 10xx range and
//! stablecoin errors in the 20xx range.

use odra::prelude::*;

#[odra::odra_error]
pub enum DlcError {
    // Authorization
    /// Caller is not the contract owner (or the DLC's protocol wallet)
    Unauthorized = 101,
    /// Caller contract is not whitelisted for create-dlc
    NotWhitelisted = 119,
    /// Callback contract is not registered for the loan-facing path
    ContractNotRegistered = 118,

    // DLC state
    /// No DLC stored under this uuid
    UnknownDlc = 103,
    /// DLC already in ClosingRequested or Closed state
    AlreadyClosed = 105,
    /// DLC already moved past the Requested state
    AlreadyFunded = 106,

    // Validation
    /// Price package contains no BTC entry
    NoPriceData = 109,
    /// Close outcome exceeds the 1e8 scale
    OutOfBoundsOutcome = 110,
    /// Oracle outcome differs from the requested outcome
    DifferentOutcomes = 111,
    /// Signature does not verify against the supplied key
    InvalidSignature = 112,
    /// Attestor id unknown or deregistered
    AttestorNotFound = 113,
    /// Signer key is not in the trusted oracle set
    UntrustedOracle = 114,
    /// Price package timestamp is older than the staleness window
    StalePriceData = 115,
    /// Caller address failed byte serialization
    SerializationFailure = 116,

    // Loan engine
    /// No loan stored under this id or uuid
    UnknownLoan = 1003,
    /// Vault is healthy; its collateral ratio sits above the threshold
    DoesNotNeedLiquidation = 1007,
    /// Borrowing requires a funded vault
    VaultNotFunded = 1009,
    /// Repay amount exceeds the outstanding debt
    RepayExceedsDebt = 1012,
    /// Loan must be fully repaid before closing
    LoanNotRepaid = 1013,

    // Stablecoin
    /// Transfer or burn exceeds the account balance or allowance
    InsufficientBalance = 2001,
    /// Caller is not an authorized minter
    UnauthorizedMinter = 2002,
}
