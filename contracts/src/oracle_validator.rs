//! Oracle price-validation submodule.
//!
//! Maintains the owner-mutated set of trusted oracle public keys and
//! authenticates signed price packages. Casper exposes no in-VM public-key
//! recovery, so callers pass the signer key explicitly; it is checked
//! against the trusted set first and against the signature second, so an
//! untrusted signer fails before any signature work or downstream effect.
//! Packages older than the staleness window are rejected, so a
//! previously signed low price cannot be replayed against a healthy
//! vault later.

use odra::casper_types::bytesrepr::Bytes;
use odra::casper_types::{PublicKey, U128};
use odra::prelude::*;
use crate::errors::DlcError;
use crate::types::PricePoint;

/// Maximum accepted package age in milliseconds (block-time units).
pub const MAX_PRICE_AGE_MS: u64 = 300_000;

#[odra::module]
pub struct OracleValidator {
    trusted: Mapping<PublicKey, bool>,
}

impl OracleValidator {
    pub fn set_trusted(&mut self, pubkey: PublicKey, trusted: bool) {
        self.trusted.set(&pubkey, trusted);
    }

    pub fn is_trusted(&self, pubkey: PublicKey) -> bool {
        self.trusted.get(&pubkey).unwrap_or(false)
    }

    /// Authenticate a signed price package and return its BTC price.
    pub fn validate(
        &self,
        timestamp: u64,
        prices: &[PricePoint],
        signature: &Bytes,
        pubkey: &PublicKey,
    ) -> U128 {
        if !self.is_trusted(pubkey.clone()) {
            self.env().revert(DlcError::UntrustedOracle);
        }
        if timestamp + MAX_PRICE_AGE_MS < self.env().get_block_time() {
            self.env().revert(DlcError::StalePriceData);
        }
        let message = Bytes::from(price_package_bytes(timestamp, prices));
        if !self.env().verify_signature(&message, signature, pubkey) {
            self.env().revert(DlcError::InvalidSignature);
        }
        match btc_price(prices) {
            Some(price) => price,
            None => self.env().revert(DlcError::NoPriceData),
        }
    }
}

/// Canonical byte encoding of a price package: big-endian timestamp, then
/// each point as length-prefixed symbol followed by the big-endian value.
/// Signers must produce exactly these bytes.
pub fn price_package_bytes(timestamp: u64, prices: &[PricePoint]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + prices.len() * 32);
    out.extend_from_slice(&timestamp.to_be_bytes());
    for point in prices {
        out.extend_from_slice(&(point.symbol.len() as u32).to_be_bytes());
        out.extend_from_slice(point.symbol.as_bytes());
        out.extend_from_slice(&point.value.as_u128().to_be_bytes());
    }
    out
}

/// The BTC entry of a price package, if present.
pub fn btc_price(prices: &[PricePoint]) -> Option<U128> {
    prices.iter().find(|p| p.symbol == "BTC").map(|p| p.value)
}
