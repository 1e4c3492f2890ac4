//! Contract authorization submodule.
//!
//! Two independent tables with identical mechanics:
//! - the *whitelist* gates which protocol contracts may request DLC
//!   creation,
//! - the *registration* table gates the loan-facing path (funding
//!   confirmation and close requests from protocol contracts).
//!
//! Both are owner-mutated only (enforced by the enclosing manager) and
//! idempotent; unknown principals default to `false`.

use odra::prelude::*;

#[odra::module]
pub struct AuthorizationRegistry {
    whitelisted: Mapping<Address, bool>,
    registered: Mapping<Address, bool>,
}

impl AuthorizationRegistry {
    pub fn whitelist(&mut self, contract: Address) {
        self.whitelisted.set(&contract, true);
    }

    pub fn de_whitelist(&mut self, contract: Address) {
        self.whitelisted.set(&contract, false);
    }

    pub fn is_whitelisted(&self, contract: Address) -> bool {
        self.whitelisted.get(&contract).unwrap_or(false)
    }

    pub fn register(&mut self, contract: Address) {
        self.registered.set(&contract, true);
    }

    pub fn unregister(&mut self, contract: Address) {
        self.registered.set(&contract, false);
    }

    pub fn is_registered(&self, contract: Address) -> bool {
        self.registered.get(&contract).unwrap_or(false)
    }
}
