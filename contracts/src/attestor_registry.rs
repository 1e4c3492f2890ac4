//! Attestor registry submodule.
//!
//! Attestors are appended under monotonically increasing ids. Ids are never
//! reused: deregistering clears the `active` flag but keeps the record, so
//! historical DLC snapshots stay resolvable.

use odra::casper_types::U128;
use odra::prelude::*;
use crate::errors::DlcError;
use crate::types::{Attestor, AttestorRecord};

#[odra::module]
pub struct AttestorRegistry {
    records: Mapping<U128, AttestorRecord>,
    count: Var<U128>,
}

impl AttestorRegistry {
    /// Append a new attestor and return its id.
    pub fn register(&mut self, dns: String) -> U128 {
        let id = self.count.get_or_default();
        self.records.set(&id, AttestorRecord { dns, active: true });
        self.count.set(id + U128::one());
        id
    }

    /// Mark an attestor inactive. Reverts if the id is unknown or already
    /// inactive.
    pub fn deregister(&mut self, id: U128) -> U128 {
        let record = self.require_active(id);
        self.records.set(&id, AttestorRecord { dns: record.dns, active: false });
        id
    }

    /// Look up an active attestor by id.
    pub fn get(&self, id: U128) -> Attestor {
        let record = self.require_active(id);
        Attestor { dns: record.dns }
    }

    /// Active attestors in registration order.
    pub fn list_active(&self) -> Vec<Attestor> {
        let count = self.count.get_or_default().as_u128();
        let mut active = Vec::new();
        for id in 0..count {
            if let Some(record) = self.records.get(&U128::from(id)) {
                if record.active {
                    active.push(Attestor { dns: record.dns });
                }
            }
        }
        active
    }

    /// Total number of ids ever issued, active or not.
    pub fn count(&self) -> U128 {
        self.count.get_or_default()
    }

    fn require_active(&self, id: U128) -> AttestorRecord {
        match self.records.get(&id) {
            Some(record) if record.active => record,
            _ => self.env().revert(DlcError::AttestorNotFound),
        }
    }
}
