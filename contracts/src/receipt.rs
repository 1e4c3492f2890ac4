//! Open-DLC ownership receipts.
//!
//! Exactly one receipt exists per non-closed DLC: minted at creation,
//! burned at finalization. Receipt existence and DLC-open status are
//! bijective. Modelled as a flat uuid -> owner map with mint/burn private
//! to the manager; no general token hierarchy is needed.

use odra::prelude::*;
use crate::errors::DlcError;
use crate::events;
use crate::types::DlcUuid;

#[odra::module]
pub struct OpenDlcReceipt {
    owners: Mapping<DlcUuid, Option<Address>>,
    supply: Var<u64>,
}

impl OpenDlcReceipt {
    /// Mint the receipt for a freshly created DLC. A duplicate uuid means
    /// the uuid-uniqueness invariant was broken upstream.
    pub fn mint(&mut self, uuid: DlcUuid, recipient: Address) {
        if self.owner_of(uuid).is_some() {
            self.env().revert(DlcError::AlreadyFunded);
        }
        self.owners.set(&uuid, Some(recipient));
        self.supply.set(self.supply.get_or_default() + 1);
        self.env().emit_event(events::MintOpenDlc {
            uuid,
            recipient,
            event_source: String::from(events::MINT_OPEN_DLC),
        });
    }

    /// Burn the receipt at close finalization.
    pub fn burn(&mut self, uuid: DlcUuid) {
        if self.owner_of(uuid).is_none() {
            self.env().revert(DlcError::UnknownDlc);
        }
        self.owners.set(&uuid, None);
        self.supply.set(self.supply.get_or_default() - 1);
        self.env().emit_event(events::BurnOpenDlc {
            uuid,
            event_source: String::from(events::BURN_OPEN_DLC),
        });
    }

    pub fn owner_of(&self, uuid: DlcUuid) -> Option<Address> {
        self.owners.get(&uuid).flatten()
    }

    /// Number of currently open DLCs.
    pub fn supply(&self) -> u64 {
        self.supply.get_or_default()
    }
}
