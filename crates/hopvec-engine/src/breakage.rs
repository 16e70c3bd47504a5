//! Link-breakage handling
//!
//! Two triggers, one meaning: a destination stopped being reachable.
//!
//! - [`mark_link_down`] handles the local signal (an interface-down
//!   notification for one of our own ports): every route bound to the
//!   port goes Down, the matching forwarding entries go Inactive, and the
//!   withdrawn destinations are returned so the caller can broadcast a
//!   BREAKAGE message on the remaining ports.
//! - [`apply_withdrawal`] handles the remote side (a received BREAKAGE
//!   message): every route to a withdrawn destination goes Down regardless
//!   of owning port. Nothing is re-broadcast here; further neighbors learn
//!   of the loss when the next periodic advertisement omits the route.

use tracing::{debug, warn};

use hopvec_core::{DvEntry, ForwardState, PortId, RouteStatus};

use crate::store::TableStore;

/// Take `port` down. Returns the withdrawn destinations with their
/// last-known subnet and hop count, ready for a BREAKAGE broadcast.
pub fn mark_link_down(store: &mut TableStore, port: PortId) -> Vec<DvEntry> {
    let mut withdrawn = Vec::new();

    for route in store.routes.iter_mut().filter(|r| r.port == port) {
        withdrawn.push(DvEntry {
            subnet: route.subnet,
            hop: route.hop,
        });
        route.status = RouteStatus::Down;
    }
    for fw in store.forwarding.iter_mut().filter(|f| f.port == port) {
        fw.state = ForwardState::Inactive;
    }

    warn!(%port, withdrawn = withdrawn.len(), "link down");
    withdrawn
}

/// Apply a received withdrawal. Returns how many routes were taken down.
pub fn apply_withdrawal(store: &mut TableStore, entries: &[DvEntry]) -> usize {
    let mut downed = 0;

    for entry in entries {
        let network = entry.subnet.network();
        for route in store
            .routes
            .iter_mut()
            .filter(|r| r.subnet.network() == network)
        {
            if route.status == RouteStatus::Up {
                downed += 1;
            }
            route.status = RouteStatus::Down;
        }
        for fw in store
            .forwarding
            .iter_mut()
            .filter(|f| f.subnet.network() == network)
        {
            fw.state = ForwardState::Inactive;
        }
    }

    debug!(entries = entries.len(), downed, "applied withdrawal");
    downed
}
