//! Timeout sweeper
//!
//! Scans the routing table and takes stale routes down. A route is stale
//! when its last refresh is older than the configured threshold;
//! directly-attached routes carry no refresh time and never expire.
//!
//! Expiry is purely local: no message is broadcast because every router
//! detects staleness independently, and the Down route simply disappears
//! from the next periodic advertisement.

use std::time::{Duration, Instant};

use tracing::info;

use hopvec_core::{ForwardState, RouteStatus, Subnet};

use crate::store::TableStore;

/// Take every stale Up route down, along with its forwarding entry.
/// Returns the expired destinations.
pub fn expire_stale(store: &mut TableStore, now: Instant, threshold: Duration) -> Vec<Subnet> {
    let mut expired = Vec::new();

    for route in store.routes.iter_mut() {
        if route.status == RouteStatus::Up && route.is_stale(now, threshold) {
            route.status = RouteStatus::Down;
            expired.push(route.subnet);
        }
    }
    for subnet in &expired {
        let network = subnet.network();
        for fw in store
            .forwarding
            .iter_mut()
            .filter(|f| f.subnet.network() == network)
        {
            fw.state = ForwardState::Inactive;
        }
    }

    if !expired.is_empty() {
        info!(expired = expired.len(), "routes expired");
    }
    expired
}
