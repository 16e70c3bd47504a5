//! Forwarding synchronizer
//!
//! Reconciles the forwarding table against the routing table after every
//! routing mutation. The forwarding table is a projection of the routing
//! table: each destination gets a forwarding entry the first time it is
//! observed, and the data-plane state is derived from the control-plane
//! status in both directions, so a route that recovers (re-advertised
//! after a breakage or an expiry) becomes forwardable again. While the
//! backing route is Up the next hop and egress port are refreshed too,
//! keeping the data plane on the relaxed path.

use tracing::{debug, trace};

use hopvec_core::{ForwardState, ForwardingEntry, RouteStatus, TableError};

use crate::store::TableStore;

/// Bring the forwarding table in line with the routing table. Returns the
/// number of forwarding entries created.
pub fn reconcile_forwarding(store: &mut TableStore) -> Result<usize, TableError> {
    let mut created = 0;

    for index in 0..store.routes.len() {
        let route = store.routes[index].clone();
        let state = match route.status {
            RouteStatus::Up => ForwardState::Active,
            RouteStatus::Down => ForwardState::Inactive,
        };

        match store.forwarding_index_by_network(route.subnet.network()) {
            Some(existing) => {
                let fw = &mut store.forwarding[existing];
                if route.status == RouteStatus::Up {
                    fw.next_hop = route.next_hop;
                    fw.port = route.port;
                    fw.port_name = route.port_name;
                }
                if fw.state != state {
                    trace!(subnet = %fw.subnet, ?state, "forwarding state follows route status");
                }
                fw.state = state;
            }
            None => {
                store.push_forwarding(ForwardingEntry {
                    subnet: route.subnet,
                    next_hop: route.next_hop,
                    port: route.port,
                    port_name: route.port_name,
                    state,
                })?;
                created += 1;
            }
        }
    }

    if created > 0 {
        debug!(created, "forwarding entries created");
    }
    Ok(created)
}
