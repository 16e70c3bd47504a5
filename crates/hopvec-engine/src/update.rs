//! Route update engine
//!
//! Applies the entries of a received advertisement to the routing table
//! under distance-vector (Bellman-Ford) rules. Each entry interacts only
//! with its own destination, so order within one message does not matter;
//! across messages the most recent relaxation wins.

use std::net::Ipv4Addr;
use std::time::Instant;

use tracing::{debug, trace};

use hopvec_core::{DvEntry, DvMessage, PortId, RouteStatus, RoutingEntry, TableError};

use crate::store::TableStore;

/// Compose the advertisement half of the protocol: every route that is
/// currently Up, at its stored hop count -- learned routes included. Down
/// routes are simply absent, which is how withdrawals reach routers beyond
/// the immediate neighbors.
pub fn advertisement(store: &TableStore) -> DvMessage {
    let entries = store
        .routes()
        .iter()
        .filter(|r| r.status == RouteStatus::Up)
        .map(|r| DvEntry {
            subnet: r.subnet,
            hop: r.hop,
        })
        .collect();
    DvMessage::advertise(entries)
}

/// What an advertisement did to the routing table, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Keep-alives: timestamp refreshed, route unchanged.
    pub refreshed: usize,
    /// Existing routes replaced by a better (or reviving) path.
    pub relaxed: usize,
    /// Previously-unknown destinations appended.
    pub added: usize,
    /// Entries ignored (local subnets, or longer-or-equal paths).
    pub ignored: usize,
}

/// Apply the DV entries advertised by `neighbor`, received via `port`.
///
/// Per entry:
/// - claims about directly-attached subnets are ignored; the router is
///   authoritative for those,
/// - an Up route re-asserted by its current next hop is a keep-alive and
///   only has its timestamp refreshed,
/// - a Down route, or a strictly shorter offered path, is replaced with
///   `neighbor` as next hop at `hop + 1`. Equal-cost paths through a
///   different neighbor are ignored so the next hop never flaps,
/// - unknown destinations are appended, subject to table capacity.
pub fn apply_advertisement(
    store: &mut TableStore,
    neighbor: Ipv4Addr,
    port: PortId,
    entries: &[DvEntry],
    now: Instant,
) -> Result<UpdateSummary, TableError> {
    let mut summary = UpdateSummary::default();

    for entry in entries {
        let network = entry.subnet.network();
        if store.is_local_network(network) {
            trace!(subnet = %entry.subnet, "ignoring claim about attached subnet");
            summary.ignored += 1;
            continue;
        }

        let offered_hop = entry.hop.saturating_add(1);
        match store.route_index_by_network(network) {
            Some(index) => {
                let (status, current_next_hop, current_hop) = {
                    let route = &store.routes[index];
                    (route.status, route.next_hop, route.hop)
                };
                if status == RouteStatus::Up && current_next_hop == Some(neighbor) {
                    // The path is unchanged; only prevent expiry.
                    let route = &mut store.routes[index];
                    route.refreshed_at = Some(now);
                    trace!(subnet = %route.subnet, %neighbor, "keep-alive");
                    summary.refreshed += 1;
                } else if status == RouteStatus::Down || offered_hop < current_hop {
                    let port_name = store
                        .port_name(port)
                        .ok_or(TableError::UnknownPort(port))?
                        .to_string();
                    let route = &mut store.routes[index];
                    debug!(
                        subnet = %route.subnet,
                        %neighbor,
                        old_hop = current_hop,
                        new_hop = offered_hop,
                        was_down = status == RouteStatus::Down,
                        "relaxing route"
                    );
                    route.next_hop = Some(neighbor);
                    route.hop = offered_hop;
                    route.port = port;
                    route.port_name = port_name;
                    route.status = RouteStatus::Up;
                    route.refreshed_at = Some(now);
                    summary.relaxed += 1;
                } else {
                    summary.ignored += 1;
                }
            }
            None => {
                let port_name = store
                    .port_name(port)
                    .ok_or(TableError::UnknownPort(port))?
                    .to_string();
                store.push_route(RoutingEntry {
                    subnet: entry.subnet,
                    next_hop: Some(neighbor),
                    hop: offered_hop,
                    port,
                    port_name,
                    status: RouteStatus::Up,
                    refreshed_at: Some(now),
                })?;
                debug!(subnet = %entry.subnet, %neighbor, hop = offered_hop, "learned route");
                summary.added += 1;
            }
        }
    }

    Ok(summary)
}
