//! The table store
//!
//! [`TableStore`] exclusively owns the four router tables. Every other
//! component mutates them through it, so there is exactly one copy of the
//! router's state and no replication to keep consistent.
//!
//! Tables grow append-only up to a configured ceiling and rows are mutated
//! in place; nothing is ever compacted or removed. Hitting a ceiling is a
//! static misconfiguration (tables sized too small for the topology) and
//! surfaces as [`TableError::CapacityExhausted`], which callers treat as
//! fatal.

use std::net::Ipv4Addr;

use tracing::{debug, error};

use hopvec_core::{
    ForwardState, ForwardingEntry, LocalInterface, NetworkEntry, PortEntry, PortId, RouteStatus,
    RoutingEntry, Subnet, TableError,
};

/// Owner of the network, routing, forwarding, and port tables.
#[derive(Debug)]
pub struct TableStore {
    capacity: usize,
    networks: Vec<NetworkEntry>,
    pub(crate) routes: Vec<RoutingEntry>,
    pub(crate) forwarding: Vec<ForwardingEntry>,
    ports: Vec<PortEntry>,
}

impl TableStore {
    /// Create an empty store whose tables may each hold up to `capacity`
    /// entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            networks: Vec::new(),
            routes: Vec::new(),
            forwarding: Vec::new(),
            ports: Vec::new(),
        }
    }

    /// Populate the tables from the boot interface list, in interface
    /// order.
    ///
    /// Each local interface contributes a network entry, a directly-attached
    /// routing entry (hop 1, status Up, no expiry), an active forwarding
    /// entry, and a port entry named `eth<i>`. Attached subnets land ahead
    /// of any learned route, which the first-match forwarding lookup relies
    /// on.
    pub fn seed(&mut self, interfaces: &[LocalInterface]) -> Result<(), TableError> {
        for (index, itf) in interfaces.iter().enumerate() {
            let subnet = Subnet::new(itf.address, itf.prefix_len).ok_or(
                TableError::InvalidPrefix {
                    address: itf.address,
                    prefix: itf.prefix_len,
                },
            )?;
            let name = format!("eth{index}");

            checked_push("network", self.capacity, &mut self.networks, NetworkEntry { subnet })?;
            self.push_route(RoutingEntry {
                subnet,
                next_hop: None,
                hop: 1,
                port: itf.port,
                port_name: name.clone(),
                status: RouteStatus::Up,
                refreshed_at: None,
            })?;
            self.push_forwarding(ForwardingEntry {
                subnet,
                next_hop: None,
                port: itf.port,
                port_name: name.clone(),
                state: ForwardState::Active,
            })?;
            checked_push(
                "port",
                self.capacity,
                &mut self.ports,
                PortEntry {
                    port: itf.port,
                    name,
                },
            )?;

            debug!(subnet = %subnet, port = %itf.port, "seeded local interface");
        }
        Ok(())
    }

    /// The directly-attached subnets.
    pub fn networks(&self) -> &[NetworkEntry] {
        &self.networks
    }

    /// The routing table, in registration order.
    pub fn routes(&self) -> &[RoutingEntry] {
        &self.routes
    }

    /// The forwarding table, in registration order.
    pub fn forwarding(&self) -> &[ForwardingEntry] {
        &self.forwarding
    }

    /// The port inventory.
    pub fn ports(&self) -> &[PortEntry] {
        &self.ports
    }

    /// Interface name for a port handle.
    pub fn port_name(&self, port: PortId) -> Option<&str> {
        self.ports
            .iter()
            .find(|p| p.port == port)
            .map(|p| p.name.as_str())
    }

    /// Ports whose attached subnet is still forwarding-active, i.e. the
    /// ports a broadcast goes out on.
    pub fn active_ports(&self) -> Vec<PortId> {
        self.ports
            .iter()
            .filter(|p| {
                self.forwarding.iter().any(|fw| {
                    fw.port == p.port && fw.next_hop.is_none() && fw.state == ForwardState::Active
                })
            })
            .map(|p| p.port)
            .collect()
    }

    /// Whether `network` is one of the router's directly-attached subnets.
    /// Neighbor claims about attached subnets are ignored by the update
    /// engine.
    pub fn is_local_network(&self, network: Ipv4Addr) -> bool {
        self.networks.iter().any(|n| n.subnet.network() == network)
    }

    pub(crate) fn route_index_by_network(&self, network: Ipv4Addr) -> Option<usize> {
        self.routes
            .iter()
            .position(|r| r.subnet.network() == network)
    }

    pub(crate) fn forwarding_index_by_network(&self, network: Ipv4Addr) -> Option<usize> {
        self.forwarding
            .iter()
            .position(|f| f.subnet.network() == network)
    }

    pub(crate) fn push_route(&mut self, entry: RoutingEntry) -> Result<(), TableError> {
        checked_push("routing", self.capacity, &mut self.routes, entry)
    }

    pub(crate) fn push_forwarding(&mut self, entry: ForwardingEntry) -> Result<(), TableError> {
        checked_push("forwarding", self.capacity, &mut self.forwarding, entry)
    }
}

fn checked_push<T>(
    table: &'static str,
    capacity: usize,
    rows: &mut Vec<T>,
    entry: T,
) -> Result<(), TableError> {
    if rows.len() >= capacity {
        error!(table, capacity, "table capacity exhausted");
        return Err(TableError::CapacityExhausted { table, capacity });
    }
    rows.push(entry);
    Ok(())
}
