//! Rows of the four router tables
//!
//! The table store owns four tables: the network table (directly-attached
//! subnets), the routing table (control plane), the forwarding table (data
//! plane), and the port table (static interface inventory). The row types
//! live here; the store itself lives in the engine crate.
//!
//! Rows are never deleted. Unreachability is a status flip, so an entry's
//! identity and interface binding survive transient outages.

use std::fmt::Display;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use crate::subnet::Subnet;

/// Opaque handle for a router port, handed over by the networking layer at
/// boot (a socket descriptor in the original deployment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub u32);

impl Display for PortId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "port {}", self.0)
    }
}

/// Reachability state of a routing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStatus {
    Up,
    Down,
}

/// Data-plane state of a forwarding entry.
///
/// Derived from the backing route's [`RouteStatus`] by the forwarding
/// synchronizer; never set from anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardState {
    Active,
    Inactive,
}

/// Boot-time description of one local interface, in enumeration order.
#[derive(Debug, Clone, Copy)]
pub struct LocalInterface {
    /// The interface's own address.
    pub address: Ipv4Addr,
    /// Prefix length of the attached subnet.
    pub prefix_len: u8,
    /// Port handle for this interface.
    pub port: PortId,
}

/// A directly-attached subnet. Fixed at boot, immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkEntry {
    pub subnet: Subnet,
}

/// Best-known route to one destination subnet.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingEntry {
    /// Destination subnet.
    pub subnet: Subnet,
    /// Next-hop router address; `None` for directly-attached subnets.
    pub next_hop: Option<Ipv4Addr>,
    /// Hop count; 1 for directly-attached subnets.
    pub hop: u32,
    /// Port the route exits through.
    pub port: PortId,
    /// Interface name for display.
    pub port_name: String,
    pub status: RouteStatus,
    /// Last refresh time. `None` marks a directly-attached entry, which
    /// never expires.
    pub refreshed_at: Option<Instant>,
}

impl RoutingEntry {
    /// Whether the entry has outlived the timeout threshold.
    ///
    /// Directly-attached entries carry no refresh time and are never stale.
    pub fn is_stale(&self, now: Instant, threshold: Duration) -> bool {
        match self.refreshed_at {
            Some(refreshed) => now.saturating_duration_since(refreshed) > threshold,
            None => false,
        }
    }
}

/// Data-plane projection of a routing entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardingEntry {
    /// Destination subnet.
    pub subnet: Subnet,
    /// Next-hop router address; `None` when the destination is on-link.
    pub next_hop: Option<Ipv4Addr>,
    /// Egress port.
    pub port: PortId,
    /// Interface name for display.
    pub port_name: String,
    pub state: ForwardState,
}

/// One router port. Created at boot, read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    pub port: PortId,
    pub name: String,
}
