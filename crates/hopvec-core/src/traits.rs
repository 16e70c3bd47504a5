//! Boundary traits toward the networking layer
//!
//! The engine never opens sockets, sends frames, or resolves hardware
//! addresses itself; those are provided from below through [`LinkLayer`].
//! Time is injected through [`Clock`] so staleness behavior is
//! deterministic under test.

use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;

use crate::entry::PortId;
use crate::error::LinkError;

/// Kind tag handed to the link layer with every outgoing payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A DV exchange message (advertisement or withdrawal).
    DvExchange,
    /// A forwarded data packet.
    Data,
}

/// A link-layer hardware address.
pub type HwAddr = [u8; 6];

/// Transmission boundary provided by the networking layer beneath the
/// engine.
#[async_trait]
pub trait LinkLayer: Send + Sync {
    /// Hand a fully-composed message to the link layer for transmission on
    /// `port`.
    async fn send(
        &self,
        port: PortId,
        src: Ipv4Addr,
        dst: Ipv4Addr,
        kind: MessageKind,
        payload: Bytes,
    ) -> Result<(), LinkError>;

    /// Resolve the hardware address for a next-hop IP address (the ARP
    /// equivalent). Used by the packet-forwarding path.
    async fn resolve_hw_addr(&self, addr: Ipv4Addr) -> Result<HwAddr, LinkError>;
}

/// Monotonic time source for staleness comparisons.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Real clock implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually-advanced clock for tests. Clones share the same time, so a
/// test can hold one handle while the router owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Create a clock pinned to the current instant.
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().expect("clock lock poisoned")
    }
}
