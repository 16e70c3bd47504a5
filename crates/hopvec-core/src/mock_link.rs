//! Mock link layer for testing
//!
//! Provides an in-memory [`LinkLayer`] for exercising the engine and node
//! logic without real interfaces. Sent frames are recorded for inspection,
//! individual ports can be made to fail (to test per-port broadcast
//! isolation), and hardware-address resolution answers from a canned table.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let link = MockLink::new();
//! link.fail_port(PortId(1));
//!
//! // ... drive the router ...
//!
//! let frames = link.take_sent();
//! assert_eq!(frames[0].port, PortId(0));
//! ```

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::entry::PortId;
use crate::error::LinkError;
use crate::traits::{HwAddr, LinkLayer, MessageKind};

/// One frame handed to the mock link layer.
#[derive(Debug, Clone)]
pub struct SentFrame {
    pub port: PortId,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub kind: MessageKind,
    pub payload: Bytes,
}

/// Recording link layer for tests.
#[derive(Debug, Default)]
pub struct MockLink {
    sent: Mutex<Vec<SentFrame>>,
    failing: Mutex<HashSet<PortId>>,
    hw_addrs: Mutex<HashMap<Ipv4Addr, HwAddr>>,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return every frame sent so far.
    pub fn take_sent(&self) -> Vec<SentFrame> {
        std::mem::take(&mut self.sent.lock().expect("mock link lock poisoned"))
    }

    /// Number of frames sent so far, without draining.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mock link lock poisoned").len()
    }

    /// Make every send on `port` fail until [`MockLink::restore_port`].
    pub fn fail_port(&self, port: PortId) {
        self.failing
            .lock()
            .expect("mock link lock poisoned")
            .insert(port);
    }

    /// Let sends on `port` succeed again.
    pub fn restore_port(&self, port: PortId) {
        self.failing
            .lock()
            .expect("mock link lock poisoned")
            .remove(&port);
    }

    /// Register a canned hardware address for `addr`.
    pub fn register_hw_addr(&self, addr: Ipv4Addr, hw: HwAddr) {
        self.hw_addrs
            .lock()
            .expect("mock link lock poisoned")
            .insert(addr, hw);
    }
}

#[async_trait]
impl LinkLayer for MockLink {
    async fn send(
        &self,
        port: PortId,
        src: Ipv4Addr,
        dst: Ipv4Addr,
        kind: MessageKind,
        payload: Bytes,
    ) -> Result<(), LinkError> {
        if self
            .failing
            .lock()
            .expect("mock link lock poisoned")
            .contains(&port)
        {
            return Err(LinkError::SendFailed {
                port,
                reason: "injected failure".into(),
            });
        }

        self.sent
            .lock()
            .expect("mock link lock poisoned")
            .push(SentFrame {
                port,
                src,
                dst,
                kind,
                payload,
            });
        Ok(())
    }

    async fn resolve_hw_addr(&self, addr: Ipv4Addr) -> Result<HwAddr, LinkError> {
        self.hw_addrs
            .lock()
            .expect("mock link lock poisoned")
            .get(&addr)
            .copied()
            .ok_or(LinkError::ResolveFailed(addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_send_records_frames() {
        let link = MockLink::new();
        link.send(
            PortId(0),
            addr("10.0.0.1"),
            Ipv4Addr::BROADCAST,
            MessageKind::DvExchange,
            Bytes::from_static(b"x0"),
        )
        .await
        .unwrap();

        let frames = link.take_sent();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].port, PortId(0));
        assert_eq!(frames[0].payload.as_ref(), b"x0");

        // Draining leaves the buffer empty.
        assert_eq!(link.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_port_rejects_sends() {
        let link = MockLink::new();
        link.fail_port(PortId(1));

        let result = link
            .send(
                PortId(1),
                addr("10.0.0.1"),
                Ipv4Addr::BROADCAST,
                MessageKind::DvExchange,
                Bytes::from_static(b"x0"),
            )
            .await;
        assert!(matches!(result, Err(LinkError::SendFailed { port, .. }) if port == PortId(1)));

        link.restore_port(PortId(1));
        assert!(
            link.send(
                PortId(1),
                addr("10.0.0.1"),
                Ipv4Addr::BROADCAST,
                MessageKind::DvExchange,
                Bytes::from_static(b"x0"),
            )
            .await
            .is_ok()
        );
    }

    #[tokio::test]
    async fn test_hw_addr_resolution() {
        let link = MockLink::new();
        let hw = [0xAA, 0xBB, 0xCC, 0x00, 0x00, 0x01];
        link.register_hw_addr(addr("10.0.0.2"), hw);

        assert_eq!(link.resolve_hw_addr(addr("10.0.0.2")).await.unwrap(), hw);
        assert_eq!(
            link.resolve_hw_addr(addr("10.0.0.9")).await,
            Err(LinkError::ResolveFailed(addr("10.0.0.9")))
        );
    }
}
