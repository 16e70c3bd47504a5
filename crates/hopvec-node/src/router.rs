//! The router coordinator
//!
//! [`Router`] wires the synchronous engine to the asynchronous world: it
//! owns the table store behind a single mutex, decodes incoming frames
//! before touching any table, and composes outgoing payloads under the
//! lock while transmitting after releasing it.

use std::net::Ipv4Addr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};

use hopvec_core::{
    Clock, DvCommand, DvMessage, HwAddr, LinkLayer, LocalInterface, MessageKind, PortId,
    SystemClock,
};
use hopvec_engine::{
    Egress, TableStore, advertisement, apply_advertisement, apply_withdrawal, egress_for,
    expire_stale, mark_link_down, reconcile_forwarding, render_forwarding_table,
    render_routing_table,
};

use crate::config::RouterConfig;
use crate::error::NodeError;

/// Coordinator for one software router.
///
/// Generic over the link layer below it and the clock, so tests can inject
/// a recording link and a manually-advanced clock.
pub struct Router<L: LinkLayer, C: Clock = SystemClock> {
    tables: Mutex<TableStore>,
    link: Arc<L>,
    clock: C,
    config: RouterConfig,
    local_addrs: Vec<Ipv4Addr>,
    shutdown: broadcast::Sender<()>,
}

impl<L: LinkLayer> Router<L> {
    /// Create a router and seed its tables from the boot interface list.
    pub fn new(
        link: Arc<L>,
        config: RouterConfig,
        interfaces: &[LocalInterface],
    ) -> Result<Self, NodeError> {
        Self::with_clock(link, config, interfaces, SystemClock)
    }
}

impl<L: LinkLayer, C: Clock> Router<L, C> {
    /// Create a router with an injected clock.
    pub fn with_clock(
        link: Arc<L>,
        config: RouterConfig,
        interfaces: &[LocalInterface],
        clock: C,
    ) -> Result<Self, NodeError> {
        let mut tables = TableStore::new(config.table_capacity);
        tables.seed(interfaces)?;

        let local_addrs = interfaces.iter().map(|i| i.address).collect();
        let (shutdown, _) = broadcast::channel(4);

        info!(interfaces = interfaces.len(), "router initialized");
        Ok(Self {
            tables: Mutex::new(tables),
            link,
            clock,
            config,
            local_addrs,
            shutdown,
        })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Handle an incoming DV frame received on `port` from neighbor `src`.
    ///
    /// The frame is decoded completely before any table is touched, so a
    /// malformed message is dropped without side effects: it is logged here
    /// and returned as [`NodeError::Malformed`] for the receive loop to
    /// ignore. A capacity error is fatal and must stop the process.
    pub async fn handle_frame(
        &self,
        port: PortId,
        src: Ipv4Addr,
        payload: &[u8],
    ) -> Result<(), NodeError> {
        let message = match DvMessage::decode(payload) {
            Ok(message) => message,
            Err(error) => {
                warn!(%port, %src, %error, "dropping malformed DV message");
                return Err(error.into());
            }
        };

        let now = self.clock.now();
        let mut tables = self.tables.lock().await;
        match message.command {
            DvCommand::Advertise => {
                let summary =
                    apply_advertisement(&mut tables, src, port, &message.entries, now)?;
                debug!(
                    %port,
                    %src,
                    added = summary.added,
                    relaxed = summary.relaxed,
                    refreshed = summary.refreshed,
                    "advertisement applied"
                );
            }
            DvCommand::Breakage => {
                apply_withdrawal(&mut tables, &message.entries);
            }
        }
        reconcile_forwarding(&mut tables)?;
        Ok(())
    }

    /// Broadcast the current routing state on every active port.
    pub async fn broadcast_advertisement(&self) {
        let (payload, ports) = {
            let tables = self.tables.lock().await;
            (advertisement(&tables).encode_bytes(), tables.active_ports())
        };
        debug!(ports = ports.len(), "broadcasting advertisement");
        self.send_to_ports(&ports, payload).await;
    }

    /// Handle a link-down signal for `port`: mark the affected routes
    /// unreachable and broadcast the withdrawal on every other port.
    pub async fn handle_link_down(&self, port: PortId) -> Result<(), NodeError> {
        let (payload, ports) = {
            let mut tables = self.tables.lock().await;
            let withdrawn = mark_link_down(&mut tables, port);
            reconcile_forwarding(&mut tables)?;
            let ports: Vec<PortId> = tables
                .ports()
                .iter()
                .map(|p| p.port)
                .filter(|p| *p != port)
                .collect();
            (DvMessage::breakage(withdrawn).encode_bytes(), ports)
        };
        self.send_to_ports(&ports, payload).await;
        Ok(())
    }

    /// Run one timeout sweep. Returns how many routes expired.
    pub async fn sweep_once(&self) -> usize {
        let now = self.clock.now();
        let mut tables = self.tables.lock().await;
        expire_stale(&mut tables, now, self.config.route_timeout()).len()
    }

    /// Forwarding lookup for the packet path. `None` means undeliverable.
    pub async fn egress_for(&self, dst: Ipv4Addr) -> Option<Egress> {
        let tables = self.tables.lock().await;
        egress_for(&tables, dst)
    }

    /// Interface name for a port handle.
    pub async fn port_name(&self, port: PortId) -> Option<String> {
        let tables = self.tables.lock().await;
        tables.port_name(port).map(str::to_string)
    }

    /// Resolve the hardware address a packet for `dst` should be framed
    /// with: the gateway's when the route goes through a neighbor, the
    /// destination's own when it is on-link. `Ok(None)` means no route.
    pub async fn next_hop_hw_addr(
        &self,
        dst: Ipv4Addr,
    ) -> Result<Option<(PortId, HwAddr)>, NodeError> {
        let Some(egress) = self.egress_for(dst).await else {
            return Ok(None);
        };
        let hw = self.link.resolve_hw_addr(egress.resolve_target(dst)).await?;
        Ok(Some((egress.port, hw)))
    }

    /// Render the routing table for display.
    pub async fn render_routing_table(&self) -> String {
        let tables = self.tables.lock().await;
        render_routing_table(&tables)
    }

    /// Render the forwarding table for display.
    pub async fn render_forwarding_table(&self) -> String {
        let tables = self.tables.lock().await;
        render_forwarding_table(&tables)
    }

    /// Signal the background tasks to stop.
    pub fn shutdown(&self) {
        info!("router shutting down");
        let _ = self.shutdown.send(());
    }

    pub(crate) fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown.subscribe()
    }

    /// Source address for outgoing DV messages.
    fn primary_addr(&self) -> Ipv4Addr {
        self.local_addrs
            .first()
            .copied()
            .unwrap_or(Ipv4Addr::UNSPECIFIED)
    }

    /// Send `payload` on each port independently: one failed port is
    /// logged and never aborts the remaining sends.
    async fn send_to_ports(&self, ports: &[PortId], payload: Bytes) {
        let src = self.primary_addr();
        for &port in ports {
            if let Err(error) = self
                .link
                .send(
                    port,
                    src,
                    Ipv4Addr::BROADCAST,
                    MessageKind::DvExchange,
                    payload.clone(),
                )
                .await
            {
                warn!(%port, %error, "send failed, continuing on remaining ports");
            }
        }
    }
}
