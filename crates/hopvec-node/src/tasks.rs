//! Background tasks for the protocol clockwork
//!
//! Two periodic loops drive the router between incoming messages: the
//! advertise task broadcasts the routing state on every active port, and
//! the sweep task expires routes that stopped being refreshed. Both stop
//! when the router's shutdown channel fires.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use hopvec_core::{Clock, LinkLayer};

use crate::router::Router;

/// Periodic advertisement broadcaster.
pub struct AdvertiseTask<L: LinkLayer, C: Clock> {
    router: Arc<Router<L, C>>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl<L: LinkLayer + 'static, C: Clock + 'static> AdvertiseTask<L, C> {
    /// Spawn the task as a background task.
    pub fn spawn(router: Arc<Router<L, C>>) -> JoinHandle<()> {
        let shutdown_rx = router.subscribe_shutdown();
        let task = Self {
            router,
            shutdown_rx,
        };
        tokio::spawn(task.run())
    }

    async fn run(mut self) {
        let period = self.router.config().advertise_interval();
        info!(interval_secs = period.as_secs(), "advertise task started");

        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    info!("advertise task shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.router.broadcast_advertisement().await;
                }
            }
        }
    }
}

/// Periodic timeout sweeper.
pub struct SweepTask<L: LinkLayer, C: Clock> {
    router: Arc<Router<L, C>>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl<L: LinkLayer + 'static, C: Clock + 'static> SweepTask<L, C> {
    /// Spawn the task as a background task.
    pub fn spawn(router: Arc<Router<L, C>>) -> JoinHandle<()> {
        let shutdown_rx = router.subscribe_shutdown();
        let task = Self {
            router,
            shutdown_rx,
        };
        tokio::spawn(task.run())
    }

    async fn run(mut self) {
        let period = self.router.config().sweep_interval();
        info!(interval_secs = period.as_secs(), "sweep task started");

        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    info!("sweep task shutting down");
                    break;
                }
                _ = interval.tick() => {
                    let expired = self.router.sweep_once().await;
                    if expired > 0 {
                        debug!(expired, "sweep pass expired routes");
                    }
                }
            }
        }
    }
}

impl<L: LinkLayer + 'static, C: Clock + 'static> Router<L, C> {
    /// Spawn both background tasks for this router.
    pub fn spawn_tasks(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        vec![
            AdvertiseTask::spawn(Arc::clone(self)),
            SweepTask::spawn(Arc::clone(self)),
        ]
    }
}
