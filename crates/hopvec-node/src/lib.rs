//! # Hopvec Node
//!
//! The async coordinator around the distance-vector engine.
//!
//! A [`Router`] owns the table store behind a single lock, takes a
//! [`hopvec_core::LinkLayer`] from the embedding networking layer, and
//! exposes the operations that layer calls into: frame handling, link-down
//! signals, forwarding lookups, and table rendering. Two background tasks
//! drive the protocol clockwork: [`AdvertiseTask`] broadcasts the routing
//! state periodically and [`SweepTask`] expires stale routes.
//!
//! ## Locking discipline
//!
//! All four tables share one mutex. It is taken once per incoming message,
//! sweep pass, or broadcast composition, and is never held across a link
//! send: outgoing payloads are fully composed under the lock and
//! transmitted after it is released.

pub mod config;
pub mod error;
pub mod router;
pub mod tasks;
pub mod telemetry;

// Re-export main types
pub use config::RouterConfig;
pub use error::{NodeError, NodeResult};
pub use router::Router;
pub use tasks::{AdvertiseTask, SweepTask};
pub use telemetry::init_tracing;
