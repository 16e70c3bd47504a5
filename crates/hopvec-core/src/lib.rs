//! # Hopvec Core
//!
//! Core types and boundary traits for the hopvec distance-vector routing
//! stack.
//!
//! This crate provides everything the engine and node crates share: the
//! subnet value type, the rows of the four router tables, the textual DV
//! exchange codec, the error taxonomy, and the traits that mark the
//! boundary toward the networking layer beneath the engine.
//!
//! ## Key Types
//!
//! - [`Subnet`]: an IPv4 network address plus prefix length
//! - [`RoutingEntry`] / [`ForwardingEntry`]: control-plane and data-plane
//!   table rows
//! - [`DvMessage`]: the wire-level DV exchange message
//!
//! ## Key Traits
//!
//! - [`LinkLayer`]: frame transmission and hardware-address resolution,
//!   provided by the surrounding networking layer
//! - [`Clock`]: monotonic time source, injectable for tests

pub mod entry;
pub mod error;
pub mod message;
pub mod mock_link;
pub mod subnet;
pub mod traits;

// Re-export main types
pub use entry::*;
pub use error::*;
pub use message::*;
pub use mock_link::*;
pub use subnet::*;
pub use traits::*;
