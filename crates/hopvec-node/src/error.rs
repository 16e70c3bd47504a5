//! Node-level error type

use thiserror::Error;

use hopvec_core::{CodecError, LinkError, TableError};

/// Errors surfaced by the router coordinator.
///
/// Only [`TableError::CapacityExhausted`] should stop the process; a
/// malformed message means one dropped frame, and link failures are
/// per-port.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("malformed DV message: {0}")]
    Malformed(#[from] CodecError),

    #[error("table error: {0}")]
    Table(#[from] TableError),

    #[error("link error: {0}")]
    Link(#[from] LinkError),

    #[error("failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: NodeError = CodecError::MissingSentinel.into();
        assert!(matches!(err, NodeError::Malformed(_)));

        let err: NodeError = TableError::CapacityExhausted {
            table: "routing",
            capacity: 4,
        }
        .into();
        assert!(matches!(err, NodeError::Table(_)));
    }

    #[test]
    fn test_display_carries_cause() {
        let err: NodeError = CodecError::UnknownCommand('7').into();
        let msg = err.to_string();
        assert!(msg.contains("malformed DV message"));
        assert!(msg.contains("'7'"));
    }
}
