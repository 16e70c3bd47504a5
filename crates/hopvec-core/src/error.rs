//! Error types for the hopvec stack

use std::net::Ipv4Addr;

use thiserror::Error;

use crate::entry::PortId;

/// Decode failures for the DV exchange message.
///
/// A malformed message is dropped and logged by the receiver; it never
/// crashes the router and never mutates the tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("message is not valid UTF-8")]
    InvalidUtf8,

    #[error("message does not end with a command sentinel")]
    MissingSentinel,

    #[error("unknown command digit '{0}'")]
    UnknownCommand(char),

    #[error("trailing data after the command sentinel")]
    TrailingData,

    #[error("malformed entry on line {line}: {reason}")]
    MalformedEntry { line: usize, reason: &'static str },
}

/// Table store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A table hit its configured capacity ceiling. The router cannot
    /// safely continue with a partially-populated table, so callers treat
    /// this as fatal.
    #[error("{table} table capacity exhausted ({capacity} entries)")]
    CapacityExhausted { table: &'static str, capacity: usize },

    #[error("invalid prefix length {prefix} for interface {address}")]
    InvalidPrefix { address: Ipv4Addr, prefix: u8 },

    #[error("unknown {0}")]
    UnknownPort(PortId),
}

/// Link-layer failures surfaced by [`crate::traits::LinkLayer`].
///
/// A failed send on one port never aborts the sends on the remaining
/// ports; broadcast is per-port, not all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("send on {port} failed: {reason}")]
    SendFailed { port: PortId, reason: String },

    #[error("no hardware address for {0}")]
    ResolveFailed(Ipv4Addr),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_display() {
        let err = CodecError::MalformedEntry {
            line: 3,
            reason: "invalid hop count",
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("invalid hop count"));

        assert!(
            CodecError::UnknownCommand('2')
                .to_string()
                .contains("'2'")
        );
    }

    #[test]
    fn test_table_error_display() {
        let err = TableError::CapacityExhausted {
            table: "routing",
            capacity: 64,
        };
        let msg = err.to_string();
        assert!(msg.contains("routing"));
        assert!(msg.contains("64"));

        assert!(
            TableError::UnknownPort(PortId(7))
                .to_string()
                .contains("port 7")
        );
    }

    #[test]
    fn test_link_error_display() {
        let err = LinkError::SendFailed {
            port: PortId(2),
            reason: "carrier lost".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("port 2"));
        assert!(msg.contains("carrier lost"));
    }
}
