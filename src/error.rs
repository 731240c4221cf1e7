//! Error handling for netnje
//!
//! This module provides the structured error types surfaced by the wire
//! codecs and the session state machine. The taxonomy follows the protocol
//! contract: malformed input is always surfaced (it means a wire-format
//! mismatch with the peer), protocol rejections carry the peer's literal
//! response for diagnostics, and transport failures are terminal for the
//! operation in progress.

use std::fmt;
use std::io;

/// Top-level error type for netnje operations
#[derive(Debug)]
pub enum NjeError {
    /// Wrong-length or truncated wire data. Never recovered silently:
    /// it indicates the peer and this client disagree about the format.
    MalformedInput {
        /// What was being parsed when the mismatch was detected
        context: &'static str,
        /// Byte count the format requires
        expected: usize,
        /// Byte count actually available
        actual: usize,
    },
    /// The peer answered a handshake step with something other than the
    /// expected acknowledgement. The session parks in `Errored`.
    ProtocolRejection {
        /// Which handshake stage rejected us
        stage: HandshakeStage,
        /// The peer's literal response (decoded text for control records,
        /// hex for link-level bytes)
        response: String,
    },
    /// Connection refused/reset, resolver failure, stream I/O error.
    /// The session is unusable afterwards and must be reconstructed.
    Transport(io::Error),
    /// The link-level wait ran out of time before the peer responded
    LinkTimeout {
        /// Configured wait bound in milliseconds
        timeout_ms: u64,
    },
    /// Invalid session configuration
    Config {
        parameter: &'static str,
        reason: String,
    },
}

/// Handshake stages a peer can reject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStage {
    /// The raw OPEN/ACK control-record exchange
    NodeOpen,
    /// The framed SOH/ENQ probe and its DLE/ACK0 answer
    LinkProbe,
}

impl fmt::Display for HandshakeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeStage::NodeOpen => write!(f, "node open"),
            HandshakeStage::LinkProbe => write!(f, "link probe"),
        }
    }
}

impl fmt::Display for NjeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NjeError::MalformedInput { context, expected, actual } => {
                write!(f, "malformed {}: expected {}, got {}", context, expected, actual)
            }
            NjeError::ProtocolRejection { stage, response } => {
                write!(f, "peer rejected {} with {:?}", stage, response)
            }
            NjeError::Transport(e) => write!(f, "transport failure: {}", e),
            NjeError::LinkTimeout { timeout_ms } => {
                write!(f, "no link-level response within {} ms", timeout_ms)
            }
            NjeError::Config { parameter, reason } => {
                write!(f, "invalid configuration '{}': {}", parameter, reason)
            }
        }
    }
}

impl std::error::Error for NjeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NjeError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for NjeError {
    fn from(e: io::Error) -> Self {
        NjeError::Transport(e)
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, NjeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let e = NjeError::MalformedInput {
            context: "control record",
            expected: 33,
            actual: 32,
        };
        assert_eq!(e.to_string(), "malformed control record: expected 33, got 32");
    }

    #[test]
    fn test_rejection_display_names_stage() {
        let e = NjeError::ProtocolRejection {
            stage: HandshakeStage::NodeOpen,
            response: "NAK".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("node open"));
        assert!(msg.contains("NAK"));
    }

    #[test]
    fn test_io_error_converts_to_transport() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let e: NjeError = io_err.into();
        assert!(matches!(e, NjeError::Transport(_)));
    }
}
