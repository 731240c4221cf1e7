//! netnje: a client for NJE (Network Job Entry) over TCP
//!
//! Implements the wire-protocol engine for talking to operational
//! mainframe NJE peers: the nested block/record envelopes, the
//! connection and sign-in handshake state machine, SCB run-length payload
//! compression, the fixed-layout control and sign-in records, and the
//! single-byte code-page transcoding every text field depends on. Payload
//! content above the BSC record header is opaque to this crate.

/// Single-byte legacy code-page transcoding and the shared table registry
pub mod codepage;

/// Session configuration profiles
pub mod config;

/// Structured error types for codecs, handshake, and transport
pub mod error;

/// Block/record envelope building and parsing
pub mod frame;

/// Injected (severity, message) log sink
pub mod logging;

/// Fixed-layout wire records and inbound record classification
pub mod records;

/// Node name to 32-bit address resolution
pub mod resolver;

/// SCB run-length compression for record payloads
pub mod scb;

/// The connection state machine
pub mod session;

/// Byte-stream transport seam and the TCP implementation
pub mod transport;

pub use error::{NjeError, Result};
pub use session::{NjeSession, SessionState};
