//! The 41-byte sign-in record
//!
//! Sent as the first application record after the link comes up. Three
//! fixed marker bytes (0x29 at offset 0, 0x64 at offset 18, 0x15 at offset
//! 38) bracket the node names and the requested buffer size; everything
//! else is zero-filled reserved space. Parsing is permissive about the
//! markers, serialization always emits them.

use crate::codepage::Codepage;
use crate::error::{NjeError, Result};

/// Wire size of a sign-in record
pub const SIGNIN_RECORD_LEN: usize = 41;

/// Fixed marker at offset 0
const MARKER_START: u8 = 0x29;
/// Fixed marker at offset 18
const MARKER_BUFSIZE: u8 = 0x64;
/// Fixed marker at offset 38
const MARKER_END: u8 = 0x15;

/// The post-link sign-in exchange record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRecord {
    /// Our node name, at most 8 characters
    pub local_node: String,
    /// The peer's node name, at most 8 characters
    pub remote_node: String,
    /// Requested buffer size in bytes
    pub buffer_size: u16,
}

impl SignInRecord {
    pub fn new(local_node: &str, remote_node: &str, buffer_size: u16) -> Self {
        Self {
            local_node: local_node.to_string(),
            remote_node: remote_node.to_string(),
            buffer_size,
        }
    }

    /// Serializes to the exact 41-byte wire layout, marker bytes included
    pub fn to_bytes(&self, page: &Codepage) -> Vec<u8> {
        let mut out = vec![0u8; SIGNIN_RECORD_LEN];
        out[0] = MARKER_START;
        out[1..9].copy_from_slice(&page.encode_field(&self.local_node, 8));
        out[9..17].copy_from_slice(&page.encode_field(&self.remote_node, 8));
        out[18] = MARKER_BUFSIZE;
        out[19..21].copy_from_slice(&self.buffer_size.to_be_bytes());
        out[38] = MARKER_END;
        out
    }

    /// Parses a 41-byte buffer. The marker bytes are not validated;
    /// operational peers vary in what they put there.
    pub fn parse(bytes: &[u8], page: &Codepage) -> Result<Self> {
        if bytes.len() != SIGNIN_RECORD_LEN {
            return Err(NjeError::MalformedInput {
                context: "sign-in record",
                expected: SIGNIN_RECORD_LEN,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            local_node: page.decode_field(&bytes[1..9]),
            remote_node: page.decode_field(&bytes[9..17]),
            buffer_size: u16::from_be_bytes([bytes[19], bytes[20]]),
        })
    }
}
