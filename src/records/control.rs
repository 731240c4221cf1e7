//! The 33-byte node-open control record
//!
//! Control records are exchanged raw (unframed) during the initial node
//! open. The layout is the classic VMctl structure:
//!
//! | offset | len | field |
//! |--------|-----|-------------------------------|
//! | 0      | 8   | request type tag              |
//! | 8      | 8   | sender node name              |
//! | 16     | 4   | sender address (BE u32)       |
//! | 20     | 8   | receiver node name            |
//! | 28     | 4   | receiver address (BE u32)     |
//! | 32     | 1   | reason code                   |
//!
//! Text fields are code-page encoded and blank-padded to 8 bytes.

use crate::codepage::Codepage;
use crate::error::{NjeError, Result};

/// Wire size of a control record
pub const CONTROL_RECORD_LEN: usize = 33;

/// Request type sent to open the link
pub const REQUEST_OPEN: &str = "OPEN";
/// Request type the peer answers with on success
pub const REQUEST_ACK: &str = "ACK";
/// Request type the peer answers with on refusal
pub const REQUEST_NAK: &str = "NAK";

/// One node-open handshake message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRecord {
    /// Request type tag, at most 8 characters ("OPEN", "ACK", "NAK", ...)
    pub request_type: String,
    /// Sender node name, at most 8 characters
    pub sender_node: String,
    /// Sender address as a network-order IPv4 value
    pub sender_addr: u32,
    /// Receiver node name, at most 8 characters
    pub receiver_node: String,
    /// Receiver address as a network-order IPv4 value
    pub receiver_addr: u32,
    /// Reason code; 0 on requests, peer-defined on refusals
    pub reason: u8,
}

impl ControlRecord {
    /// Builds an OPEN request from local toward remote
    pub fn open(
        sender_node: &str,
        sender_addr: u32,
        receiver_node: &str,
        receiver_addr: u32,
    ) -> Self {
        Self {
            request_type: REQUEST_OPEN.to_string(),
            sender_node: sender_node.to_string(),
            sender_addr,
            receiver_node: receiver_node.to_string(),
            receiver_addr,
            reason: 0,
        }
    }

    /// Serializes to the exact 33-byte wire layout
    pub fn to_bytes(&self, page: &Codepage) -> Vec<u8> {
        let mut out = vec![0u8; CONTROL_RECORD_LEN];
        out[0..8].copy_from_slice(&page.encode_field(&self.request_type, 8));
        out[8..16].copy_from_slice(&page.encode_field(&self.sender_node, 8));
        out[16..20].copy_from_slice(&self.sender_addr.to_be_bytes());
        out[20..28].copy_from_slice(&page.encode_field(&self.receiver_node, 8));
        out[28..32].copy_from_slice(&self.receiver_addr.to_be_bytes());
        out[32] = self.reason;
        out
    }

    /// Parses a 33-byte buffer. Each field is read independently from its
    /// own offset; in particular the sender and receiver addresses come
    /// from offsets 16 and 28 respectively.
    pub fn parse(bytes: &[u8], page: &Codepage) -> Result<Self> {
        if bytes.len() != CONTROL_RECORD_LEN {
            return Err(NjeError::MalformedInput {
                context: "control record",
                expected: CONTROL_RECORD_LEN,
                actual: bytes.len(),
            });
        }

        let sender_addr = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let receiver_addr = u32::from_be_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]);

        Ok(Self {
            request_type: page.decode_field(&bytes[0..8]),
            sender_node: page.decode_field(&bytes[8..16]),
            sender_addr,
            receiver_node: page.decode_field(&bytes[20..28]),
            receiver_addr,
            reason: bytes[32],
        })
    }

    /// True when the record acknowledges a request
    pub fn is_ack(&self) -> bool {
        self.request_type == REQUEST_ACK
    }
}
