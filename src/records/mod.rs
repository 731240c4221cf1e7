//! Wire record structures
//!
//! The fixed-layout handshake records (control, sign-in) and the
//! classified form of records extracted from an inbound block. The record
//! kinds are one tagged enum rather than a trait-object hierarchy; every
//! consumer matches on the tag.

pub mod control;
pub mod signin;

pub use control::ControlRecord;
pub use signin::SignInRecord;

/// Offset of the server sequence byte inside a structured record
const SEQUENCE_OFFSET: usize = 2;

/// A record extracted from one inner frame of an inbound block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundRecord {
    /// Link-idle heartbeat, always exactly 6 bytes on the wire
    Heartbeat {
        /// The raw 6 bytes, kept for diagnostics
        bytes: Vec<u8>,
    },
    /// A record with a BSC header: DLE/STX leader, sequence byte, and the
    /// function-control byte pair
    Structured {
        /// Server sequence byte (offset 2)
        sequence: u8,
        /// Function-control bytes (offsets 3 and 4)
        fcs: [u8; 2],
        /// The full extracted record, header included; payload content is
        /// opaque to the core
        bytes: Vec<u8>,
    },
    /// Anything too short to carry a header; passed through untouched for
    /// caller-defined handling. Not an error.
    Unknown {
        bytes: Vec<u8>,
    },
}

impl InboundRecord {
    /// Classifies one extracted inner record by length: exactly 6 bytes is
    /// a heartbeat, more than 2 is structured, anything else is unknown.
    pub fn classify(bytes: Vec<u8>) -> Self {
        if bytes.len() == 6 {
            InboundRecord::Heartbeat { bytes }
        } else if bytes.len() > 2 {
            let sequence = bytes[SEQUENCE_OFFSET];
            // Records of length 3 or 4 carry a sequence byte but only part
            // of the FCS pair; missing FCS bytes read as zero.
            let fcs = [
                bytes.get(3).copied().unwrap_or(0),
                bytes.get(4).copied().unwrap_or(0),
            ];
            InboundRecord::Structured { sequence, fcs, bytes }
        } else {
            InboundRecord::Unknown { bytes }
        }
    }

    /// The raw extracted bytes, whatever the classification
    pub fn bytes(&self) -> &[u8] {
        match self {
            InboundRecord::Heartbeat { bytes }
            | InboundRecord::Structured { bytes, .. }
            | InboundRecord::Unknown { bytes } => bytes,
        }
    }
}
