//! Block and record envelopes (FrameCodec)
//!
//! Every transport write after the raw node-open exchange carries one outer
//! "block" wrapping one or more inner "records". Both envelopes use
//! big-endian 16-bit lengths:
//!
//! - inner record: `[0x00 0x00][len = 4 + payload]` + payload + 1 zero pad
//! - outer block:  `[0x00 0x00][len = 12 + payload][0x00 x4]` + records
//!   + 4 zero pads
//!
//! The length fields never count the pad bytes. Payload content above the
//! BSC record header is opaque here; extraction classifies each record by
//! length only.

use crate::error::{NjeError, Result};
use crate::records::InboundRecord;

/// Size of the outer block header
const BLOCK_HEADER_LEN: usize = 8;
/// Zero padding closing every block
const BLOCK_PAD_LEN: usize = 4;
/// Size of the inner record sub-header
const RECORD_HEADER_LEN: usize = 4;
/// Smallest parseable block: header, one empty record, trailing pads
const MIN_BLOCK_LEN: usize = BLOCK_HEADER_LEN + RECORD_HEADER_LEN + 1 + BLOCK_PAD_LEN;

/// Wraps one payload as a single inner record inside a single block,
/// ready for a transport write.
pub fn wrap_for_send(payload: &[u8]) -> Vec<u8> {
    let record_len = (RECORD_HEADER_LEN + payload.len()) as u16;
    let block_len = (BLOCK_HEADER_LEN + RECORD_HEADER_LEN + payload.len()) as u16;

    let mut out = Vec::with_capacity(MIN_BLOCK_LEN + payload.len());
    // Outer block header
    out.extend_from_slice(&[0x00, 0x00]);
    out.extend_from_slice(&block_len.to_be_bytes());
    out.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    // Inner record
    out.extend_from_slice(&[0x00, 0x00]);
    out.extend_from_slice(&record_len.to_be_bytes());
    out.extend_from_slice(payload);
    out.push(0x00);
    // Block trailer
    out.extend_from_slice(&[0x00; BLOCK_PAD_LEN]);
    out
}

/// Strips the block envelope and splits the body into classified records.
///
/// After removing the 8-byte header and the 4 trailing pad bytes, the body
/// is a run of `[0x00 0x00][len]` sub-headers, each record followed by its
/// own pad byte. A sub-record whose declared length plus that pad byte
/// exactly accounts for the remaining bytes is the last one in the block.
pub fn unwrap(block: &[u8]) -> Result<Vec<InboundRecord>> {
    if block.len() < MIN_BLOCK_LEN {
        return Err(NjeError::MalformedInput {
            context: "block envelope",
            expected: MIN_BLOCK_LEN,
            actual: block.len(),
        });
    }

    let body = &block[BLOCK_HEADER_LEN..block.len() - BLOCK_PAD_LEN];
    let mut records = Vec::new();
    let mut pos = 0;

    while pos < body.len() {
        if pos + RECORD_HEADER_LEN > body.len() {
            return Err(NjeError::MalformedInput {
                context: "record sub-header",
                expected: RECORD_HEADER_LEN,
                actual: body.len() - pos,
            });
        }
        let declared = u16::from_be_bytes([body[pos + 2], body[pos + 3]]) as usize;
        if declared < RECORD_HEADER_LEN {
            return Err(NjeError::MalformedInput {
                context: "record length field",
                expected: RECORD_HEADER_LEN,
                actual: declared,
            });
        }
        // declared counts sub-header + payload; the record's pad byte is
        // one more on the wire
        if pos + declared + 1 > body.len() {
            return Err(NjeError::MalformedInput {
                context: "record payload",
                expected: declared + 1,
                actual: body.len() - pos,
            });
        }
        let payload = body[pos + RECORD_HEADER_LEN..pos + declared].to_vec();
        records.push(InboundRecord::classify(payload));
        pos += declared + 1;
    }

    Ok(records)
}
