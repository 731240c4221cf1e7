//! String-control-byte (SCB) run-length compression
//!
//! The payload codec used to shrink application records before framing.
//! Output is a sequence of runs, each introduced by one control byte:
//!
//! - `0x80 | n` (n = 1..31): n blank bytes, nothing follows
//! - `0xA0 | n` (n = 2..31): n copies of the literal byte that follows
//! - `0xC0 | n` (n = 1..63): n verbatim bytes follow
//! - `0x00`: end of data
//!
//! Compression is best-effort and never fails on valid input. One call
//! consumes at most [`MAX_CHUNK`] input bytes; the caller re-invokes on the
//! remainder and prefixes each continuation with the record-type/subtype
//! pair of the first chunk. All buffers are sized from the input, so there
//! is no fixed-capacity working buffer to overflow.

use crate::error::{NjeError, Result};

/// Most input bytes one compression call will consume
pub const MAX_CHUNK: usize = 253;

/// Longest blank run one control byte can describe
const BLANK_RUN_MAX: usize = 31;
/// Longest repeat run one control byte can describe
const REPEAT_RUN_MAX: usize = 31;
/// Longest literal run one control byte can describe
const LITERAL_RUN_MAX: usize = 63;

/// End-of-data control byte
const SCB_END: u8 = 0x00;

/// Outcome of one compression call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    /// The encoded runs for the consumed prefix of the input
    pub output: Vec<u8>,
    /// Input bytes consumed by this call (at most [`MAX_CHUNK`])
    pub consumed: usize,
    /// Input bytes left for a follow-up call
    pub remaining: usize,
}

fn flush_literal(out: &mut Vec<u8>, literal: &mut Vec<u8>) {
    if !literal.is_empty() {
        out.push(0xC0 | literal.len() as u8);
        out.extend_from_slice(literal);
        literal.clear();
    }
}

/// Compresses up to [`MAX_CHUNK`] bytes of `input` in a single
/// left-to-right pass. `blank` is the active code page's blank byte.
///
/// Policy at each position: two consecutive blanks start a blank run,
/// three consecutive equal bytes start a repeat run, everything else
/// accumulates in a pending literal run. The literal run flushes before
/// any blank/repeat run, at 63 bytes, and at end of input.
pub fn compress(input: &[u8], blank: u8) -> Compressed {
    let budget = input.len().min(MAX_CHUNK);
    let mut out = Vec::with_capacity(budget + budget / LITERAL_RUN_MAX + 1);
    let mut literal: Vec<u8> = Vec::with_capacity(LITERAL_RUN_MAX);
    let mut pos = 0;

    while pos < budget {
        let byte = input[pos];
        if byte == blank && pos + 1 < budget && input[pos + 1] == blank {
            flush_literal(&mut out, &mut literal);
            let mut run = 0;
            while pos < budget && input[pos] == blank && run < BLANK_RUN_MAX {
                run += 1;
                pos += 1;
            }
            out.push(0x80 | run as u8);
        } else if pos + 2 < budget && input[pos + 1] == byte && input[pos + 2] == byte {
            flush_literal(&mut out, &mut literal);
            let mut run = 0;
            while pos < budget && input[pos] == byte && run < REPEAT_RUN_MAX {
                run += 1;
                pos += 1;
            }
            out.push(0xA0 | run as u8);
            out.push(byte);
        } else {
            literal.push(byte);
            pos += 1;
            if literal.len() == LITERAL_RUN_MAX {
                flush_literal(&mut out, &mut literal);
            }
        }
    }
    flush_literal(&mut out, &mut literal);

    Compressed {
        output: out,
        consumed: budget,
        remaining: input.len() - budget,
    }
}

/// Structural inverse of [`compress`]. Reads runs until the encoded bytes
/// are consumed or the end-of-data control byte appears. Fails only on
/// truncated runs or control bytes outside the SCB alphabet.
pub fn decompress(data: &[u8], blank: u8) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut pos = 0;

    while pos < data.len() {
        let control = data[pos];
        pos += 1;

        if control & 0xC0 == 0xC0 {
            let count = (control & 0x3F) as usize;
            if pos + count > data.len() {
                return Err(NjeError::MalformedInput {
                    context: "SCB literal run",
                    expected: count,
                    actual: data.len() - pos,
                });
            }
            out.extend_from_slice(&data[pos..pos + count]);
            pos += count;
        } else if control & 0x80 != 0 {
            let count = (control & 0x1F) as usize;
            if control & 0x20 != 0 {
                // Repeat run: one literal byte follows
                let Some(&value) = data.get(pos) else {
                    return Err(NjeError::MalformedInput {
                        context: "SCB repeat run",
                        expected: 1,
                        actual: 0,
                    });
                };
                pos += 1;
                out.resize(out.len() + count, value);
            } else {
                out.resize(out.len() + count, blank);
            }
        } else if control == SCB_END {
            break;
        } else {
            return Err(NjeError::MalformedInput {
                context: "SCB control byte",
                expected: 0x80,
                actual: control as usize,
            });
        }
    }

    Ok(out)
}
