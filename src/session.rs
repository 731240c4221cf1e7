//! NJE connection state machine
//!
//! One `NjeSession` owns one transport and drives the whole lifecycle:
//! the raw node-open exchange, the framed link-level probe, sign-in, and
//! then application-record send/poll. The caller serializes all
//! operations; the only suspending call is the bounded link-level wait
//! inside `connect`, every other operation returns without blocking on
//! inbound data.
//!
//! State flow: `Idle → LinkRequested → LinkEstablished → SignedIn`, with
//! `Errored` reachable from any handshake step. The peer's literal
//! response is preserved in the error when it rejects us.

use std::thread;
use std::time::{Duration, Instant};

use crate::codepage::Codepage;
use crate::config::SessionConfig;
use crate::error::{HandshakeStage, NjeError, Result};
use crate::frame;
use crate::logging::{LogSink, Severity};
use crate::records::{ControlRecord, InboundRecord, SignInRecord};
use crate::records::control::CONTROL_RECORD_LEN;
use crate::resolver::NodeResolver;
use crate::scb;
use crate::transport::Transport;

/// BSC data-link-escape byte, leads every record header
pub const DLE: u8 = 0x10;
/// BSC start-of-text byte
pub const STX: u8 = 0x02;
/// BSC start-of-header byte
pub const SOH: u8 = 0x01;
/// BSC enquiry byte
pub const ENQ: u8 = 0x2D;
/// BSC acknowledgement byte (ACK0)
pub const ACK0: u8 = 0x70;

/// The 2-byte link-level probe sent after a successful node open
pub const LINK_PROBE: [u8; 2] = [SOH, ENQ];
/// The 2-byte pattern an accepting peer answers the probe with
pub const LINK_ACK: [u8; 2] = [DLE, ACK0];

/// Record control byte for control records
pub const RCB_CONTROL: u8 = 0xF0;
/// Sub-record control byte for the initial sign-in
pub const SRCB_SIGNIN: u8 = 0xC9;

/// Sequence counter value before the first send; never reproduced by the
/// advance rule
const SEQUENCE_IDLE: u8 = 0x80;
/// Function-control byte pair fixed at sign-in (all streams enabled)
const DEFAULT_FCS: [u8; 2] = [0x8F, 0xCF];

/// Lifecycle states of one logical connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, nothing sent yet
    Idle,
    /// Node open acknowledged, link probe in flight
    LinkRequested,
    /// Link-level acknowledgement received
    LinkEstablished,
    /// Sign-in sent; application records may flow
    SignedIn,
    /// A handshake exchange failed; the session is unusable
    Errored,
}

/// Pure decision for the node-open reply: Ok to proceed, or the peer's
/// literal request type as the rejection reason.
pub fn classify_control_reply(reply: &ControlRecord) -> std::result::Result<(), String> {
    if reply.is_ack() {
        Ok(())
    } else {
        Err(reply.request_type.clone())
    }
}

/// Pure decision for the link-level reply: the first extracted record must
/// begin with the DLE/ACK0 pattern. Anything else is reported verbatim.
pub fn classify_link_reply(first: Option<&InboundRecord>) -> std::result::Result<(), String> {
    match first {
        Some(record) if record.bytes().len() >= 2 && record.bytes()[..2] == LINK_ACK => Ok(()),
        Some(record) => Err(format!("{:02X?}", record.bytes())),
        None => Err("empty block".to_string()),
    }
}

/// One logical NJE connection over an exclusively owned transport
pub struct NjeSession<'a, T: Transport> {
    transport: T,
    config: SessionConfig,
    page: &'a Codepage,
    sink: Box<dyn LogSink>,
    state: SessionState,
    sequence: u8,
    fcs: [u8; 2],
}

impl<'a, T: Transport> NjeSession<'a, T> {
    /// Builds a session around an already-open transport. The code page
    /// comes from the shared registry; the sink receives every log event
    /// the session emits.
    pub fn new(
        transport: T,
        config: SessionConfig,
        page: &'a Codepage,
        sink: Box<dyn LogSink>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transport,
            config,
            page,
            sink,
            state: SessionState::Idle,
            sequence: SEQUENCE_IDLE,
            fcs: DEFAULT_FCS,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current outbound sequence byte (0x80 until the first send)
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Consumes the session and hands back its transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Runs the full handshake: node open, link probe, sign-in. On success
    /// the session is `SignedIn`; on a peer rejection it is `Errored` and
    /// the error carries the peer's literal response.
    pub fn connect(&mut self, resolver: &dyn NodeResolver) -> Result<()> {
        let sender_addr = match &self.config.local_host {
            Some(host) => resolver.resolve(host)?,
            None => 0,
        };
        let receiver_addr = resolver.resolve(&self.config.host)?;

        self.sink.log(
            Severity::Info,
            &format!(
                "opening link {} -> {} ({}:{})",
                self.config.local_node, self.config.remote_node, self.config.host, self.config.port
            ),
        );

        let open = ControlRecord::open(
            &self.config.local_node,
            sender_addr,
            &self.config.remote_node,
            receiver_addr,
        );
        self.transport.write_all(&open.to_bytes(self.page))?;

        // The peer answers with exactly one raw control record
        let mut reply = [0u8; CONTROL_RECORD_LEN];
        self.transport.read_exact(&mut reply)?;
        let reply = ControlRecord::parse(&reply, self.page).map_err(|e| {
            self.state = SessionState::Errored;
            e
        })?;

        if let Err(response) = classify_control_reply(&reply) {
            self.state = SessionState::Errored;
            self.sink.log(
                Severity::Error,
                &format!("node open rejected: {} (reason {})", response, reply.reason),
            );
            return Err(NjeError::ProtocolRejection {
                stage: HandshakeStage::NodeOpen,
                response,
            });
        }
        self.state = SessionState::LinkRequested;
        self.sink.log(Severity::Debug, "node open acknowledged, probing link level");

        self.transport.write_all(&frame::wrap_for_send(&LINK_PROBE))?;
        let inbound = self.wait_for_inbound()?;
        let records = frame::unwrap(&inbound).map_err(|e| {
            self.state = SessionState::Errored;
            e
        })?;

        if let Err(response) = classify_link_reply(records.first()) {
            self.state = SessionState::Errored;
            self.sink.log(Severity::Error, &format!("link probe rejected: {}", response));
            return Err(NjeError::ProtocolRejection {
                stage: HandshakeStage::LinkProbe,
                response,
            });
        }
        self.state = SessionState::LinkEstablished;
        self.sink.log(Severity::Debug, "link established");

        self.sign_in()
    }

    /// Sends the sign-in record and fixes the function-control byte pair
    /// for everything that follows.
    pub fn sign_in(&mut self) -> Result<()> {
        let record = SignInRecord::new(
            &self.config.local_node,
            &self.config.remote_node,
            self.config.buffer_size,
        );
        self.fcs = DEFAULT_FCS;
        // Sent uncompressed so the fixed-offset layout lands on the wire
        // exactly as serialized
        self.send(RCB_CONTROL, SRCB_SIGNIN, &record.to_bytes(self.page), false)?;
        self.state = SessionState::SignedIn;
        self.sink.log(
            Severity::Info,
            &format!(
                "signed in to {} (buffer size {})",
                self.config.remote_node, self.config.buffer_size
            ),
        );
        Ok(())
    }

    /// Sends one application record. The BSC header carries the current
    /// sequence byte and the negotiated function-control pair; the counter
    /// advances after the write. With `compress` set the payload is SCB
    /// compressed in 253-byte chunks, each chunk prefixed with the same
    /// type/subtype pair.
    pub fn send(&mut self, rcb: u8, srcb: u8, payload: &[u8], compress: bool) -> Result<()> {
        let mut record = Vec::with_capacity(7 + payload.len());
        record.extend_from_slice(&[DLE, STX, self.sequence, self.fcs[0], self.fcs[1]]);

        if compress {
            let blank = self.page.blank();
            let mut rest = payload;
            loop {
                let chunk = scb::compress(rest, blank);
                record.push(rcb);
                record.push(srcb);
                record.extend_from_slice(&chunk.output);
                rest = &rest[chunk.consumed..];
                if chunk.remaining == 0 {
                    break;
                }
            }
        } else {
            record.push(rcb);
            record.push(srcb);
            record.extend_from_slice(payload);
        }

        self.transport.write_all(&frame::wrap_for_send(&record))?;
        self.advance_sequence();
        Ok(())
    }

    /// Non-blocking check for inbound records. Returns an empty vector
    /// when nothing is waiting.
    pub fn poll(&mut self) -> Result<Vec<InboundRecord>> {
        if !self.transport.data_available()? {
            return Ok(Vec::new());
        }
        let bytes = self.transport.read_available()?;
        frame::unwrap(&bytes)
    }

    /// 4-bit rolling counter with the high bit always set: 0x81..0x8F then
    /// back to 0x81. The idle value 0x80 is never reproduced.
    fn advance_sequence(&mut self) {
        let next = (self.sequence & 0x0F) + 1;
        self.sequence = 0x80 | if next == 0x10 { 0x01 } else { next };
    }

    /// Bounded wait for the link-level reply: checks availability at the
    /// configured interval until the timeout elapses.
    fn wait_for_inbound(&mut self) -> Result<Vec<u8>> {
        let deadline = Instant::now() + Duration::from_millis(self.config.link_timeout_ms);
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        loop {
            if self.transport.data_available()? {
                return self.transport.read_available();
            }
            if Instant::now() >= deadline {
                self.state = SessionState::Errored;
                return Err(NjeError::LinkTimeout {
                    timeout_ms: self.config.link_timeout_ms,
                });
            }
            thread::sleep(interval);
        }
    }
}
