//! End-to-end session tests against a scripted peer
//!
//! The peer's side of the conversation is a queue of byte bursts, so the
//! whole handshake runs without a socket: connect, link probe, sign-in,
//! plus the rejection and malformed-reply paths.

use std::collections::VecDeque;

use netnje::codepage::{default_registry, Codepage};
use netnje::config::SessionConfig;
use netnje::error::{HandshakeStage, NjeError, Result};
use netnje::frame;
use netnje::logging::NullSink;
use netnje::records::control::ControlRecord;
use netnje::records::signin::SignInRecord;
use netnje::resolver::FixedResolver;
use netnje::session::{NjeSession, SessionState, LINK_ACK};
use netnje::transport::Transport;

fn page() -> &'static Codepage {
    default_registry().default_page()
}

/// Transport whose inbound side replays scripted bursts
struct ScriptedPeer {
    /// Each entry is one burst that becomes available atomically
    inbound: VecDeque<Vec<u8>>,
    /// Everything the session wrote, one entry per write
    written: Vec<Vec<u8>>,
}

impl ScriptedPeer {
    fn new(bursts: Vec<Vec<u8>>) -> Self {
        Self {
            inbound: bursts.into(),
            written: Vec::new(),
        }
    }
}

impl Transport for ScriptedPeer {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.written.push(buf.to_vec());
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let burst = self.inbound.front_mut().ok_or(NjeError::Transport(
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "script exhausted"),
            ))?;
            let take = burst.len().min(buf.len() - filled);
            buf[filled..filled + take].copy_from_slice(&burst[..take]);
            burst.drain(..take);
            filled += take;
            if burst.is_empty() {
                self.inbound.pop_front();
            }
        }
        Ok(())
    }

    fn data_available(&mut self) -> Result<bool> {
        Ok(!self.inbound.is_empty())
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        Ok(self.inbound.pop_front().unwrap_or_default())
    }
}

fn config() -> SessionConfig {
    let mut config = SessionConfig::new("NETNJE", "FRYJLX1", "peer.example.org", 175);
    config.link_timeout_ms = 50;
    config.poll_interval_ms = 1;
    config
}

fn ack_reply() -> Vec<u8> {
    ControlRecord {
        request_type: "ACK".to_string(),
        sender_node: "FRYJLX1".to_string(),
        sender_addr: 0x0A000001,
        receiver_node: "NETNJE".to_string(),
        receiver_addr: 0,
        reason: 0,
    }
    .to_bytes(page())
}

fn link_ack_block() -> Vec<u8> {
    frame::wrap_for_send(&[LINK_ACK[0], LINK_ACK[1], 0x81, 0x8F, 0xCF])
}

#[test]
fn test_full_handshake_reaches_signed_in() {
    let peer = ScriptedPeer::new(vec![ack_reply(), link_ack_block()]);
    let mut session = NjeSession::new(peer, config(), page(), Box::new(NullSink)).unwrap();
    assert_eq!(session.state(), SessionState::Idle);

    session.connect(&FixedResolver(0x0A000001)).unwrap();
    assert_eq!(session.state(), SessionState::SignedIn);
}

#[test]
fn test_handshake_wire_traffic() {
    let peer = ScriptedPeer::new(vec![ack_reply(), link_ack_block()]);
    let mut session = NjeSession::new(peer, config(), page(), Box::new(NullSink)).unwrap();
    session.connect(&FixedResolver(0x0A000001)).unwrap();

    // Reach into the transport to audit what went on the wire
    let written = {
        let peer = session.into_transport();
        peer.written
    };
    assert_eq!(written.len(), 3);

    // First write: the raw 33-byte OPEN control record
    let open = ControlRecord::parse(&written[0], page()).unwrap();
    assert_eq!(open.request_type, "OPEN");
    assert_eq!(open.sender_node, "NETNJE");
    assert_eq!(open.sender_addr, 0);
    assert_eq!(open.receiver_node, "FRYJLX1");
    assert_eq!(open.receiver_addr, 0x0A000001);
    assert_eq!(open.reason, 0);

    // Second write: the framed SOH/ENQ probe
    let probe = frame::unwrap(&written[1]).unwrap();
    assert_eq!(probe[0].bytes(), &[0x01, 0x2D]);

    // Third write: the framed sign-in record; its node names must decode
    // back to the configured values
    let signin = frame::unwrap(&written[2]).unwrap();
    let bytes = signin[0].bytes();
    // BSC header: DLE STX seq fcb0 fcb1 rcb srcb
    assert_eq!(&bytes[..2], &[0x10, 0x02]);
    assert_eq!(bytes[2], 0x80); // first send uses the idle sequence value
    assert_eq!(bytes[5], 0xF0);
    assert_eq!(bytes[6], 0xC9);
    let record = SignInRecord::parse(&bytes[7..], page()).unwrap();
    assert_eq!(record.local_node, "NETNJE");
    assert_eq!(record.remote_node, "FRYJLX1");
    assert_eq!(record.buffer_size, 8192);
}

#[test]
fn test_non_ack_reply_errors_the_session() {
    let nak = ControlRecord {
        request_type: "NAK".to_string(),
        sender_node: "FRYJLX1".to_string(),
        sender_addr: 0,
        receiver_node: "NETNJE".to_string(),
        receiver_addr: 0,
        reason: 3,
    }
    .to_bytes(page());

    let peer = ScriptedPeer::new(vec![nak]);
    let mut session = NjeSession::new(peer, config(), page(), Box::new(NullSink)).unwrap();
    let err = session.connect(&FixedResolver(0)).unwrap_err();
    match err {
        NjeError::ProtocolRejection { stage, response } => {
            assert_eq!(stage, HandshakeStage::NodeOpen);
            assert_eq!(response, "NAK");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(session.state(), SessionState::Errored);
}

#[test]
fn test_wrong_link_reply_errors_the_session() {
    // NAK-ish link-level answer instead of DLE/ACK0
    let bad_link = frame::wrap_for_send(&[0x15, 0x2D, 0x00]);
    let peer = ScriptedPeer::new(vec![ack_reply(), bad_link]);
    let mut session = NjeSession::new(peer, config(), page(), Box::new(NullSink)).unwrap();
    let err = session.connect(&FixedResolver(0)).unwrap_err();
    assert!(matches!(
        err,
        NjeError::ProtocolRejection { stage: HandshakeStage::LinkProbe, .. }
    ));
    assert_eq!(session.state(), SessionState::Errored);
}

#[test]
fn test_truncated_link_block_is_malformed() {
    let mut block = link_ack_block();
    block.truncate(9);
    let peer = ScriptedPeer::new(vec![ack_reply(), block]);
    let mut session = NjeSession::new(peer, config(), page(), Box::new(NullSink)).unwrap();
    let err = session.connect(&FixedResolver(0)).unwrap_err();
    assert!(matches!(err, NjeError::MalformedInput { .. }));
    assert_eq!(session.state(), SessionState::Errored);
}

#[test]
fn test_link_silence_times_out() {
    let peer = ScriptedPeer::new(vec![ack_reply()]);
    let mut session = NjeSession::new(peer, config(), page(), Box::new(NullSink)).unwrap();
    let err = session.connect(&FixedResolver(0)).unwrap_err();
    assert!(matches!(err, NjeError::LinkTimeout { timeout_ms: 50 }));
    assert_eq!(session.state(), SessionState::Errored);
}

#[test]
fn test_poll_classifies_inbound_records() {
    let heartbeat = frame::wrap_for_send(&[0x10, 0x70, 0x81, 0x8F, 0xCF, 0x00]);
    let peer = ScriptedPeer::new(vec![heartbeat]);
    let mut session = NjeSession::new(peer, config(), page(), Box::new(NullSink)).unwrap();

    let records = session.poll().unwrap();
    assert_eq!(records.len(), 1);
    assert!(matches!(
        records[0],
        netnje::records::InboundRecord::Heartbeat { .. }
    ));

    // Script exhausted: nothing further to report
    assert!(session.poll().unwrap().is_empty());
}

#[test]
fn test_session_reports_progress_to_the_sink() {
    use netnje::logging::{MemorySink, Severity};
    use std::sync::Arc;

    let sink = Arc::new(MemorySink::new());
    let peer = ScriptedPeer::new(vec![ack_reply(), link_ack_block()]);
    let mut session = NjeSession::new(peer, config(), page(), Box::new(Arc::clone(&sink))).unwrap();
    session.connect(&FixedResolver(0)).unwrap();

    let events = sink.events();
    assert!(events
        .iter()
        .any(|(sev, msg)| *sev == Severity::Info && msg.contains("opening link")));
    assert!(events
        .iter()
        .any(|(sev, msg)| *sev == Severity::Info && msg.contains("signed in")));
}

#[test]
fn test_sends_advance_sequence_across_session() {
    let peer = ScriptedPeer::new(vec![ack_reply(), link_ack_block()]);
    let mut session = NjeSession::new(peer, config(), page(), Box::new(NullSink)).unwrap();
    session.connect(&FixedResolver(0)).unwrap();
    // Sign-in consumed 0x80; the next sends use 0x81, 0x82, ...
    assert_eq!(session.sequence(), 0x81);
    session.send(0xF1, 0x00, b"payload", false).unwrap();
    assert_eq!(session.sequence(), 0x82);
}
