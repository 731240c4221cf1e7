//! Command-line entry point for netnje
//!
//! Thin collaborator shell around the library: parses arguments, opens the
//! session, and polls for inbound records until interrupted. All protocol
//! behavior lives in the library modules.

use std::time::Duration;

use anyhow::{bail, Context};

use netnje::codepage;
use netnje::config::SessionConfig;
use netnje::logging::LogCrateSink;
use netnje::records::InboundRecord;
use netnje::resolver::SystemResolver;
use netnje::session::NjeSession;
use netnje::transport::TcpTransport;

fn usage() -> ! {
    eprintln!("Usage: netnje --local NODE --remote NODE --server HOST [--port PORT] [--profile FILE]");
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<SessionConfig> {
    let args: Vec<String> = std::env::args().collect();

    let mut profile: Option<String> = None;
    let mut local: Option<String> = None;
    let mut remote: Option<String> = None;
    let mut server: Option<String> = None;
    let mut port: u16 = netnje::config::DEFAULT_PORT;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--profile" | "-f" => {
                if i + 1 < args.len() {
                    profile = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    usage();
                }
            }
            "--local" | "-l" => {
                if i + 1 < args.len() {
                    local = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    usage();
                }
            }
            "--remote" | "-r" => {
                if i + 1 < args.len() {
                    remote = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    usage();
                }
            }
            "--server" | "-s" => {
                if i + 1 < args.len() {
                    server = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    usage();
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().context("invalid --port value")?;
                    i += 1;
                } else {
                    usage();
                }
            }
            "--help" | "-h" => usage(),
            other => bail!("unknown argument: {}", other),
        }
        i += 1;
    }

    if let Some(path) = profile {
        return SessionConfig::load(&path)
            .with_context(|| format!("loading profile {}", path));
    }

    match (local, remote, server) {
        (Some(local), Some(remote), Some(server)) => {
            Ok(SessionConfig::new(&local, &remote, &server, port))
        }
        _ => usage(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("starting netnje version {}", env!("CARGO_PKG_VERSION"));

    let config = parse_args()?;
    let registry = codepage::default_registry();
    let page = registry
        .get(&config.codepage)
        .with_context(|| format!("unknown code page '{}'", config.codepage))?;

    let transport = TcpTransport::connect(
        &config.host,
        config.port,
        Duration::from_millis(config.link_timeout_ms),
    )
    .with_context(|| format!("connecting to {}:{}", config.host, config.port))?;

    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let mut session = NjeSession::new(transport, config, page, Box::new(LogCrateSink))?;
    session.connect(&SystemResolver)?;
    log::info!("session state: {:?}", session.state());

    loop {
        for record in session.poll()? {
            match record {
                InboundRecord::Heartbeat { .. } => log::debug!("heartbeat"),
                InboundRecord::Structured { sequence, fcs, bytes } => {
                    log::info!(
                        "record seq=0x{:02X} fcs={:02X?} len={}",
                        sequence,
                        fcs,
                        bytes.len()
                    );
                }
                InboundRecord::Unknown { bytes } => {
                    log::warn!("unclassified record: {:02X?}", bytes);
                }
            }
        }
        std::thread::sleep(poll_interval);
    }
}
