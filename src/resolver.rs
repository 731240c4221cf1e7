//! Node address resolution
//!
//! Control records carry node addresses as network-order 32-bit IPv4
//! values. The session gets those from an injected resolver so tests never
//! touch DNS: dotted-quad strings parse directly, anything else goes
//! through the platform resolver and the first IPv4 address wins.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};

use crate::error::{NjeError, Result};

/// Converts a host string into the 32-bit address the wire format wants
pub trait NodeResolver {
    fn resolve(&self, host: &str) -> Result<u32>;
}

/// Resolver backed by the platform's name service
pub struct SystemResolver;

impl NodeResolver for SystemResolver {
    fn resolve(&self, host: &str) -> Result<u32> {
        if let Ok(addr) = host.parse::<Ipv4Addr>() {
            return Ok(u32::from(addr));
        }

        // Port 0 is a placeholder; only the address part is used
        let addrs = (host, 0u16)
            .to_socket_addrs()
            .map_err(NjeError::Transport)?;
        for addr in addrs {
            if let SocketAddr::V4(v4) = addr {
                return Ok(u32::from(*v4.ip()));
            }
        }
        Err(NjeError::Transport(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no IPv4 address for host '{}'", host),
        )))
    }
}

/// Resolver returning one fixed address, for tests and canned setups
pub struct FixedResolver(pub u32);

impl NodeResolver for FixedResolver {
    fn resolve(&self, _host: &str) -> Result<u32> {
        Ok(self.0)
    }
}
