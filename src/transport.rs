//! Byte-stream transport seam
//!
//! The session owns exactly one transport and is the only reader and
//! writer on it. The trait keeps the session testable against a scripted
//! peer; `TcpTransport` is the production implementation over
//! `std::net::TcpStream`.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{NjeError, Result};

/// Read chunk size used when draining everything currently available
const READ_CHUNK: usize = 4096;

/// A reliable, ordered byte stream the session can drive synchronously
pub trait Transport {
    /// Writes the whole buffer or fails
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;
    /// Blocks until exactly `buf.len()` bytes have been read
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;
    /// True when at least one byte can be read without blocking
    fn data_available(&mut self) -> Result<bool>;
    /// Drains and returns every byte currently readable without blocking
    fn read_available(&mut self) -> Result<Vec<u8>>;
}

/// TCP transport with connect/read/write timeouts
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connects to `host:port` within `connect_timeout` and applies the
    /// same bound to blocking reads and writes.
    pub fn connect(host: &str, port: u16, connect_timeout: Duration) -> Result<Self> {
        let address = format!("{}:{}", host, port);
        let mut addrs = address.to_socket_addrs().map_err(NjeError::Transport)?;
        let addr = addrs.next().ok_or_else(|| {
            NjeError::Transport(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no socket addresses resolved for {}", address),
            ))
        })?;

        let stream = TcpStream::connect_timeout(&addr, connect_timeout)?;
        stream.set_read_timeout(Some(connect_timeout))?;
        stream.set_write_timeout(Some(connect_timeout))?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }
}

impl Transport for TcpTransport {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        Write::write_all(&mut self.stream, buf)?;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        Read::read_exact(&mut self.stream, buf)?;
        Ok(())
    }

    fn data_available(&mut self) -> Result<bool> {
        self.stream.set_nonblocking(true)?;
        let mut probe = [0u8; 1];
        let outcome = self.stream.peek(&mut probe);
        self.stream.set_nonblocking(false)?;
        match outcome {
            Ok(0) => Err(NjeError::Transport(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "peer closed the connection",
            ))),
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
            Err(e) => Err(NjeError::Transport(e)),
        }
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.stream.set_nonblocking(true)?;
        let mut chunk = [0u8; READ_CHUNK];
        let result = loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    if out.is_empty() {
                        break Err(NjeError::Transport(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "peer closed the connection",
                        )));
                    }
                    break Ok(());
                }
                Ok(n) => out.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break Ok(()),
                Err(e) => break Err(NjeError::Transport(e)),
            }
        };
        self.stream.set_nonblocking(false)?;
        result.map(|_| out)
    }
}
