use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};

/// A connected byte stream to an OVP8xx device — implements Read + Write.
///
/// The stream is exclusively owned by the caller for the connection's
/// lifetime. There is no reconnection logic at this layer; once a read or
/// write fails the caller decides whether to dial again.
pub struct DeviceStream {
    inner: TcpStream,
    addr: SocketAddr,
}

impl DeviceStream {
    /// Connect to `host:port` (blocking).
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let stream = TcpStream::connect((host, port)).map_err(|e| TransportError::Connect {
            addr: addr.clone(),
            source: e,
        })?;
        Self::from_stream(stream)
    }

    /// Connect to `host:port`, giving up after `timeout`.
    ///
    /// `TcpStream::connect_timeout` requires a resolved address, so name
    /// resolution happens here and only the first resolved address is tried.
    pub fn connect_with_timeout(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let resolved = (host, port)
            .to_socket_addrs()
            .map_err(|e| TransportError::Connect {
                addr: addr.clone(),
                source: e,
            })?
            .next()
            .ok_or_else(|| TransportError::Resolve { addr: addr.clone() })?;
        let stream =
            TcpStream::connect_timeout(&resolved, timeout).map_err(|e| TransportError::Connect {
                addr: addr.clone(),
                source: e,
            })?;
        Self::from_stream(stream)
    }

    fn from_stream(stream: TcpStream) -> Result<Self> {
        let addr = stream.peer_addr()?;
        debug!(%addr, "connected to device");
        Ok(Self {
            inner: stream,
            addr,
        })
    }

    /// The remote address this stream is connected to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_read_timeout(timeout).map_err(Into::into)
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_write_timeout(timeout).map_err(Into::into)
    }

    /// Try to clone this stream (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        let cloned = self.inner.try_clone()?;
        Ok(Self {
            inner: cloned,
            addr: self.addr,
        })
    }

    /// Shut down both halves of the connection.
    pub fn shutdown(&self) -> Result<()> {
        self.inner
            .shutdown(std::net::Shutdown::Both)
            .map_err(Into::into)
    }
}

impl Read for DeviceStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for DeviceStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl std::fmt::Debug for DeviceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStream")
            .field("addr", &self.addr)
            .finish()
    }
}
