//! TLS Socket Connector
//!
//! A straightforward socket-based connector that does not use any separate
//! threading. It relies completely on the buffering in the OS network layer
//! and the TLS record layer.
//!
//! # Lifecycle
//!
//! ```text
//! connect() ──► CONNECTED ──► close() ──────────────► CLOSED
//!                   │                                   ▲
//!                   └── read() sees end-of-stream ──────┘
//! ```
//!
//! `CLOSED` is terminal: every later call fails with
//! [`ConnectorError::Closed`], including a second `close()`.

use std::io::{self, Read, Write};
use std::net::{IpAddr, Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rustls::{ClientConnection, StreamOwned};

use super::client_config::{build_client_config, resolve_server_name, TlsVersion};
use crate::transport::config::ConnectorConfig;
use crate::transport::traits::{Connector, ConnectorError, Result};

/// Size of the scratch buffer every `read` fills
pub const READ_BUFFER_SIZE: usize = 65535;

const READ_CONTEXT: &str = "Error reading from connection to";
const WRITE_CONTEXT: &str = "Error writing to connection";
const AVAILABLE_CONTEXT: &str = "Error retrieving data availability for";
const CLOSE_CONTEXT: &str = "Error closing socket for";
const CLONE_CONTEXT: &str = "Error cloning socket for";

/// Encrypted session plus the socket it runs over
type Session = StreamOwned<ClientConnection, TcpStream>;

/// TLS-over-TCP connector
///
/// Owns one TLS session. Not meant to be shared: every operation that
/// touches the session takes `&mut self`, so callers serialize access by
/// construction. Use a [`ShutdownHandle`] to interrupt a blocked `read`
/// from another thread.
pub struct TlsSocketConnector {
    /// Live session; `None` once closed, never `Some` again
    session: Option<Session>,
    /// Peer endpoint, kept after close for diagnostics
    remote: SocketAddr,
    /// Reused by every read; contents valid until the next read
    buffer: Box<[u8]>,
    /// Cleared by `close()` or a `ShutdownHandle` before the socket goes away
    connected: Arc<AtomicBool>,
}

impl TlsSocketConnector {
    /// Connect to `address:port` with the default configuration
    ///
    /// Trusts the bundled web PKI roots and verifies the certificate against
    /// the IP address.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::Setup`] if the TCP connection or the TLS
    /// handshake fails.
    pub fn connect(address: IpAddr, port: u16) -> Result<Self> {
        Self::connect_with_config(address, port, &ConnectorConfig::default())
    }

    /// Connect to `address:port` using `config`
    ///
    /// Drives the handshake to completion before returning. Nagle's
    /// algorithm is disabled on the socket.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::Setup`] for any failure: invalid
    /// configuration, unreachable peer, handshake or certificate errors.
    pub fn connect_with_config(
        address: IpAddr,
        port: u16,
        config: &ConnectorConfig,
    ) -> Result<Self> {
        let remote = SocketAddr::new(address, port);
        let session = handshake(remote, config).map_err(|e| ConnectorError::setup(remote, e))?;

        let version = session
            .conn
            .protocol_version()
            .and_then(TlsVersion::from_rustls);
        tracing::info!(%remote, version = ?version, "TLS connection established");

        Ok(Self {
            session: Some(session),
            remote,
            buffer: vec![0u8; READ_BUFFER_SIZE].into_boxed_slice(),
            connected: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Remote endpoint this connector was created for
    #[must_use]
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote
    }

    /// Negotiated protocol version, `None` once closed
    #[must_use]
    pub fn protocol_version(&self) -> Option<TlsVersion> {
        self.session
            .as_ref()?
            .conn
            .protocol_version()
            .and_then(TlsVersion::from_rustls)
    }

    /// Check if the connection is still up
    ///
    /// Never fails. `false` after close; otherwise asks the socket.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        match &self.session {
            Some(session) => {
                self.connected.load(Ordering::SeqCst) && session.sock.peer_addr().is_ok()
            }
            None => false,
        }
    }

    /// Check whether a `read` would return data without blocking
    ///
    /// Pulls any TLS records the OS has already received into the session
    /// but never consumes decrypted bytes.
    ///
    /// # Errors
    ///
    /// [`ConnectorError::Closed`] after close, [`ConnectorError::Io`] if the
    /// socket or the TLS layer fails during the probe.
    pub fn available(&mut self) -> Result<bool> {
        let remote = self.remote;
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| ConnectorError::closed(remote))?;

        probe_available(session).map_err(|e| ConnectorError::io(AVAILABLE_CONTEXT, remote, e))
    }

    /// Read one chunk, blocking until at least one byte arrives
    ///
    /// - `Ok(Some(bytes))`: a view of the scratch buffer, valid until the
    ///   next call on this connector
    /// - `Ok(None)`: the peer closed the connection (the connector closes
    ///   itself), or the read failed after a local shutdown
    ///
    /// # Errors
    ///
    /// [`ConnectorError::Closed`] after close, [`ConnectorError::Io`] on a
    /// transport fault while still connected.
    pub fn read(&mut self) -> Result<Option<&[u8]>> {
        let Some(session) = self.session.as_mut() else {
            return Err(ConnectorError::closed(self.remote));
        };

        match session.read(&mut self.buffer) {
            Ok(0) => {
                self.close_at_end_of_stream();
                Ok(None)
            }
            Ok(count) => Ok(Some(&self.buffer[..count])),
            Err(e) if !self.connected.load(Ordering::SeqCst) => {
                tracing::debug!(remote = %self.remote, error = %e, "Read failed after local shutdown");
                Ok(None)
            }
            // Peer dropped TCP without close_notify; no more bytes will come either way
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.close_at_end_of_stream();
                Ok(None)
            }
            Err(e) => Err(ConnectorError::io(READ_CONTEXT, self.remote, e)),
        }
    }

    /// Write all of `data` in one blocking call
    ///
    /// The TLS records are flushed to the socket before returning. There is
    /// no partial-write recovery.
    ///
    /// # Errors
    ///
    /// [`ConnectorError::Closed`] after close, [`ConnectorError::Io`] if the
    /// write fails; the connection should then be considered dead.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        let remote = self.remote;
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| ConnectorError::closed(remote))?;

        session
            .write_all(data)
            .and_then(|()| session.flush())
            .map_err(|e| ConnectorError::io(WRITE_CONTEXT, remote, e))
    }

    /// Close the connection
    ///
    /// The connector is marked closed before the socket is touched, so a
    /// failure while sending `close_notify` or shutting down still leaves it
    /// closed.
    ///
    /// # Errors
    ///
    /// [`ConnectorError::Closed`] if already closed, [`ConnectorError::Io`]
    /// if releasing the socket fails.
    pub fn close(&mut self) -> Result<()> {
        let mut session = self
            .session
            .take()
            .ok_or_else(|| ConnectorError::closed(self.remote))?;
        self.connected.store(false, Ordering::SeqCst);

        tracing::info!(remote = %self.remote, "Closing TLS connection");

        shutdown_session(&mut session)
            .map_err(|e| ConnectorError::io(CLOSE_CONTEXT, self.remote, e))
    }

    /// Get a handle that can shut the socket down from another thread
    ///
    /// Shutting down through the handle marks the connector disconnected
    /// first, so a `read` blocked on this connector returns `Ok(None)`
    /// instead of an error. The owner still calls `close()` afterwards.
    ///
    /// # Errors
    ///
    /// [`ConnectorError::Closed`] after close, [`ConnectorError::Io`] if
    /// the socket cannot be duplicated.
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| ConnectorError::closed(self.remote))?;

        let sock = session
            .sock
            .try_clone()
            .map_err(|e| ConnectorError::io(CLONE_CONTEXT, self.remote, e))?;

        Ok(ShutdownHandle {
            sock,
            remote: self.remote,
            connected: Arc::clone(&self.connected),
        })
    }

    fn close_at_end_of_stream(&mut self) {
        tracing::debug!(remote = %self.remote, "Peer closed connection");
        if let Err(e) = self.close() {
            tracing::warn!(remote = %self.remote, error = %e, "Close after end-of-stream failed");
        }
    }
}

impl Connector for TlsSocketConnector {
    fn is_connected(&self) -> bool {
        TlsSocketConnector::is_connected(self)
    }

    fn close(&mut self) -> Result<()> {
        TlsSocketConnector::close(self)
    }

    fn available(&mut self) -> Result<bool> {
        TlsSocketConnector::available(self)
    }

    fn read(&mut self) -> Result<Option<&[u8]>> {
        TlsSocketConnector::read(self)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        TlsSocketConnector::write(self, data)
    }
}

impl std::fmt::Debug for TlsSocketConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsSocketConnector")
            .field("remote", &self.remote)
            .field("closed", &self.session.is_none())
            .field("connected", &self.connected.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Shuts a connector's socket down from outside the owning thread
#[derive(Debug)]
pub struct ShutdownHandle {
    sock: TcpStream,
    remote: SocketAddr,
    connected: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Mark the connector disconnected and shut both socket directions
    ///
    /// # Errors
    ///
    /// Returns the socket error if the shutdown call fails. The connector
    /// is marked disconnected regardless.
    pub fn shutdown(&self) -> io::Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        tracing::debug!(remote = %self.remote, "Shutting down socket via handle");
        self.sock.shutdown(Shutdown::Both)
    }
}

fn handshake(remote: SocketAddr, config: &ConnectorConfig) -> io::Result<Session> {
    let client_config = build_client_config(config)?;
    let server_name = resolve_server_name(remote.ip(), config)?;

    let mut sock = match config.connect_timeout() {
        Some(timeout) => TcpStream::connect_timeout(&remote, timeout)?,
        None => TcpStream::connect(remote)?,
    };
    sock.set_nodelay(true)?;
    sock.set_read_timeout(config.read_timeout())?;
    sock.set_write_timeout(config.write_timeout())?;

    let mut conn = ClientConnection::new(client_config, server_name)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    while conn.is_handshaking() {
        conn.complete_io(&mut sock)?;
    }
    while conn.wants_write() {
        conn.write_tls(&mut sock)?;
    }

    Ok(StreamOwned::new(conn, sock))
}

fn shutdown_session(session: &mut Session) -> io::Result<()> {
    session.conn.send_close_notify();
    while session.conn.wants_write() {
        session.conn.write_tls(&mut session.sock)?;
    }
    session.sock.shutdown(Shutdown::Both)
}

fn probe_available(session: &mut Session) -> io::Result<bool> {
    if buffered_plaintext(&mut session.conn)? > 0 {
        return Ok(true);
    }

    session.sock.set_nonblocking(true)?;
    let drained = drain_ready_records(session);
    // Always restore blocking mode; a drain failure takes precedence
    let restored = session.sock.set_nonblocking(false);
    drained?;
    restored?;

    Ok(buffered_plaintext(&mut session.conn)? > 0)
}

/// Feed every TLS record the OS already holds into the session
///
/// Socket must be non-blocking.
fn drain_ready_records(session: &mut Session) -> io::Result<()> {
    while session.conn.wants_read() {
        match session.conn.read_tls(&mut session.sock) {
            Ok(0) => break,
            Ok(_) => {
                buffered_plaintext(&mut session.conn)?;
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn buffered_plaintext(conn: &mut ClientConnection) -> io::Result<usize> {
    conn.process_new_packets()
        .map(|state| state.plaintext_bytes_to_read())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
