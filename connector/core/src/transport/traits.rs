//! Connector Traits
//!
//! The contract the kernel uses to drive any transport, and the single
//! error type every connector reports through.
//!
//! Errors fall into three groups:
//! - `Setup`: the connection never became usable
//! - `Closed`: the connector was already closed (including double close)
//! - `Io`: a transport fault on a live connection; the connector is dead
//!
//! An orderly close by the peer is not an error: `read` returns `Ok(None)`.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Result alias used throughout the connector API
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Errors raised by a connector
///
/// Every variant names the remote endpoint. Underlying causes are kept as
/// `std::io::Error` in the source chain so no transport-library type leaks
/// into the public surface.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Establishing the encrypted session failed
    #[error("Failed to establish TLS connection to {remote}")]
    Setup {
        /// Endpoint we tried to reach
        remote: SocketAddr,
        /// What went wrong (connect, handshake, trust)
        source: io::Error,
    },

    /// The connector has already been closed
    #[error("Connection is closed: {remote}")]
    Closed {
        /// Endpoint the connector was attached to
        remote: SocketAddr,
    },

    /// Transport failure on a live connection
    #[error("{context}: {remote}")]
    Io {
        /// Which operation failed
        context: &'static str,
        /// Endpoint the connector is attached to
        remote: SocketAddr,
        /// The underlying I/O error
        source: io::Error,
    },
}

impl ConnectorError {
    pub(crate) fn setup(remote: SocketAddr, source: io::Error) -> Self {
        Self::Setup { remote, source }
    }

    pub(crate) fn closed(remote: SocketAddr) -> Self {
        Self::Closed { remote }
    }

    pub(crate) fn io(context: &'static str, remote: SocketAddr, source: io::Error) -> Self {
        Self::Io {
            context,
            remote,
            source,
        }
    }

    /// Whether this error means the connector was used after `close()`
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    /// The remote endpoint the failing connector was attached to
    #[must_use]
    pub fn remote(&self) -> SocketAddr {
        match self {
            Self::Setup { remote, .. } | Self::Closed { remote } | Self::Io { remote, .. } => {
                *remote
            }
        }
    }
}

/// Bidirectional byte connector driven by the kernel
///
/// Implementations own one connection. Byte boundaries returned by `read`
/// carry no message meaning; framing is the caller's job.
///
/// All methods run on the caller's thread. `read` and `write` block,
/// `available` never does.
pub trait Connector: Send {
    /// Check if the connection is still up
    ///
    /// Never fails; returns `false` once closed.
    fn is_connected(&self) -> bool;

    /// Close the connection
    ///
    /// Fails with [`ConnectorError::Closed`] when called a second time.
    fn close(&mut self) -> Result<()>;

    /// Check whether data can be read without blocking
    ///
    /// Does not consume anything.
    fn available(&mut self) -> Result<bool>;

    /// Read whatever is available, blocking until at least one byte arrives
    ///
    /// Returns `Ok(None)` when the peer has closed the connection. The
    /// returned slice borrows the connector's internal buffer and is only
    /// valid until the next call.
    fn read(&mut self) -> Result<Option<&[u8]>>;

    /// Write all of `data` to the connection
    fn write(&mut self, data: &[u8]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::net::{Ipv4Addr, SocketAddrV4};

    use super::*;

    fn remote() -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 9443))
    }

    #[test]
    fn test_closed_error_display() {
        let err = ConnectorError::closed(remote());
        assert_eq!(err.to_string(), "Connection is closed: 127.0.0.1:9443");
        assert!(err.is_closed());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_setup_error_keeps_cause() {
        let cause = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let err = ConnectorError::setup(remote(), cause);

        // Cause lives in the source chain only, not repeated in the message
        assert_eq!(
            err.to_string(),
            "Failed to establish TLS connection to 127.0.0.1:9443"
        );
        assert!(!err.is_closed());

        let source = err.source().expect("setup error has a source");
        let io_err = source.downcast_ref::<io::Error>().expect("io::Error source");
        assert_eq!(io_err.kind(), io::ErrorKind::ConnectionRefused);
    }

    #[test]
    fn test_io_error_context_and_remote() {
        let cause = io::Error::new(io::ErrorKind::BrokenPipe, "pipe");
        let err = ConnectorError::io("Error writing to connection", remote(), cause);

        assert_eq!(err.to_string(), "Error writing to connection: 127.0.0.1:9443");
        assert_eq!(err.remote(), remote());
        assert!(err.source().is_some());
    }
}
