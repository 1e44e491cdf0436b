//! Transport Layer for the Message Kernel
//!
//! Provides the connector abstraction the kernel drives:
//! - `Connector`: the polymorphic read/write/close contract
//! - `TlsSocketConnector`: TLS over TCP, single-threaded
//!
//! # Design Philosophy
//!
//! A connector owns exactly one connection and does no buffering, queuing
//! or threading of its own. The OS socket buffers and the TLS record layer
//! are the only buffers between the kernel and the wire.
//!
//! # Security
//!
//! - Only TLS 1.2 and TLS 1.3 are ever offered
//! - Server certificates are verified against the web PKI roots by default
//! - No plaintext fallback

pub mod config;
pub mod tls;
pub mod traits;

// Re-exports for convenience
pub use config::{ConfigError, ConnectorConfig};
pub use tls::{ShutdownHandle, TlsSocketConnector, TlsVersion};
pub use traits::{Connector, ConnectorError, Result};
