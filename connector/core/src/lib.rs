//! Secure Connector - TLS transport endpoint for the message kernel
//!
//! This crate provides the encrypted "connector" used by the networking
//! kernel: one TLS-protected TCP connection exposed through a small,
//! synchronous read/write contract. Message framing, dispatch and thread
//! management all live above it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Kernel / message framing                     │
//! │        (polls available(), read(), write(), close())         │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │  dyn Connector
//! ┌──────────────────────────────┼───────────────────────────────┐
//! │                     SECURE CONNECTOR                         │
//! │  ┌───────────────────────────┴────────────────────────────┐  │
//! │  │                  TlsSocketConnector                    │  │
//! │  │  ┌────────────┐  ┌──────────────┐  ┌────────────────┐  │  │
//! │  │  │  rustls    │  │   scratch    │  │ connected flag │  │  │
//! │  │  │  session   │  │ buffer (64K) │  │  + remote addr │  │  │
//! │  │  └─────┬──────┘  └──────────────┘  └────────────────┘  │  │
//! │  └────────┼───────────────────────────────────────────────┘  │
//! └───────────┼──────────────────────────────────────────────────┘
//!             │  TLS 1.2 / 1.3 records, TCP_NODELAY
//!        ┌────┴────┐
//!        │  peer   │
//!        └─────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::net::{IpAddr, Ipv4Addr};
//! use secure_connector::{Connector, TlsSocketConnector};
//!
//! let mut conn = TlsSocketConnector::connect(IpAddr::V4(Ipv4Addr::LOCALHOST), 9443)?;
//! conn.write(b"ping")?;
//! if let Some(bytes) = conn.read()? {
//!     println!("got {} bytes", bytes.len());
//! }
//! conn.close()?;
//! ```
//!
//! # Module Overview
//!
//! - [`transport`]: connector contract, configuration and the TLS connector

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod transport;

// Re-exports for convenience
pub use transport::config::{ConfigError, ConnectorConfig};
pub use transport::tls::{ShutdownHandle, TlsSocketConnector, TlsVersion, READ_BUFFER_SIZE};
pub use transport::traits::{Connector, ConnectorError, Result};
