//! TLS Transport
//!
//! TLS-over-TCP connector built on rustls. The session is driven
//! synchronously on the caller's thread; see [`TlsSocketConnector`].

mod client_config;
mod connector;

pub use client_config::{build_client_config, resolve_server_name, TlsVersion};
pub use connector::{ShutdownHandle, TlsSocketConnector, READ_BUFFER_SIZE};
