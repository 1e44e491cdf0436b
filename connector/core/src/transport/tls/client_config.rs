//! TLS client setup
//!
//! Builds the rustls client configuration shared by every handshake:
//! ring crypto provider (and its secure random source), a fixed allow-list
//! of protocol versions, and the configured trust anchors.

use std::io;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, RootCertStore, SupportedProtocolVersion};

use crate::transport::config::ConnectorConfig;

/// Protocol versions a connector will offer, newest first
///
/// Anything older than TLS 1.2 is not implemented by rustls, so a peer that
/// only speaks a deprecated version fails the handshake.
static ENABLED_PROTOCOL_VERSIONS: &[&SupportedProtocolVersion] =
    &[&rustls::version::TLS13, &rustls::version::TLS12];

/// TLS protocol version negotiated on a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TlsVersion {
    /// TLS 1.2
    Tls12,
    /// TLS 1.3
    Tls13,
}

impl TlsVersion {
    pub(crate) fn from_rustls(version: rustls::ProtocolVersion) -> Option<Self> {
        match version {
            rustls::ProtocolVersion::TLSv1_2 => Some(Self::Tls12),
            rustls::ProtocolVersion::TLSv1_3 => Some(Self::Tls13),
            _ => None,
        }
    }
}

impl std::fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tls12 => write!(f, "TLSv1.2"),
            Self::Tls13 => write!(f, "TLSv1.3"),
        }
    }
}

/// Build the rustls client configuration for `config`
///
/// # Errors
///
/// Returns an `io::Error` if the configuration is invalid, a root
/// certificate file cannot be read or parsed, or no trust anchor remains.
pub fn build_client_config(config: &ConnectorConfig) -> io::Result<Arc<ClientConfig>> {
    config
        .validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let roots = root_store(config)?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let client = ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(ENABLED_PROTOCOL_VERSIONS)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(Arc::new(client))
}

/// Pick the name the peer's certificate is verified against
///
/// Uses `config.server_name` when set, otherwise the IP address itself.
///
/// # Errors
///
/// Returns `InvalidInput` if the configured name is not a valid DNS name.
pub fn resolve_server_name(
    address: IpAddr,
    config: &ConnectorConfig,
) -> io::Result<ServerName<'static>> {
    match &config.server_name {
        Some(name) => ServerName::try_from(name.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e)),
        None => Ok(ServerName::from(address)),
    }
}

fn root_store(config: &ConnectorConfig) -> io::Result<RootCertStore> {
    let mut roots = RootCertStore::empty();

    if config.use_default_roots {
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    for path in &config.extra_root_certs {
        for cert in load_certs(path)? {
            roots
                .add(cert)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        }
    }

    if roots.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no trust anchors available",
        ));
    }

    Ok(roots)
}

fn load_certs(path: &Path) -> io::Result<Vec<CertificateDer<'static>>> {
    let certs = CertificateDer::pem_file_iter(path)
        .and_then(|iter| iter.collect::<Result<Vec<_>, _>>())
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to load certificates from {}: {e}", path.display()),
            )
        })?;

    if certs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("no certificates found in {}", path.display()),
        ));
    }

    Ok(certs)
}
