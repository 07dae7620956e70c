//! Optional TLS wrapping for accepted sockets (spec §6 `-s/--ssl-pem-file`,
//! §4.6 "optionally wrap in TLS"). Non-goal: TLS negotiation internals
//! (cipher suite policy, client certificates) — this just terminates
//! TLS with a single combined cert+key PEM file, matching the
//! reference's `ssl.wrap_socket(certfile=pem, keyfile=pem)`.
//!
//! Grounded on the teacher's `security/tls.rs`, adapted from an
//! `axum_server`/HTTP listener to a raw `tokio_rustls` acceptor since
//! this server speaks IRC lines directly over the socket, not HTTP.

#[cfg(feature = "tls")]
use std::fs;
#[cfg(feature = "tls")]
use std::path::Path;
#[cfg(feature = "tls")]
use std::sync::Arc;

#[cfg(feature = "tls")]
use anyhow::{anyhow, Context, Result};
#[cfg(feature = "tls")]
use rustls::ServerConfig as RustlsServerConfig;
#[cfg(feature = "tls")]
use rustls_pemfile::{certs, read_one, Item};
#[cfg(feature = "tls")]
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
#[cfg(feature = "tls")]
use tokio_rustls::TlsAcceptor;

#[cfg(feature = "tls")]
pub fn build_tls_acceptor(pem_path: &Path) -> Result<TlsAcceptor> {
    let cert_chain = load_cert_chain(pem_path)?;
    let private_key = load_private_key(pem_path)?;

    let config = RustlsServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, private_key)
        .map_err(|err| anyhow!("invalid TLS certificate/private key pair: {err}"))?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

#[cfg(feature = "tls")]
fn load_cert_chain(pem_path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let data = fs::read(pem_path)
        .with_context(|| format!("failed to read TLS PEM file at {}", pem_path.display()))?;
    let mut reader = data.as_slice();
    let certs: Vec<CertificateDer<'static>> = certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to parse TLS certificate chain at {}", pem_path.display()))?;

    if certs.is_empty() {
        anyhow::bail!("no certificates were found in {}", pem_path.display());
    }
    Ok(certs)
}

#[cfg(feature = "tls")]
fn load_private_key(pem_path: &Path) -> Result<PrivateKeyDer<'static>> {
    let key_bytes = fs::read(pem_path)
        .with_context(|| format!("failed to read TLS PEM file at {}", pem_path.display()))?;
    let mut reader = key_bytes.as_slice();
    while let Some(item) = read_one(&mut reader)
        .with_context(|| format!("failed to parse PEM entry in {}", pem_path.display()))?
    {
        let der: PrivateKeyDer<'static> = match item {
            Item::Pkcs8Key(key) => key.into(),
            Item::Pkcs1Key(key) => key.into(),
            Item::Sec1Key(key) => key.into(),
            _ => continue,
        };
        return Ok(der);
    }

    anyhow::bail!(
        "no supported private key (pkcs8/pkcs1/sec1) was found in {}",
        pem_path.display()
    );
}

#[cfg(test)]
#[cfg(feature = "tls")]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_file() {
        assert!(build_tls_acceptor(Path::new("/nonexistent/server.pem")).is_err());
    }
}
