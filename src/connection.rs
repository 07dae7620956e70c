//! Per-connection I/O and the listener loop (spec §4.6 "Server hub").
//!
//! Each accepted socket gets a reader half (feeding `HubEvent`s into the
//! single hub task) and a writer half (draining `WriterMsg`s), replacing
//! the reference implementation's readiness-driven `recv`/`send` calls
//! with Tokio tasks — the re-architecture spec §5 explicitly allows.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::client::{ClientId, WriterMsg};
use crate::hub::HubEvent;
use crate::irc::drain_lines;

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    ClientId(NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed))
}

#[cfg(feature = "tls")]
pub enum Acceptor {
    Plain,
    Tls(tokio_rustls::TlsAcceptor),
}

#[cfg(not(feature = "tls"))]
pub enum Acceptor {
    Plain,
}

/// Bind one port and accept connections until the process exits.
/// Binding uses `SO_REUSEADDR` implicitly via `TcpListener::bind`'s
/// platform default on Unix (spec §4.6 "Startup").
pub async fn listen(
    bind_address: std::net::IpAddr,
    port: u16,
    acceptor: std::sync::Arc<Acceptor>,
    hub_tx: mpsc::UnboundedSender<HubEvent>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((bind_address, port)).await?;
    tracing::info!(%bind_address, port, "listening");

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(%err, "accept failed");
                continue;
            }
        };
        let _ = socket.set_nodelay(true);
        let acceptor = acceptor.clone();
        let hub_tx = hub_tx.clone();
        tokio::spawn(async move {
            accept_one(socket, peer, acceptor, hub_tx).await;
        });
    }
}

async fn accept_one(
    socket: TcpStream,
    peer: SocketAddr,
    acceptor: std::sync::Arc<Acceptor>,
    hub_tx: mpsc::UnboundedSender<HubEvent>,
) {
    match &*acceptor {
        Acceptor::Plain => spawn_connection(socket, peer, hub_tx).await,
        #[cfg(feature = "tls")]
        Acceptor::Tls(tls) => match tls.accept(socket).await {
            Ok(stream) => spawn_connection(stream, peer, hub_tx).await,
            Err(err) => tracing::warn!(%peer, %err, "TLS handshake failed"),
        },
    }
}

/// Wire one accepted stream (plain or TLS) into the hub: a reader loop
/// translating bytes to `HubEvent::Line`, and a writer task draining
/// `WriterMsg`s enqueued by the hub.
async fn spawn_connection<S>(stream: S, peer: SocketAddr, hub_tx: mpsc::UnboundedSender<HubEvent>)
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Send + 'static,
{
    let id = next_client_id();
    let (mut read_half, mut write_half) = tokio::io::split(stream);
    let (write_tx, mut write_rx) = mpsc::unbounded_channel::<WriterMsg>();

    if hub_tx
        .send(HubEvent::Connected { id, host: peer.ip().to_string(), port: peer.port(), write_tx })
        .is_err()
    {
        return;
    }

    let writer = tokio::spawn(async move {
        while let Some(msg) = write_rx.recv().await {
            match msg {
                WriterMsg::Line(line) => {
                    if write_half.write_all(line.as_bytes()).await.is_err() {
                        break;
                    }
                }
                WriterMsg::Close => break,
            }
        }
        let _ = write_half.shutdown().await;
    });

    let mut buffer = String::new();
    let mut chunk = [0u8; 4096];
    loop {
        match read_half.read(&mut chunk).await {
            Ok(0) => {
                let _ = hub_tx.send(HubEvent::Disconnected { id, reason: "Connection reset by peer".to_string() });
                break;
            }
            Ok(n) => {
                let Ok(text) = std::str::from_utf8(&chunk[..n]) else {
                    let _ = hub_tx.send(HubEvent::Disconnected { id, reason: "invalid UTF-8".to_string() });
                    break;
                };
                buffer.push_str(text);
                for line in drain_lines(&mut buffer) {
                    if hub_tx.send(HubEvent::Line { id, line }).is_err() {
                        return;
                    }
                }
            }
            Err(err) => {
                let _ = hub_tx.send(HubEvent::Disconnected { id, reason: err.to_string() });
                break;
            }
        }
    }

    writer.abort();
}

/// Build the listener's acceptor from CLI configuration: plain TCP, or
/// (with the `tls` feature enabled and `--ssl-pem-file` set) a raw
/// `tokio_rustls` acceptor wrapping every accepted socket.
pub fn build_acceptor(_ssl_pem_file: Option<&PathBuf>) -> anyhow::Result<Acceptor> {
    #[cfg(feature = "tls")]
    if let Some(path) = _ssl_pem_file {
        let tls = crate::security::build_tls_acceptor(path)?;
        return Ok(Acceptor::Tls(tls));
    }
    Ok(Acceptor::Plain)
}
