#![cfg_attr(not(test), deny(clippy::panic))]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;

use wifi_plaza_ircd::config::{Cli, ServerConfig};
use wifi_plaza_ircd::hub::{self, HubConfig};
use wifi_plaza_ircd::security::privileges;
use wifi_plaza_ircd::{connection, logging, pidfile};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::from_cli(cli)?;

    privileges::refuse_unwanted_root(config.setuid.as_ref())?;

    if let Some(chroot_path) = &config.chroot {
        privileges::chroot_into(chroot_path)?;
    }
    if let Some(target) = config.setuid {
        privileges::drop_privileges(target)?;
    }
    if config.daemon {
        // Must run before the Tokio runtime spawns any worker threads:
        // fork() is only safe in a single-threaded process.
        privileges::daemonize()?;
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building async runtime")?
        .block_on(run(config))
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    logging::init(&config);

    if let Some(pid_file) = &config.pid_file {
        pidfile::write_pid_file(pid_file)?;
    }

    let acceptor = Arc::new(connection::build_acceptor(config.ssl_pem_file.as_ref())?);
    let (hub_tx, hub_rx) = mpsc::unbounded_channel();

    let hub_config = HubConfig {
        server_name: config.server_name.clone(),
        password: config.password.clone(),
        motd_file: config.motd_file.clone(),
        channel_log_dir: config.channel_log_dir.clone(),
        state_dir: config.state_dir.clone(),
        respect_web: config.respect_web,
    };
    let hub_task = tokio::spawn(hub::run(hub_config, hub_rx));

    let mut listeners = Vec::new();
    for &port in &config.ports {
        let bind_address = config.bind_address;
        let acceptor = acceptor.clone();
        let hub_tx = hub_tx.clone();
        listeners.push(tokio::spawn(async move {
            if let Err(err) = connection::listen(bind_address, port, acceptor, hub_tx).await {
                tracing::error!(port, %err, "listener exited");
            }
        }));
    }
    drop(hub_tx);

    tracing::info!(server = %config.server_name, ports = ?config.ports, "wifi-plaza-ircd started");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received shutdown signal");
        }
        _ = hub_task => {
            tracing::error!("hub task exited unexpectedly");
        }
    }

    for listener in listeners {
        listener.abort();
    }

    Ok(())
}
