//! CLI surface and derived server configuration (spec §6 "CLI surface"),
//! grounded on `original_source/source/miniircd.py` for the flag set
//! and on the teacher's `config` module for the clap-derive layout.

mod ports;

pub use ports::parse_ports;

use std::net::{IpAddr, ToSocketAddrs};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::security::privileges::{resolve_setuid_target, SetuidTarget};

/// A small and limited IRC-dialect server for the Nintendo WiFi Plaza
/// lobby protocol.
#[derive(Parser, Debug)]
#[command(name = "wifi-plaza-ircd", version, about)]
pub struct Cli {
    /// Store channel logs in directory X.
    #[arg(long, value_name = "X")]
    pub channel_log_dir: Option<PathBuf>,

    /// Fork and become a daemon.
    #[arg(short = 'd', long)]
    pub daemon: bool,

    /// Use IPv6.
    #[arg(long)]
    pub ipv6: bool,

    /// Print debug messages to stdout.
    #[arg(long)]
    pub debug: bool,

    /// Listen on specific IP address X.
    #[arg(long, value_name = "X")]
    pub listen: Option<String>,

    /// Don't synthesize a random lobby for new channels; wait for a
    /// client or web peer to SETCHANKEY one in.
    #[arg(long)]
    pub respect_web: bool,

    /// Keep X rotated log files.
    #[arg(long, value_name = "X", default_value_t = 10)]
    pub log_count: u32,

    /// Store log output in file X.
    #[arg(long, value_name = "X")]
    pub log_file: Option<PathBuf>,

    /// Maximum log file size in MiB before rotation.
    #[arg(long, value_name = "X", default_value_t = 10)]
    pub log_max_size: u64,

    /// Display file X as the message of the day.
    #[arg(long, value_name = "X")]
    pub motd: Option<PathBuf>,

    /// Write the server's PID to file X.
    #[arg(long, value_name = "X")]
    pub pid_file: Option<PathBuf>,

    /// Require connection password X.
    #[arg(short = 'p', long, value_name = "X")]
    pub password: Option<String>,

    /// Require connection password stored in file X.
    #[arg(long, value_name = "X")]
    pub password_file: Option<PathBuf>,

    /// Ports to listen on (comma or whitespace separated).
    /// Default: 6667, or 6697 if SSL is enabled.
    #[arg(long, value_name = "X")]
    pub ports: Option<String>,

    /// Enable SSL and use FILE as the combined certificate+key PEM.
    #[arg(short = 's', long, value_name = "FILE")]
    pub ssl_pem_file: Option<PathBuf>,

    /// Save persistent channel state (topic, key, lobby) in directory X.
    #[arg(long, value_name = "X")]
    pub state_dir: Option<PathBuf>,

    /// Print progress messages to stdout.
    #[arg(long)]
    pub verbose: bool,

    /// Change filesystem root to directory X after startup (requires root).
    #[arg(long, value_name = "X")]
    pub chroot: Option<PathBuf>,

    /// Change process user (and optionally group) after startup,
    /// e.g. `--setuid daemon` or `--setuid nobody:nobody`.
    #[arg(long, value_name = "U[:G]")]
    pub setuid: Option<String>,
}

/// Fully resolved runtime configuration, derived from [`Cli`] plus
/// whatever password/port defaulting the raw flags imply.
pub struct ServerConfig {
    pub server_name: String,
    pub bind_address: IpAddr,
    pub ports: Vec<u16>,
    pub password: Option<String>,
    pub ssl_pem_file: Option<PathBuf>,
    pub motd_file: Option<PathBuf>,
    pub channel_log_dir: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub respect_web: bool,
    pub ipv6: bool,
    pub chroot: Option<PathBuf>,
    pub setuid: Option<SetuidTarget>,
    pub daemon: bool,
    pub pid_file: Option<PathBuf>,
    pub verbose: bool,
    pub debug: bool,
    pub log_file: Option<PathBuf>,
    pub log_max_bytes: u64,
    pub log_count: u32,
}

impl ServerConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let password = resolve_password(&cli)?;

        let ssl_enabled = cli.ssl_pem_file.is_some();
        let ports_spec = cli.ports.clone().unwrap_or_else(|| {
            if ssl_enabled { "6697".to_string() } else { "6667".to_string() }
        });
        let ports = parse_ports(&ports_spec)?;

        let setuid = cli.setuid.as_deref().map(resolve_setuid_target).transpose()?;

        if cli.chroot.is_some() && !nix::unistd::Uid::effective().is_root() {
            bail!("--chroot requires root");
        }
        if cli.setuid.is_some() && !nix::unistd::Uid::effective().is_root() {
            bail!("--setuid requires root");
        }

        let bind_address = resolve_bind_address(cli.listen.as_deref(), cli.ipv6)?;
        let server_name = resolve_server_name();

        Ok(Self {
            server_name,
            bind_address,
            ports,
            password,
            ssl_pem_file: cli.ssl_pem_file,
            motd_file: cli.motd,
            channel_log_dir: cli.channel_log_dir,
            state_dir: cli.state_dir,
            respect_web: cli.respect_web,
            ipv6: cli.ipv6,
            chroot: cli.chroot,
            setuid,
            daemon: cli.daemon,
            pid_file: cli.pid_file,
            verbose: cli.verbose || cli.debug,
            debug: cli.debug,
            log_file: cli.log_file,
            log_max_bytes: cli.log_max_size * 1024 * 1024,
            log_count: cli.log_count,
        })
    }
}

/// `PASS` comparisons are case-insensitive (spec §9 open question,
/// resolved against `original_source`'s `arguments[0].lower() ==
/// server.password`): store the configured password lowercased too.
fn resolve_password(cli: &Cli) -> Result<Option<String>> {
    if let Some(path) = &cli.password_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading password file {}", path.display()))?;
        return Ok(Some(contents.trim_end_matches('\n').to_ascii_lowercase()));
    }
    Ok(cli.password.as_deref().map(str::to_ascii_lowercase))
}

fn resolve_bind_address(listen: Option<&str>, ipv6: bool) -> Result<IpAddr> {
    let Some(host) = listen else {
        return Ok(if ipv6 { IpAddr::from([0u16; 8]) } else { IpAddr::from([0u8; 4]) });
    };
    (host, 0u16)
        .to_socket_addrs()
        .with_context(|| format!("resolving --listen address {host:?}"))?
        .next()
        .map(|addr| addr.ip())
        .with_context(|| format!("no addresses found for --listen {host:?}"))
}

/// Server identity, truncated to 63 octets per RFC 2812 (spec §3).
fn resolve_server_name() -> String {
    let hostname = nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "wifi-plaza".to_string());
    hostname.chars().take(63).collect()
}
