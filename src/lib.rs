#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::too_many_arguments
)]

//! A small IRC-dialect dispatch server for the Nintendo/GameSpy "WiFi
//! Plaza" lobby protocol: standard IRC registration and channel
//! commands plus the GETCHANKEY/SETCHANKEY/GETCKEY/SETCKEY/UTM
//! extensions that carry serialized lobby and world-data blobs.

/// Per-channel membership and persisted lobby/key state.
pub mod channel;

/// Best-effort per-channel chat/event logging.
pub mod channel_log;

/// Per-connection client records and the REGISTERED-state command table.
pub mod client;

/// DWC base64 dialect, fixed binary lobby records, and the UTM envelope.
pub mod codec;

/// CLI surface and derived runtime configuration.
pub mod config;

/// Per-connection reader/writer tasks and the listener loop.
pub mod connection;

/// Domain error types shared across the codec and dispatch layers.
pub mod error;

/// The single-actor hub owning every piece of mutable server state.
pub mod hub;

/// IRC line protocol: framing, tokenization, numerics, validation.
pub mod irc;

/// Random lobby generation.
pub mod lobby;

/// Structured logging setup.
pub mod logging;

/// Message-of-the-day file loading.
pub mod motd;

/// PID file writing.
pub mod pidfile;

/// Optional TLS wrapping and privilege drop/daemonization.
pub mod security;

/// Channel state-file persistence.
pub mod state_file;
