//! Per-connection client state (spec §3 "Client", §4.5).

pub mod commands;

use std::collections::HashMap;

use tokio::sync::mpsc;

/// Identifies one accepted TCP connection for the lifetime of the
/// process. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

/// One line queued for delivery to a connection's writer task.
pub enum WriterMsg {
    Line(String),
    Close,
}

/// The three-state line-handler selector (spec §4.5 "Line handler
/// state machine"). A tagged enum, not a function pointer, per
/// the design notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    PassGate,
    Registration,
    Registered,
}

/// Everything the hub tracks about one connection. Lives entirely
/// inside the hub's single-threaded mutation domain; nothing here is
/// shared across tasks.
pub struct ClientRecord {
    pub state: ClientState,
    pub host: String,
    pub port: u16,
    pub nickname: Option<String>,
    pub user: Option<String>,
    pub realname: Option<String>,
    /// `irc_lower(channel name) -> canonical channel name`, mirroring
    /// the channel's own membership set (spec §3 invariant 2).
    pub channels: HashMap<String, String>,
    pub sent_ping: bool,
    pub last_activity: tokio::time::Instant,
    pub write_tx: mpsc::UnboundedSender<WriterMsg>,
}

impl ClientRecord {
    pub fn prefix(&self) -> String {
        format!(
            "{}!{}@{}",
            self.nickname.as_deref().unwrap_or("*"),
            self.user.as_deref().unwrap_or("*"),
            self.host
        )
    }
}
