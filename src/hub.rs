//! The server hub (spec §4.6, §5): single actor owning every piece of
//! mutable state (registries, channels, per-client records). Instead
//! of the reference implementation's `select()` readiness loop this
//! runs as one Tokio task serializing all mutation, with one task per
//! connection doing only I/O framing — the re-architecture the
//! specification explicitly allows for languages with real threads
//! (spec §5 "A faithful implementation ... may instead run one
//! goroutine/task per connection plus one dispatcher").

use std::collections::HashMap;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use crate::client::{commands, ClientId, ClientRecord, ClientState, WriterMsg};
use crate::channel::Channel;
use crate::irc::reply::{format_reply, normalize_outbound_line};
use crate::irc::{irc_lower, tokenize};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Idle thresholds from spec §4.5/§5.
const PING_AFTER: Duration = Duration::from_secs(90);
const DROP_AFTER: Duration = Duration::from_secs(180);
const SWEEP_INTERVAL: Duration = Duration::from_secs(10);

pub struct HubConfig {
    pub server_name: String,
    pub password: Option<String>,
    pub motd_file: Option<PathBuf>,
    pub channel_log_dir: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub respect_web: bool,
}

/// Messages a connection or listener task sends to the hub. This is
/// the sole channel through which mutable state is touched, which is
/// what makes the hub safe without locks (spec §5).
pub enum HubEvent {
    Connected {
        id: ClientId,
        host: String,
        port: u16,
        write_tx: mpsc::UnboundedSender<WriterMsg>,
    },
    Line {
        id: ClientId,
        line: String,
    },
    Disconnected {
        id: ClientId,
        reason: String,
    },
}

pub struct Hub {
    pub config: HubConfig,
    pub clients: HashMap<ClientId, ClientRecord>,
    pub nicknames: HashMap<String, ClientId>,
    pub channels: HashMap<String, Channel>,
    pub rng: StdRng,
}

impl Hub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            config,
            clients: HashMap::new(),
            nicknames: HashMap::new(),
            channels: HashMap::new(),
            rng: StdRng::from_entropy(),
        }
    }

    // -- outbound helpers -------------------------------------------------

    pub fn send_line(&self, id: ClientId, line: String) {
        if let Some(client) = self.clients.get(&id) {
            let _ = client.write_tx.send(WriterMsg::Line(normalize_outbound_line(&line)));
        }
    }

    pub fn reply(&self, id: ClientId, code: u16, params: &[Option<&str>], trailing: Option<&str>) {
        let line = format_reply(&self.config.server_name, code, params, trailing);
        self.send_line(id, line);
    }

    pub fn reply_not_enough_parameters(&self, id: ClientId, command: &str) {
        let nick = self.nickname_or_star(id);
        self.reply(
            id,
            crate::irc::numerics::NOT_ENOUGH_PARAMETERS,
            &[Some(&nick), Some(command)],
            Some("Not Enough Parameters"),
        );
    }

    pub fn nickname_or_star(&self, id: ClientId) -> String {
        self.clients
            .get(&id)
            .and_then(|c| c.nickname.clone())
            .unwrap_or_else(|| "*".to_string())
    }

    /// Fan a raw (non-numeric) line out to every member of a channel,
    /// optionally skipping the sender. Reads a snapshot of membership
    /// at call time (spec §9 "Fan-out iteration").
    pub fn message_channel(&self, channel_lowered: &str, from: ClientId, command: &str, message: &str, include_self: bool) {
        let Some(channel) = self.channels.get(channel_lowered) else { return };
        let prefix = self.clients.get(&from).map(ClientRecord::prefix).unwrap_or_default();
        let line = format!(":{prefix} {command} {message}");
        for member_nick in channel.members.clone() {
            let Some(&member_id) = self.nicknames.get(&irc_lower(&member_nick)) else { continue };
            if member_id == from && !include_self {
                continue;
            }
            self.send_line(member_id, line.clone());
        }
    }

    /// Fan a raw line out to every client that shares at least one
    /// channel with `from` (spec: `message_related`, used for NICK/QUIT).
    pub fn message_related(&self, from: ClientId, message: &str, include_self: bool) {
        let Some(sender) = self.clients.get(&from) else { return };
        let prefix = sender.prefix();
        let mut targets: std::collections::HashSet<ClientId> = std::collections::HashSet::new();
        for channel_name in sender.channels.keys() {
            if let Some(channel) = self.channels.get(channel_name) {
                for member_nick in &channel.members {
                    if let Some(&id) = self.nicknames.get(&irc_lower(member_nick)) {
                        targets.insert(id);
                    }
                }
            }
        }
        if !include_self {
            targets.remove(&from);
        }
        let line = format!(":{prefix} {message}");
        for id in targets {
            self.send_line(id, line.clone());
        }
    }

    pub fn channel_log(&self, channel_name: &str, nickname: &str, message: &str, meta: bool) {
        if let Some(dir) = &self.config.channel_log_dir {
            crate::channel_log::append(dir, channel_name, nickname, message, meta);
        }
    }

    pub fn send_lusers(&self, id: ClientId) {
        let nick = self.nickname_or_star(id);
        self.reply(
            id,
            crate::irc::numerics::REPLY_LUSERS,
            &[Some(&nick)],
            Some(&format!("There are {} user and 0 services on 1 server", self.clients.len())),
        );
    }

    pub fn send_motd(&self, id: ClientId) {
        let nick = self.nickname_or_star(id);
        let lines = match &self.config.motd_file {
            Some(path) => crate::motd::read_motd_lines(path),
            None => Vec::new(),
        };
        if lines.is_empty() {
            self.reply(id, crate::irc::numerics::NO_MOTD, &[Some(&nick)], Some("MOTD File is missing"));
            return;
        }
        self.reply(
            id,
            crate::irc::numerics::MOTD_START,
            &[Some(&nick)],
            Some(&format!("- {} Message of the day-", self.config.server_name)),
        );
        for line in &lines {
            self.reply(id, crate::irc::numerics::MOTD_PART, &[Some(&nick)], Some(&format!("- {}", line.trim_end())));
        }
        self.reply(id, crate::irc::numerics::MOTD_END, &[Some(&nick)], Some("End of /MOTD command"));
    }

    // -- registry mutation --------------------------------------------------

    pub fn get_or_create_channel(&mut self, canonical_name: &str) -> &mut Channel {
        let key = irc_lower(canonical_name);
        if !self.channels.contains_key(&key) {
            let channel = Channel::new(
                canonical_name.to_string(),
                self.config.state_dir.as_deref(),
                self.config.respect_web,
                &mut self.rng,
            )
            .unwrap_or_else(|_| {
                Channel::new(canonical_name.to_string(), None, true, &mut self.rng)
                    .expect("in-memory channel construction cannot fail")
            });
            self.channels.insert(key.clone(), channel);
        }
        self.channels.get_mut(&key).unwrap()
    }

    /// Drop a client's membership in one channel, garbage-collecting
    /// the channel if that was the last member (spec §8 invariant 1).
    pub fn remove_member_from_channel(&mut self, client_nickname: &str, channel_lowered: &str) {
        let Some(channel) = self.channels.get_mut(channel_lowered) else { return };
        if channel.remove_member(client_nickname) {
            self.channels.remove(channel_lowered);
        }
    }

    pub fn client_changed_nickname(&mut self, id: ClientId, old: Option<&str>, new: &str) {
        if let Some(old) = old {
            self.nicknames.remove(&irc_lower(old));
            if let Some(client) = self.clients.get(&id) {
                for channel_key in client.channels.keys().cloned().collect::<Vec<_>>() {
                    if let Some(channel) = self.channels.get_mut(&channel_key) {
                        if channel.members.remove(old) {
                            channel.members.insert(new.to_string());
                        }
                    }
                }
            }
        }
        self.nicknames.insert(irc_lower(new), id);
    }

    /// Full disconnect path (spec §4.5 "Disconnect", §4.6 `remove_client`).
    pub fn disconnect(&mut self, id: ClientId, quit_message: &str) {
        self.send_line(id, format!("ERROR :{quit_message}"));
        self.message_related(id, &format!("QUIT :{quit_message}"), false);

        let Some(client) = self.clients.remove(&id) else { return };
        for (lowered, canonical) in &client.channels {
            self.channel_log(canonical, client.nickname.as_deref().unwrap_or("*"), &format!("quit ({quit_message})"), true);
            self.remove_member_from_channel(client.nickname.as_deref().unwrap_or(""), lowered);
        }
        if let Some(nick) = &client.nickname {
            self.nicknames.remove(&irc_lower(nick));
        }
        let _ = client.write_tx.send(WriterMsg::Close);
    }

    // -- line handling --------------------------------------------------

    fn handle_line(&mut self, id: ClientId, raw: String) {
        if let Some(client) = self.clients.get_mut(&id) {
            client.last_activity = Instant::now();
            client.sent_ping = false;
        } else {
            return;
        }

        let tokenized = tokenize(&raw);
        if tokenized.command.is_empty() {
            return;
        }

        let state = self.clients.get(&id).map(|c| c.state).unwrap_or(ClientState::Registered);
        match state {
            ClientState::PassGate => self.handle_pass_gate(id, &tokenized.command, &tokenized.args),
            ClientState::Registration => self.handle_registration(id, &tokenized.command, &tokenized.args),
            ClientState::Registered => commands::dispatch(self, id, &tokenized.command, &tokenized.args),
        }
    }

    fn handle_pass_gate(&mut self, id: ClientId, command: &str, args: &[String]) {
        match command {
            "PASS" => {
                let Some(given) = args.first() else {
                    self.reply_not_enough_parameters(id, "PASS");
                    return;
                };
                let matches = self.config.password.as_deref() == Some(given.to_ascii_lowercase().as_str());
                if matches {
                    if let Some(client) = self.clients.get_mut(&id) {
                        client.state = ClientState::Registration;
                    }
                } else {
                    self.reply(id, crate::irc::numerics::PASSWORD_INCORRECT, &[], Some("Password incorrect"));
                }
            }
            "QUIT" => self.disconnect(id, "Client quit"),
            _ => {}
        }
    }

    fn handle_registration(&mut self, id: ClientId, command: &str, args: &[String]) {
        match command {
            "NICK" => commands::session::nick_during_registration(self, id, args),
            "USER" => {
                if args.len() < 4 {
                    self.reply_not_enough_parameters(id, "USER");
                    return;
                }
                if let Some(client) = self.clients.get_mut(&id) {
                    client.user = Some(args[0].clone());
                    client.realname = Some(args[3].clone());
                }
            }
            "QUIT" => {
                self.disconnect(id, "Client quit");
                return;
            }
            _ => {}
        }
        self.maybe_complete_registration(id);
    }

    fn maybe_complete_registration(&mut self, id: ClientId) {
        let Some(client) = self.clients.get(&id) else { return };
        if client.nickname.is_none() || client.user.is_none() {
            return;
        }
        let nick = client.nickname.clone().unwrap();

        self.reply(id, crate::irc::numerics::REPLY_WELCOME, &[Some(&nick)], Some("Hi, welcome to IRC"));
        self.reply(
            id,
            crate::irc::numerics::REPLY_SEND_HOST,
            &[Some(&nick)],
            Some(&format!("Your host is {}, running version wifi-plaza-ircd-{VERSION}", self.config.server_name)),
        );
        self.reply(id, crate::irc::numerics::REPLY_SERVER_CREATED_AT, &[Some(&nick)], Some("This server was created sometime"));
        self.reply(
            id,
            crate::irc::numerics::REPLY_MY_INFO,
            &[Some(&nick), Some(&self.config.server_name), Some(&format!("wifi-plaza-ircd-{VERSION}")), Some("o"), Some("o")],
            None,
        );
        self.send_lusers(id);
        self.send_motd(id);

        if let Some(client) = self.clients.get_mut(&id) {
            client.state = ClientState::Registered;
        }
    }

    // -- aliveness sweep --------------------------------------------------

    pub fn sweep_aliveness(&mut self) {
        let now = Instant::now();
        let mut to_ping = Vec::new();
        let mut to_drop = Vec::new();

        for (&id, client) in &self.clients {
            let idle = now.saturating_duration_since(client.last_activity);
            if idle > DROP_AFTER {
                to_drop.push(id);
            } else if idle > PING_AFTER && !client.sent_ping {
                if client.state == ClientState::Registered {
                    to_ping.push(id);
                } else {
                    to_drop.push(id);
                }
            }
        }

        for id in to_ping {
            self.send_line(id, format!("PING :{}", self.config.server_name));
            if let Some(client) = self.clients.get_mut(&id) {
                client.sent_ping = true;
            }
        }
        for id in to_drop {
            self.disconnect(id, "ping timeout");
        }
    }

    fn handle_connected(&mut self, id: ClientId, host: String, port: u16, write_tx: mpsc::UnboundedSender<WriterMsg>) {
        let state = if self.config.password.is_some() { ClientState::PassGate } else { ClientState::Registration };
        self.clients.insert(
            id,
            ClientRecord {
                state,
                host,
                port,
                nickname: None,
                user: None,
                realname: None,
                channels: HashMap::new(),
                sent_ping: false,
                last_activity: Instant::now(),
                write_tx,
            },
        );
    }

    fn handle_disconnected(&mut self, id: ClientId, reason: String) {
        if self.clients.contains_key(&id) {
            self.disconnect(id, &reason);
        }
    }
}

/// Drain hub events until the channel closes, running the periodic
/// liveness sweep alongside (spec §4.6 "Wall-clock sweep every ≥10s").
pub async fn run(config: HubConfig, mut rx: mpsc::UnboundedReceiver<HubEvent>) {
    let mut hub = Hub::new(config);
    let mut sweep = tokio::time::interval(SWEEP_INTERVAL);
    sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(HubEvent::Connected { id, host, port, write_tx }) => {
                        hub.handle_connected(id, host, port, write_tx);
                    }
                    Some(HubEvent::Line { id, line }) => hub.handle_line(id, line),
                    Some(HubEvent::Disconnected { id, reason }) => hub.handle_disconnected(id, reason),
                    None => break,
                }
            }
            _ = sweep.tick() => hub.sweep_aliveness(),
        }
    }
}
