//! Server-wide informational commands (spec §4.5), grounded on
//! `original_source/source/commands/global_commands.py`.

use crate::client::ClientId;
use crate::hub::Hub;
use crate::irc::irc_lower;
use crate::irc::numerics;

/// Maximum bytes per NAMES reply chunk before starting a new one
/// (spec §4.5 "each NAMES reply chunk is at most 510 − len(server_name) − 2").
fn names_chunk_budget(server_name: &str) -> usize {
    510usize.saturating_sub(server_name.len()).saturating_sub(2)
}

pub fn send_names(hub: &Hub, id: ClientId, channel_name: &str) {
    let nick = hub.nickname_or_star(id);
    let lowered = irc_lower(channel_name);
    let Some(channel) = hub.channels.get(&lowered) else { return };

    let budget = names_chunk_budget(&hub.config.server_name);
    let mut chunk = String::new();
    for member in &channel.members {
        if !chunk.is_empty() && chunk.len() + 1 + member.len() > budget {
            hub.reply(id, numerics::REPLY_NAME_REPLY, &[Some(&nick), Some("="), Some(channel_name)], Some(chunk.trim_end()));
            chunk.clear();
        }
        if !chunk.is_empty() {
            chunk.push(' ');
        }
        chunk.push_str(member);
    }
    if !chunk.is_empty() {
        hub.reply(id, numerics::REPLY_NAME_REPLY, &[Some(&nick), Some("="), Some(channel_name)], Some(chunk.trim_end()));
    }
    hub.reply(id, numerics::REPLY_END_OF_NAMES, &[Some(&nick), Some(channel_name)], Some("End of NAMES list"));
}

pub fn lusers(hub: &Hub, id: ClientId) {
    hub.send_lusers(id);
}

pub fn motd(hub: &Hub, id: ClientId) {
    hub.send_motd(id);
}

pub fn names(hub: &Hub, id: ClientId, args: &[String]) {
    match args.first() {
        Some(channels) => {
            for name in channels.split(',') {
                send_names(hub, id, name);
            }
        }
        None => {
            let Some(client) = hub.clients.get(&id) else { return };
            let channels: Vec<String> = client.channels.values().cloned().collect();
            for name in channels {
                send_names(hub, id, &name);
            }
        }
    }
}

pub fn ping(hub: &Hub, id: ClientId, args: &[String]) {
    let token = args.first().cloned().unwrap_or_default();
    hub.send_line(id, format!(":{} PONG {} :{token}", hub.config.server_name, hub.config.server_name));
}

pub fn pong() {}

pub fn wallops(hub: &Hub, id: ClientId, args: &[String]) {
    let Some(message) = args.first() else {
        hub.reply_not_enough_parameters(id, "WALLOPS");
        return;
    };
    let sender = hub.clients.get(&id).map(|c| c.prefix()).unwrap_or_default();
    let line = format!(":{sender} NOTICE * :{message}");
    for other_id in hub.clients.keys().copied().collect::<Vec<_>>() {
        hub.send_line(other_id, line.clone());
    }
}

pub fn who(hub: &Hub, id: ClientId, args: &[String]) {
    let nick = hub.nickname_or_star(id);
    let Some(channel_name) = args.first() else {
        hub.reply(id, numerics::REPLY_WHO_END, &[Some(&nick), Some("*")], Some("End of /WHO list"));
        return;
    };
    let lowered = irc_lower(channel_name);

    if let Some(channel) = hub.channels.get(&lowered) {
        for member_nick in &channel.members {
            let Some(&member_id) = hub.nicknames.get(&irc_lower(member_nick)) else { continue };
            let Some(member) = hub.clients.get(&member_id) else { continue };
            hub.reply(
                id,
                numerics::REPLY_WHO_MEMBER,
                &[
                    Some(&nick),
                    Some(channel_name),
                    Some(member.user.as_deref().unwrap_or("*")),
                    Some(&member.host),
                    Some(&hub.config.server_name),
                    Some(member_nick),
                    Some("H"),
                ],
                Some(&format!("0 {}", member.realname.as_deref().unwrap_or(""))),
            );
        }
    }
    hub.reply(id, numerics::REPLY_WHO_END, &[Some(&nick), Some(channel_name)], Some("End of /WHO list"));
}

pub fn whois(hub: &Hub, id: ClientId, args: &[String]) {
    let nick = hub.nickname_or_star(id);
    let Some(target_nick) = args.first() else {
        hub.reply_not_enough_parameters(id, "WHOIS");
        return;
    };

    let Some(&target_id) = hub.nicknames.get(&irc_lower(target_nick)) else {
        hub.reply(id, numerics::UNKNOWN_TARGET, &[Some(&nick), Some(target_nick)], Some("No such nick/channel"));
        return;
    };
    let Some(target) = hub.clients.get(&target_id) else { return };

    hub.reply(
        id,
        numerics::REPLY_WHOIS_USER,
        &[Some(&nick), Some(target_nick), Some(target.user.as_deref().unwrap_or("*")), Some(&target.host), Some("*")],
        Some(target.realname.as_deref().unwrap_or("")),
    );
    hub.reply(
        id,
        numerics::REPLY_WHOIS_SERVER,
        &[Some(&nick), Some(target_nick), Some(&hub.config.server_name)],
        Some("wifi-plaza lobby dispatch"),
    );
    if !target.channels.is_empty() {
        let channels: Vec<&str> = target.channels.values().map(String::as_str).collect();
        hub.reply(id, numerics::REPLY_WHOIS_CHANNELS, &[Some(&nick), Some(target_nick)], Some(&channels.join(" ")));
    }
    hub.reply(id, numerics::REPLY_WHOIS_END, &[Some(&nick), Some(target_nick)], Some("End of /WHOIS list"));
}
