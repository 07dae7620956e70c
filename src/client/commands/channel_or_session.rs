//! Commands whose target may be either a channel or a user (spec §4.5),
//! grounded on `original_source/source/commands/channel_or_session.py`.

use crate::client::ClientId;
use crate::codec::utm::UtmMessage;
use crate::hub::Hub;
use crate::irc::irc_lower;
use crate::irc::numerics;

pub fn mode(hub: &mut Hub, id: ClientId, args: &[String]) {
    let Some(target) = args.first() else {
        hub.reply_not_enough_parameters(id, "MODE");
        return;
    };

    if !target.starts_with(['#', '&', '+', '!']) {
        let nick = hub.nickname_or_star(id);
        hub.reply(id, numerics::REPLY_CLIENT_MODE, &[Some(&nick), Some(target)], None);
        return;
    }

    let lowered = irc_lower(target);
    let Some(flag) = args.get(1) else {
        let key_set = hub.channels.get(&lowered).and_then(|c| c.key()).is_some();
        let nick = hub.nickname_or_star(id);
        hub.reply(id, numerics::REPLY_MODE, &[Some(&nick), Some(target)], Some(if key_set { "+k" } else { "" }));
        return;
    };

    let is_member = hub.clients.get(&id).map(|c| c.channels.contains_key(&lowered)).unwrap_or(false);
    if !is_member {
        let nick = hub.nickname_or_star(id);
        hub.reply(id, numerics::NOT_IN_CHANNEL, &[Some(&nick), Some(target)], Some("You're not on that channel"));
        return;
    }

    match flag.as_str() {
        "+k" => {
            let key = args.get(2).cloned();
            if let Some(channel) = hub.channels.get_mut(&lowered) {
                let _ = channel.set_key(key);
            }
            hub.message_channel(&lowered, id, "MODE", &format!("{target} +k"), true);
        }
        "-k" => {
            if let Some(channel) = hub.channels.get_mut(&lowered) {
                let _ = channel.set_key(None);
            }
            hub.message_channel(&lowered, id, "MODE", &format!("{target} -k"), true);
        }
        other => {
            // Other flags are echoed back unchanged; this server is permissive
            // about modes it doesn't otherwise model (spec §4.5).
            hub.message_channel(&lowered, id, "MODE", &format!("{target} {other}"), true);
        }
    }
}

pub fn privmsg_or_notice(hub: &mut Hub, id: ClientId, args: &[String], command: &str) {
    let Some(target) = args.first() else {
        let nick = hub.nickname_or_star(id);
        hub.reply(id, numerics::NO_RECEIPENT, &[Some(&nick)], Some(&format!("No recipient given ({command})")));
        return;
    };
    let Some(message) = args.get(1) else {
        let nick = hub.nickname_or_star(id);
        hub.reply(id, numerics::NO_MESSAGE, &[Some(&nick)], Some("No text to send"));
        return;
    };

    if target.starts_with(['#', '&', '+', '!']) {
        let lowered = irc_lower(target);
        let canonical = hub.channels.get(&lowered).map(|c| c.name.clone());
        let Some(canonical) = canonical else { return };
        let nick = hub.nickname_or_star(id);
        hub.message_channel(&lowered, id, command, &format!("{canonical} :{message}"), false);
        hub.channel_log(&canonical, &nick, message, false);
        return;
    }

    let Some(&target_id) = hub.nicknames.get(&irc_lower(target)) else {
        let nick = hub.nickname_or_star(id);
        hub.reply(id, numerics::UNKNOWN_TARGET, &[Some(&nick), Some(target)], Some("No such nick/channel"));
        return;
    };
    let prefix = hub.clients.get(&id).map(|c| c.prefix()).unwrap_or_default();
    hub.send_line(target_id, format!(":{prefix} {command} {target} :{message}"));
}

/// Relay an opaque blob: to every member of a channel target, or to the
/// first matching nickname across the sender's own channels otherwise
/// (spec §4.5 "UTM", open question "UTM non-channel target").
pub fn utm(hub: &mut Hub, id: ClientId, args: &[String]) {
    let Some(target) = args.first() else { return };
    let Some(payload) = args.get(1) else { return };

    if let Err(err) = UtmMessage::parse(payload) {
        tracing::error!(%target, %err, "malformed UTM payload");
    }

    let prefix = hub.clients.get(&id).map(|c| c.prefix()).unwrap_or_default();
    let line = format!(":{prefix} UTM {target} :{payload}");

    if let Some(channel_name) = target.strip_prefix('#') {
        let lowered = irc_lower(&format!("#{channel_name}"));
        let Some(channel) = hub.channels.get(&lowered) else { return };
        for member_nick in channel.members.clone() {
            if let Some(&member_id) = hub.nicknames.get(&irc_lower(&member_nick)) {
                hub.send_line(member_id, line.clone());
            }
        }
        return;
    }

    let Some(client) = hub.clients.get(&id) else { return };
    let target_lower = irc_lower(target);
    for channel_name in client.channels.values().cloned().collect::<Vec<_>>() {
        let lowered = irc_lower(&channel_name);
        let Some(channel) = hub.channels.get(&lowered) else { continue };
        let matched = channel.members.iter().find(|m| irc_lower(m) == target_lower).cloned();
        if let Some(matched) = matched {
            if let Some(&member_id) = hub.nicknames.get(&irc_lower(&matched)) {
                hub.send_line(member_id, line.clone());
            }
        }
    }
}
