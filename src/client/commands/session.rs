//! Per-session commands (spec §4.5 "Nickname change"), grounded on
//! `original_source/source/commands/session.py`.

use crate::client::ClientId;
use crate::hub::Hub;
use crate::irc::irc_lower;
use crate::irc::numerics;
use crate::irc::validate::is_valid_nickname;

pub fn away(hub: &Hub, id: ClientId, args: &[String]) {
    let nick = hub.nickname_or_star(id);
    if args.first().map(|m| !m.is_empty()).unwrap_or(false) {
        hub.reply(id, numerics::REPLY_NOW_AWAY, &[Some(&nick)], Some("You have been marked as being away"));
    } else {
        hub.reply(id, numerics::REPLY_UNAWAY, &[Some(&nick)], Some("You are no longer marked as being away"));
    }
}

pub fn ison(hub: &Hub, id: ClientId, args: &[String]) {
    let nick = hub.nickname_or_star(id);
    let Some(requested) = args.first() else {
        hub.reply_not_enough_parameters(id, "ISON");
        return;
    };
    let online: Vec<&str> = requested
        .split_whitespace()
        .filter(|candidate| hub.nicknames.contains_key(&irc_lower(candidate)))
        .collect();
    hub.reply(id, numerics::REPLY_IS_ON, &[Some(&nick)], Some(&online.join(" ")));
}

pub fn nick(hub: &mut Hub, id: ClientId, args: &[String]) {
    let Some(new_nick) = args.first() else {
        hub.reply(id, numerics::NO_NICKNAME_GIVEN, &[], Some("No nickname given"));
        return;
    };
    if apply_nickname_change(hub, id, new_nick).is_err() {
        return;
    }
    hub.message_related(id, &format!("NICK :{new_nick}"), true);
}

/// During REGISTRATION, nickname collisions and validation are enforced
/// the same way but there is no one to fan the change out to yet
/// (spec §4.5 "REGISTRATION").
pub fn nick_during_registration(hub: &mut Hub, id: ClientId, args: &[String]) {
    let Some(new_nick) = args.first() else {
        hub.reply(id, numerics::NO_NICKNAME_GIVEN, &[], Some("No nickname given"));
        return;
    };
    let _ = apply_nickname_change(hub, id, new_nick);
}

fn apply_nickname_change(hub: &mut Hub, id: ClientId, new_nick: &str) -> Result<(), ()> {
    if !is_valid_nickname(new_nick) {
        let nick = hub.nickname_or_star(id);
        hub.reply(id, numerics::NICKNAME_INVALID, &[Some(&nick), Some(new_nick)], Some("Erroneous nickname"));
        return Err(());
    }
    let lowered = irc_lower(new_nick);
    if let Some(&existing) = hub.nicknames.get(&lowered) {
        if existing != id {
            let nick = hub.nickname_or_star(id);
            hub.reply(id, numerics::NICKNAME_IN_USE, &[Some(&nick), Some(new_nick)], Some("Nickname is already in use"));
            return Err(());
        }
    }

    let old_nick = hub.clients.get(&id).and_then(|c| c.nickname.clone());
    hub.client_changed_nickname(id, old_nick.as_deref(), new_nick);
    if let Some(client) = hub.clients.get_mut(&id) {
        client.nickname = Some(new_nick.to_string());
    }
    Ok(())
}

pub fn quit(hub: &mut Hub, id: ClientId, args: &[String]) {
    let reason = args.first().cloned().unwrap_or_else(|| "Client quit".to_string());
    hub.disconnect(id, &reason);
}
