//! Channel-scoped commands (spec §4.5), grounded on
//! `original_source/source/commands/channel.py`.

use crate::client::ClientId;
use crate::codec::dwc::{dwc_decode, dwc_encode};
use crate::codec::records::PkWifiLobby;
use crate::hub::Hub;
use crate::irc::numerics;
use crate::irc::validate::is_valid_channel_name;
use crate::irc::irc_lower;

const CHANKEY_TIME: &str = "\u{8}_lib_c_time";
const CHANKEY_LOBBY: &str = "\u{8}_lib_c_lobby";
const CHANKEY_WORLD_DATA: &str = "\u{8}_lby_wlddata";
const CKEY_USER: &str = "\u{8}_lib_u_user";
const CKEY_SYSTEM: &str = "\u{8}_lib_u_system";

const MAX_LOBBY_LEN: usize = 384;
const MAX_WORLD_DATA_LEN: usize = 8;
const USER_KEY_LEN: usize = 200;
const MAX_SYSTEM_KEY_LEN: usize = 24;

pub fn join(hub: &mut Hub, id: ClientId, args: &[String]) {
    let Some(channels_arg) = args.first() else {
        hub.reply_not_enough_parameters(id, "JOIN");
        return;
    };

    if channels_arg == "0" {
        let Some(client) = hub.clients.get(&id) else { return };
        let memberships: Vec<(String, String)> = client
            .channels
            .iter()
            .map(|(lowered, canonical)| (lowered.clone(), canonical.clone()))
            .collect();
        let nick = client.nickname.clone().unwrap_or_default();
        for (lowered, canonical) in memberships {
            hub.message_channel(&lowered, id, "PART", &canonical, true);
            hub.channel_log(&canonical, &nick, "left", true);
            hub.remove_member_from_channel(&nick, &lowered);
            if let Some(client) = hub.clients.get_mut(&id) {
                client.channels.remove(&lowered);
            }
        }
        return;
    }

    let names: Vec<&str> = channels_arg.split(',').collect();
    let keys: Vec<&str> = args.get(1).map(|k| k.split(',').collect()).unwrap_or_default();

    for (i, name) in names.iter().enumerate() {
        let given_key = keys.get(i).copied();
        join_one(hub, id, name, given_key);
    }
}

fn join_one(hub: &mut Hub, id: ClientId, name: &str, given_key: Option<&str>) {
    if !is_valid_channel_name(name) {
        return;
    }
    let lowered = irc_lower(name);

    let channel = hub.get_or_create_channel(name);
    if let Some(required) = channel.key() {
        if Some(required) != given_key {
            let nick = hub.nickname_or_star(id);
            hub.reply(id, numerics::INCORRECT_KEY, &[Some(&nick), Some(name)], Some("Cannot join channel (+k)"));
            return;
        }
    }

    let Some(nick) = hub.clients.get(&id).and_then(|c| c.nickname.clone()) else { return };

    let channel = hub.channels.get_mut(&lowered).unwrap();
    let canonical = channel.name.clone();
    channel.add_member(&nick);
    if let Some(client) = hub.clients.get_mut(&id) {
        client.channels.insert(lowered.clone(), canonical.clone());
    }

    hub.message_channel(&lowered, id, "JOIN", &canonical, true);
    hub.channel_log(&canonical, &nick, "joined", true);

    let topic = hub.channels.get(&lowered).map(|c| c.topic().to_string()).unwrap_or_default();
    if topic.is_empty() {
        hub.reply(id, numerics::REPLY_NO_TOPIC, &[Some(&nick), Some(&canonical)], Some("No topic is set"));
    } else {
        hub.reply(id, numerics::REPLY_TOPIC, &[Some(&nick), Some(&canonical)], Some(&topic));
    }

    super::global_commands::send_names(hub, id, &canonical);
}

pub fn part(hub: &mut Hub, id: ClientId, args: &[String]) {
    let Some(channels_arg) = args.first() else {
        hub.reply_not_enough_parameters(id, "PART");
        return;
    };
    let message = args.get(1).cloned().unwrap_or_else(|| "leaving".to_string());

    for name in channels_arg.split(',') {
        let lowered = irc_lower(name);
        let nick = hub.nickname_or_star(id);

        if !hub.channels.contains_key(&lowered) {
            hub.reply(id, numerics::UNKNOWN_CHANNEL, &[Some(&nick), Some(name)], Some("No such channel"));
            continue;
        }
        let is_member = hub.clients.get(&id).map(|c| c.channels.contains_key(&lowered)).unwrap_or(false);
        if !is_member {
            hub.reply(id, numerics::NOT_IN_CHANNEL, &[Some(&nick), Some(name)], Some("You're not on that channel"));
            continue;
        }

        hub.message_channel(&lowered, id, "PART", &format!("{name} :{message}"), true);
        hub.channel_log(name, &nick, &format!("left ({message})"), true);
        hub.remove_member_from_channel(&nick, &lowered);
        if let Some(client) = hub.clients.get_mut(&id) {
            client.channels.remove(&lowered);
        }
    }
}

pub fn list(hub: &mut Hub, id: ClientId, _args: &[String]) {
    let nick = hub.nickname_or_star(id);
    for channel in hub.channels.values() {
        hub.reply(
            id,
            numerics::REPLY_LIST_ITEM,
            &[Some(&nick), Some(&channel.name), Some(&channel.members.len().to_string())],
            Some(channel.topic()),
        );
    }
    hub.reply(id, numerics::REPLY_LIST_END, &[Some(&nick)], Some("End of /LIST"));
}

pub fn topic(hub: &mut Hub, id: ClientId, args: &[String]) {
    let Some(name) = args.first() else {
        hub.reply_not_enough_parameters(id, "TOPIC");
        return;
    };
    let lowered = irc_lower(name);
    let nick = hub.nickname_or_star(id);

    if !hub.channels.contains_key(&lowered) {
        hub.reply(id, numerics::UNKNOWN_CHANNEL, &[Some(&nick), Some(name)], Some("No such channel"));
        return;
    }

    match args.get(1) {
        None => {
            let topic = hub.channels.get(&lowered).unwrap().topic().to_string();
            if topic.is_empty() {
                hub.reply(id, numerics::REPLY_NO_TOPIC, &[Some(&nick), Some(name)], Some("No topic is set"));
            } else {
                hub.reply(id, numerics::REPLY_TOPIC, &[Some(&nick), Some(name)], Some(&topic));
            }
        }
        Some(new_topic) => {
            let canonical = hub.channels.get(&lowered).unwrap().name.clone();
            if let Some(channel) = hub.channels.get_mut(&lowered) {
                let _ = channel.set_topic(new_topic.clone());
            }
            hub.message_channel(&lowered, id, "TOPIC", &format!("{canonical} :{new_topic}"), true);
        }
    }
}

pub fn getchankey(hub: &mut Hub, id: ClientId, args: &[String]) {
    if args.len() < 4 {
        hub.reply_not_enough_parameters(id, "GETCHANKEY");
        return;
    }
    let (chan, tag, _cookie, key) = (&args[0], &args[1], &args[2], &args[3]);
    let lowered = irc_lower(chan);
    let Some(channel) = hub.channels.get(&lowered) else {
        let nick = hub.nickname_or_star(id);
        hub.reply(id, numerics::UNKNOWN_CHANNEL, &[Some(&nick), Some(chan)], Some("No such channel"));
        return;
    };

    let value = match key.as_str() {
        k if k == CHANKEY_WORLD_DATA => channel.serialized_world_data().unwrap_or_default().to_string(),
        k if k == CHANKEY_LOBBY => channel.serialized_lobby().unwrap_or_default().to_string(),
        k if k == CHANKEY_TIME => dwc_encode(&channel.started_at_time.to_le_bytes()),
        _ => String::new(),
    };

    hub.reply(
        id,
        numerics::SUCCESSFUL_CHAN_KEY_OP,
        &[Some(chan), Some(tag)],
        Some(&format!("{key}\\{value}")),
    );
}

pub fn setchankey(hub: &mut Hub, id: ClientId, args: &[String]) {
    if args.len() < 2 {
        hub.reply_not_enough_parameters(id, "SETCHANKEY");
        return;
    }
    let (chan, payload) = (&args[0], &args[1]);
    let lowered = irc_lower(chan);

    if payload.starts_with(CHANKEY_TIME) {
        return;
    }

    if let Some(serialized) = payload.strip_prefix(CHANKEY_LOBBY) {
        if serialized.len() > MAX_LOBBY_LEN {
            hub.disconnect(id, "WifiPlaza lobby data too long.");
            return;
        }
        if let Ok(bytes) = dwc_decode(serialized) {
            if let Err(err) = PkWifiLobby::from_serialized(&bytes) {
                tracing::error!(channel = %chan, %err, "malformed lobby payload, storing raw bytes anyway");
            }
        } else {
            tracing::error!(channel = %chan, "malformed DWC lobby payload, storing raw bytes anyway");
        }
        let channel = hub.get_or_create_channel(chan);
        let _ = channel.set_serialized_lobby(Some(serialized.to_string()));
        broadcast_chankey(hub, &lowered, chan, payload);
        return;
    }

    if let Some(serialized) = payload.strip_prefix(CHANKEY_WORLD_DATA) {
        if serialized.len() > MAX_WORLD_DATA_LEN {
            hub.disconnect(id, "WifiPlaza world data too long.");
            return;
        }
        if dwc_decode(serialized).is_err() {
            tracing::error!(channel = %chan, "malformed DWC world-data payload, storing raw bytes anyway");
        }
        let channel = hub.get_or_create_channel(chan);
        let _ = channel.set_serialized_world_data(Some(serialized.to_string()));
        broadcast_chankey(hub, &lowered, chan, payload);
    }
}

fn broadcast_chankey(hub: &mut Hub, lowered: &str, chan: &str, payload: &str) {
    let Some(channel) = hub.channels.get(lowered) else { return };
    let line = crate::irc::reply::format_reply(&hub.config.server_name, numerics::SUCCESSFUL_CHAN_KEY_OP, &[Some(chan), Some(chan), Some("BCAST")], Some(payload));
    for member_nick in channel.members.clone() {
        if let Some(&member_id) = hub.nicknames.get(&irc_lower(&member_nick)) {
            hub.send_line(member_id, line.clone());
        }
    }
}

pub fn setckey(hub: &mut Hub, id: ClientId, args: &[String]) {
    if args.len() < 3 {
        hub.reply_not_enough_parameters(id, "SETCKEY");
        return;
    }
    let (chan, cookie, payload) = (&args[0], &args[1], &args[2]);
    let lowered = irc_lower(chan);
    let Some(nick) = hub.clients.get(&id).and_then(|c| c.nickname.clone()) else { return };

    if let Some(value) = payload.strip_prefix(CKEY_USER) {
        if value.len() != USER_KEY_LEN {
            hub.disconnect(id, "WifiPlaza user key wrong length.");
            return;
        }
        let channel = hub.get_or_create_channel(chan);
        channel.client_keys.insert((nick.clone(), crate::channel::ClientKeySlot::User), value.to_string());
    } else if let Some(value) = payload.strip_prefix(CKEY_SYSTEM) {
        if value.len() > MAX_SYSTEM_KEY_LEN {
            hub.disconnect(id, "WifiPlaza system key too long.");
            return;
        }
        let channel = hub.get_or_create_channel(chan);
        channel.client_keys.insert((nick.clone(), crate::channel::ClientKeySlot::System), value.to_string());
    } else {
        return;
    }

    let line = crate::irc::reply::format_reply(
        &hub.config.server_name,
        numerics::SUCCESSFUL_CLIENT_KEY_OP,
        &[Some(chan), Some(chan), Some(cookie), Some("BCAST")],
        Some(payload),
    );
    if let Some(channel) = hub.channels.get(&lowered) {
        for member_nick in channel.members.clone() {
            if let Some(&member_id) = hub.nicknames.get(&irc_lower(&member_nick)) {
                hub.send_line(member_id, line.clone());
            }
        }
    }
}

pub fn getckey(hub: &mut Hub, id: ClientId, args: &[String]) {
    if args.len() < 5 {
        hub.reply_not_enough_parameters(id, "GETCKEY");
        return;
    }
    let (chan, target_nick, cookie, tag) = (&args[0], &args[1], &args[2], &args[4]);
    let lowered = irc_lower(chan);
    let Some(channel) = hub.channels.get(&lowered) else {
        let nick = hub.nickname_or_star(id);
        hub.reply(id, numerics::UNKNOWN_CHANNEL, &[Some(&nick), Some(chan)], Some("No such channel"));
        return;
    };

    let value = match tag.as_str() {
        t if t == CKEY_USER => channel.client_keys.get(&(target_nick.clone(), crate::channel::ClientKeySlot::User)).cloned(),
        t if t == CKEY_SYSTEM => channel.client_keys.get(&(target_nick.clone(), crate::channel::ClientKeySlot::System)).cloned(),
        _ => None,
    }
    .unwrap_or_default();

    let requester_nick = hub.nickname_or_star(id);
    hub.reply(
        id,
        numerics::SUCCESSFUL_CLIENT_KEY_OP,
        &[Some(&requester_nick), Some(chan), Some(target_nick), Some(cookie)],
        Some(&format!("\\{value}")),
    );
}
