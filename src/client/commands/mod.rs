//! REGISTERED-state command dispatch table (spec §4.5 "Command dispatch
//! table"), grounded on `original_source/source/connected_client.py`'s
//! `__command_handler` table and the four `original_source/source/commands/`
//! modules it dispatches into. Split into submodules mirroring that layout.

pub mod channel;
pub mod channel_or_session;
pub mod global_commands;
pub mod session;

use crate::client::ClientId;
use crate::hub::Hub;

pub fn dispatch(hub: &mut Hub, id: ClientId, command: &str, args: &[String]) {
    match command {
        "JOIN" => channel::join(hub, id, args),
        "PART" => channel::part(hub, id, args),
        "LIST" => channel::list(hub, id, args),
        "TOPIC" => channel::topic(hub, id, args),
        "GETCHANKEY" => channel::getchankey(hub, id, args),
        "SETCHANKEY" => channel::setchankey(hub, id, args),
        "GETCKEY" => channel::getckey(hub, id, args),
        "SETCKEY" => channel::setckey(hub, id, args),

        "MODE" => channel_or_session::mode(hub, id, args),
        "PRIVMSG" => channel_or_session::privmsg_or_notice(hub, id, args, "PRIVMSG"),
        "NOTICE" => channel_or_session::privmsg_or_notice(hub, id, args, "NOTICE"),
        "UTM" => channel_or_session::utm(hub, id, args),

        "LUSERS" => global_commands::lusers(hub, id),
        "MOTD" => global_commands::motd(hub, id),
        "NAMES" => global_commands::names(hub, id, args),
        "PING" => global_commands::ping(hub, id, args),
        "PONG" => global_commands::pong(),
        "WALLOPS" => global_commands::wallops(hub, id, args),
        "WHO" => global_commands::who(hub, id, args),
        "WHOIS" => global_commands::whois(hub, id, args),

        "AWAY" => session::away(hub, id, args),
        "ISON" => session::ison(hub, id, args),
        "NICK" => session::nick(hub, id, args),
        "QUIT" => session::quit(hub, id, args),

        other => {
            let nick = hub.nickname_or_star(id);
            hub.reply(
                id,
                crate::irc::numerics::UNKNOWN_COMMAND,
                &[Some(&nick), Some(other)],
                Some("Unknown command"),
            );
        }
    }
}
