//! Nickname and channel name validation (spec §4.3), grounded on
//! `original_source/source/irc_helpers.py`'s `VALID_NICKNAME_REGEXP` and
//! `VALID_CHANNELNAME_REGEXP`.

use regex::Regex;
use std::sync::OnceLock;

fn nickname_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[]\[`_^{|}A-Za-z][]\[`_^{|}A-Za-z0-9-]{0,50}$").expect("valid regex")
    })
}

fn channel_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[&#+!][^\x00\x07\x0a\x0d ,:]{0,50}$").expect("valid regex"))
}

pub fn is_valid_nickname(candidate: &str) -> bool {
    nickname_regex().is_match(candidate)
}

pub fn is_valid_channel_name(candidate: &str) -> bool {
    channel_name_regex().is_match(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_nicknames() {
        for nick in ["Bob", "bob123", "[Squad]", "a", "_under_", "a-b-c"] {
            assert!(is_valid_nickname(nick), "{nick} should be valid");
        }
    }

    #[test]
    fn rejects_bad_nicknames() {
        for nick in ["", "1bob", "has space", &"x".repeat(52)] {
            assert!(!is_valid_nickname(nick), "{nick:?} should be invalid");
        }
    }

    #[test]
    fn accepts_ordinary_channel_names() {
        for chan in ["#lobby", "&local", "+speakers", "!12345abc"] {
            assert!(is_valid_channel_name(chan), "{chan} should be valid");
        }
    }

    #[test]
    fn rejects_bad_channel_names() {
        for chan in ["lobby", "#has space", "#has,comma", "#has:colon"] {
            assert!(!is_valid_channel_name(chan), "{chan:?} should be invalid");
        }
    }
}
