//! Numeric reply codes (spec §4.3), grounded on
//! `original_source/source/irc_helpers.py::IRCStatusCode`.

#![allow(dead_code)]

pub const REPLY_WELCOME: u16 = 1;
pub const REPLY_SEND_HOST: u16 = 2;
pub const REPLY_SERVER_CREATED_AT: u16 = 3;
pub const REPLY_MY_INFO: u16 = 4;

pub const UNKNOWN_TARGET: u16 = 401;
pub const NO_RECEIPENT: u16 = 411;
pub const NO_MESSAGE: u16 = 412;
pub const UNKNOWN_COMMAND: u16 = 421;
pub const NO_MOTD: u16 = 422;
pub const NICKNAME_INVALID: u16 = 432;
pub const NICKNAME_IN_USE: u16 = 433;
pub const UNKNOWN_CHANNEL: u16 = 403;
pub const NOT_IN_CHANNEL: u16 = 442;
pub const NOT_ENOUGH_PARAMETERS: u16 = 461;
pub const PASSWORD_INCORRECT: u16 = 464;
pub const INCORRECT_KEY: u16 = 475;
pub const UNKNOWN_MODE: u16 = 501;

pub const REPLY_LUSERS: u16 = 251;
pub const REPLY_CLIENT_MODE: u16 = 221;
pub const NO_ORIGIN: u16 = 409;
pub const NO_NICKNAME_GIVEN: u16 = 431;

pub const REPLY_WHOIS_USER: u16 = 311;
pub const REPLY_WHOIS_SERVER: u16 = 312;
pub const REPLY_WHOIS_CHANNELS: u16 = 319;
pub const REPLY_WHOIS_END: u16 = 318;
pub const REPLY_WHO_MEMBER: u16 = 352;
pub const REPLY_WHO_END: u16 = 315;

pub const REPLY_LIST_ITEM: u16 = 322;
pub const REPLY_LIST_END: u16 = 323;

pub const REPLY_NO_TOPIC: u16 = 331;
pub const REPLY_TOPIC: u16 = 332;
pub const REPLY_MODE: u16 = 324;

pub const REPLY_NAME_REPLY: u16 = 353;
pub const REPLY_END_OF_NAMES: u16 = 366;
pub const REPLY_IS_ON: u16 = 303;
pub const REPLY_UNAWAY: u16 = 305;
pub const REPLY_NOW_AWAY: u16 = 306;

pub const MOTD_START: u16 = 375;
pub const MOTD_PART: u16 = 372;
pub const MOTD_END: u16 = 376;

pub const SUCCESSFUL_CHAN_KEY_OP: u16 = 704;
pub const SUCCESSFUL_CLIENT_KEY_OP: u16 = 702;
