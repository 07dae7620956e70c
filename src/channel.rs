//! Channel state (spec §3, §4.4), grounded on
//! `original_source/source/channel.py`.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::codec::dwc::dwc_encode;
use crate::lobby::generate_random_lobby;
use crate::state_file::{self, ChannelState};

/// Seconds since the Nintendo epoch. Kept as a constant for
/// compatibility with clients that expect this exact value
/// (spec §3 "preserved verbatim for compatibility").
pub const DEFAULT_STARTED_AT_TIME: u64 = 560_470_305;

/// Which of a member's two key slots a `SETCKEY`/`GETCKEY` call refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKeySlot {
    User,
    System,
}

pub struct Channel {
    /// Canonical-cased name as first seen.
    pub name: String,
    pub members: HashSet<String>,
    topic: String,
    key: Option<String>,
    serialized_lobby: Option<String>,
    serialized_world_data: Option<String>,
    pub started_at_time: u64,
    pub client_keys: HashMap<(String, ClientKeySlot), String>,
    state_path: Option<PathBuf>,
}

impl Channel {
    /// Construct a new channel, restoring persisted state if a state
    /// directory is configured and a state file already exists;
    /// otherwise seed a freshly generated lobby unless `respect_web` is
    /// set (spec §3, glossary "Respect-web").
    pub fn new<R: Rng + ?Sized>(
        name: String,
        state_dir: Option<&Path>,
        respect_web: bool,
        rng: &mut R,
    ) -> std::io::Result<Self> {
        let state_path = state_dir.map(|dir| state_file::state_path(dir, &name));
        let restored = match &state_path {
            Some(path) => state_file::read_state(path)?,
            None => None,
        };

        let (topic, key, serialized_lobby, serialized_world_data) = match restored {
            Some(state) => (
                state.topic,
                state.key,
                state.serialized_lobby,
                state.serialized_world_data,
            ),
            None => {
                let serialized_lobby = if respect_web {
                    None
                } else {
                    Some(dwc_encode(&generate_random_lobby(rng).to_serialized()))
                };
                (String::new(), None, serialized_lobby, None)
            }
        };

        Ok(Self {
            name,
            members: HashSet::new(),
            topic,
            key,
            serialized_lobby,
            serialized_world_data,
            started_at_time: DEFAULT_STARTED_AT_TIME,
            client_keys: HashMap::new(),
            state_path,
        })
    }

    pub fn add_member(&mut self, nickname: &str) {
        self.members.insert(nickname.to_string());
    }

    /// Drop a member; returns `true` if the channel is now empty and
    /// should be garbage-collected by the caller (spec §4.4, invariant 1).
    pub fn remove_member(&mut self, nickname: &str) -> bool {
        self.members.remove(nickname);
        self.members.is_empty()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn set_topic(&mut self, value: String) -> std::io::Result<()> {
        self.topic = value;
        self.persist()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn set_key(&mut self, value: Option<String>) -> std::io::Result<()> {
        self.key = value;
        self.persist()
    }

    pub fn serialized_lobby(&self) -> Option<&str> {
        self.serialized_lobby.as_deref()
    }

    pub fn set_serialized_lobby(&mut self, value: Option<String>) -> std::io::Result<()> {
        self.serialized_lobby = value;
        self.persist()
    }

    pub fn serialized_world_data(&self) -> Option<&str> {
        self.serialized_world_data.as_deref()
    }

    pub fn set_serialized_world_data(&mut self, value: Option<String>) -> std::io::Result<()> {
        self.serialized_world_data = value;
        self.persist()
    }

    fn persist(&self) -> std::io::Result<()> {
        let Some(path) = &self.state_path else {
            return Ok(());
        };
        state_file::write_state(
            path,
            &ChannelState {
                topic: self.topic.clone(),
                key: self.key.clone(),
                serialized_lobby: self.serialized_lobby.clone(),
                serialized_world_data: self.serialized_world_data.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_channel_without_state_dir_gets_random_lobby() {
        let mut rng = StdRng::seed_from_u64(7);
        let channel = Channel::new("#room".to_string(), None, false, &mut rng).unwrap();
        assert!(channel.serialized_lobby().is_some());
        assert_eq!(channel.started_at_time, DEFAULT_STARTED_AT_TIME);
    }

    #[test]
    fn respect_web_leaves_lobby_absent() {
        let mut rng = StdRng::seed_from_u64(7);
        let channel = Channel::new("#room".to_string(), None, true, &mut rng).unwrap();
        assert!(channel.serialized_lobby().is_none());
    }

    #[test]
    fn removing_last_member_reports_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut channel = Channel::new("#room".to_string(), None, true, &mut rng).unwrap();
        channel.add_member("alice");
        assert!(!channel.remove_member("alice"));
        channel.add_member("alice");
        channel.add_member("bob");
        assert!(!channel.remove_member("alice"));
        assert!(channel.remove_member("bob"));
    }

    #[test]
    fn setters_persist_to_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut channel =
            Channel::new("#room".to_string(), Some(dir.path()), true, &mut rng).unwrap();
        channel.set_topic("hello".to_string()).unwrap();

        let path = crate::state_file::state_path(dir.path(), "#room");
        let restored = crate::state_file::read_state(&path).unwrap().unwrap();
        assert_eq!(restored.topic, "hello");
    }

    #[test]
    fn state_is_restored_on_reconstruction() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        {
            let mut channel =
                Channel::new("#room".to_string(), Some(dir.path()), true, &mut rng).unwrap();
            channel.set_key(Some("shh".to_string())).unwrap();
        }
        let channel = Channel::new("#room".to_string(), Some(dir.path()), true, &mut rng).unwrap();
        assert_eq!(channel.key(), Some("shh"));
    }
}
