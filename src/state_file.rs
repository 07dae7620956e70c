//! Channel state-file persistence (spec §4.4, §6 "Persistent state
//! layout", §9 "State-file loading").
//!
//! Grounded on `original_source/source/channel.py`'s `__read_state`/
//! `__write_state`, with one deliberate deviation: the original loads
//! state by `exec()`-ing the file as Python, which is a known security
//! issue. This module is a strict four-key line parser instead — it
//! never evaluates file contents as code.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// The four persisted fields of a [`crate::channel::Channel`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelState {
    pub topic: String,
    pub key: Option<String>,
    pub serialized_lobby: Option<String>,
    pub serialized_world_data: Option<String>,
}

/// Map a channel name onto its on-disk file name: `_` doubles, `/`
/// becomes `_` (spec §6).
pub fn mangle_name(channel_name: &str) -> String {
    channel_name.replace('_', "__").replace('/', "_")
}

pub fn state_path(state_dir: &Path, channel_name: &str) -> PathBuf {
    state_dir.join(mangle_name(channel_name))
}

/// Read and parse a state file, if present. A missing file is not an
/// error: it just means there's nothing to restore yet.
pub fn read_state(path: &Path) -> io::Result<Option<ChannelState>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };

    let mut state = ChannelState::default();
    for line in contents.lines() {
        let Some((key, value)) = line.split_once(" = ") else {
            continue;
        };
        let value = if value == "None" { None } else { Some(value.to_string()) };
        match key {
            "topic" => state.topic = value.unwrap_or_default(),
            "key" => state.key = value,
            "serialized_lobby" => state.serialized_lobby = value,
            "serialized_world_data" => state.serialized_world_data = value,
            _ => continue,
        }
    }
    Ok(Some(state))
}

/// Write a state file atomically: a temp file in the same directory,
/// then an atomic rename over the destination (spec §4.4 invariant).
pub fn write_state(path: &Path, state: &ChannelState) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    use std::io::Write;
    writeln!(tmp, "topic = {}", state.topic)?;
    writeln!(tmp, "key = {}", render(&state.key))?;
    writeln!(tmp, "serialized_lobby = {}", render(&state.serialized_lobby))?;
    writeln!(
        tmp,
        "serialized_world_data = {}",
        render(&state.serialized_world_data)
    )?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn render(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangles_channel_name() {
        assert_eq!(mangle_name("#a_b/c"), "#a__b_c");
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_state(&dir.path().join("nope")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn write_then_read_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state");
        let state = ChannelState {
            topic: "hello".to_string(),
            key: Some("secret".to_string()),
            serialized_lobby: None,
            serialized_world_data: Some("abcd".to_string()),
        };
        write_state(&path, &state).unwrap();
        let loaded = read_state(&path).unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn write_is_atomic_via_rename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state");
        write_state(&path, &ChannelState { topic: "first".to_string(), ..Default::default() }).unwrap();
        write_state(&path, &ChannelState { topic: "second".to_string(), ..Default::default() }).unwrap();
        let loaded = read_state(&path).unwrap().unwrap();
        assert_eq!(loaded.topic, "second");
        let siblings: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(siblings.len(), 1, "no leftover temp file");
    }
}
