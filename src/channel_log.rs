//! Per-channel chat logs (spec §6 "Channel logs"), grounded on
//! `original_source/source/connected_client.py::channel_log`.

use std::io::Write;
use std::path::Path;

use chrono::Utc;

use crate::state_file::mangle_name;

/// Append one line to `<dir>/<mangled-name>.log`.
///
/// `meta` selects between a chat line (`<nick> text`) and a meta event
/// line (`* <nick> text`), matching the reference formats exactly.
pub fn append(dir: &Path, channel_name: &str, nickname: &str, message: &str, meta: bool) {
    let path = dir.join(format!("{}.log", mangle_name(channel_name)));
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    let line = if meta {
        format!("[{timestamp}] * {nickname} {message}\n")
    } else {
        format!("[{timestamp}] <{nickname}> {message}\n")
    };

    let result = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut file| file.write_all(line.as_bytes()));

    if let Err(err) = result {
        tracing::warn!(path = %path.display(), error = %err, "failed to append to channel log");
    }
}
