//! MOTD file reading (spec §4.5 "Welcome burst", §6), grounded on
//! `original_source/source/server.py::get_motd_lines`.

use std::path::Path;

/// Read the message-of-the-day file, one line per returned entry. A
/// missing or unreadable file yields a single explanatory line rather
/// than an error — callers report `NoMOTD` only when the file was
/// never configured.
pub fn read_motd_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents.lines().map(str::to_string).collect(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not read MOTD file");
            vec![format!("Could not read MOTD file {:?}.", path.display())]
        }
    }
}
