//! PID file creation (spec §6 "PID file"), grounded on
//! `original_source/source/server.py::make_pid_file`.

use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use anyhow::{Context, Result};

/// Create `path` with `O_CREAT|O_EXCL|0o644` and write the current
/// PID. Failure is fatal to startup (spec §6).
pub fn write_pid_file(path: &Path) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o644)
        .open(path)
        .with_context(|| format!("could not create PID file {}", path.display()))?;
    writeln!(file, "{}", std::process::id())
        .with_context(|| format!("could not write PID file {}", path.display()))?;
    Ok(())
}
