//! Privilege drop and daemonization (spec §4.6 "Startup", §6 CLI
//! surface `--chroot`/`--setuid`/`--daemon`), grounded on
//! `original_source/source/server.py::start`/`daemonize` and the
//! `nix`-based privilege drop patterns used elsewhere in the retrieved
//! example pack.

use std::path::Path;

use anyhow::{bail, Context, Result};
use nix::unistd::{chdir, chroot, fork, setgid, setsid, setuid, ForkResult, Gid, Uid};

/// `user[:group]`, resolved once at startup before `chroot`/`setuid`
/// take effect (resolving after chroot would require `/etc/passwd`
/// inside the jail).
#[derive(Debug, Clone, Copy)]
pub struct SetuidTarget {
    pub uid: Uid,
    pub gid: Gid,
}

pub fn resolve_setuid_target(spec: &str) -> Result<SetuidTarget> {
    let (user, group) = match spec.split_once(':') {
        Some((user, group)) => (user, Some(group)),
        None => (spec, None),
    };

    let passwd = nix::unistd::User::from_name(user)
        .with_context(|| format!("looking up user {user:?}"))?
        .ok_or_else(|| anyhow::anyhow!("no such user: {user:?}"))?;

    let gid = match group {
        Some(group) => nix::unistd::Group::from_name(group)
            .with_context(|| format!("looking up group {group:?}"))?
            .ok_or_else(|| anyhow::anyhow!("no such group: {group:?}"))?
            .gid,
        None => passwd.gid,
    };

    Ok(SetuidTarget { uid: passwd.uid, gid })
}

/// Refuse to run as root unless the operator explicitly asked to drop
/// privileges with `--setuid` (spec §4.6: "Refusing to run as root
/// unless `--setuid` ... is explicitly given").
pub fn refuse_unwanted_root(setuid: Option<&SetuidTarget>) -> Result<()> {
    if Uid::effective().is_root() && setuid.is_none() {
        bail!("refusing to run as root without --setuid; pass --setuid root:root to override");
    }
    Ok(())
}

pub fn chroot_into(path: &Path) -> Result<()> {
    chdir(path).with_context(|| format!("chdir into chroot target {}", path.display()))?;
    chroot(path).with_context(|| format!("chroot to {}", path.display()))?;
    chdir("/").context("chdir to / inside chroot jail")?;
    Ok(())
}

pub fn drop_privileges(target: SetuidTarget) -> Result<()> {
    setgid(target.gid).context("setgid failed")?;
    setuid(target.uid).context("setuid failed")?;
    Ok(())
}

/// Classic double-fork daemonization (spec §4.6 `-d/--daemon`).
///
/// Safety: must run before the Tokio runtime starts any worker
/// threads — forking a multi-threaded process is unsound.
pub fn daemonize() -> Result<()> {
    // SAFETY: called before the async runtime spawns any threads.
    match unsafe { fork() }.context("first fork")? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {}
    }
    setsid().context("setsid")?;
    // SAFETY: same as above; still single-threaded at this point.
    match unsafe { fork() }.context("second fork")? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {}
    }
    chdir("/").context("chdir to / before daemonizing")?;

    redirect_standard_streams_to_dev_null()
}

fn redirect_standard_streams_to_dev_null() -> Result<()> {
    use std::fs::OpenOptions;
    use std::os::fd::AsRawFd;

    let dev_null = OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/null")
        .context("opening /dev/null")?;
    let fd = dev_null.as_raw_fd();
    for target in [0, 1, 2] {
        nix::unistd::dup2(fd, target).context("redirecting standard stream to /dev/null")?;
    }
    Ok(())
}
