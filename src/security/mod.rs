//! Security-adjacent glue: optional TLS wrapping and privilege drop.
//!
//! - `tls` (gated behind the `tls` feature): wraps accepted sockets for
//!   `-s/--ssl-pem-file` (spec §6, §4.6 "optionally wrap in TLS").
//! - `privileges`: chroot/setuid/daemonize for the CLI surface the
//!   specification treats as an external collaborator (spec §1, §4.6).

pub mod privileges;
pub mod tls;

#[cfg(feature = "tls")]
pub use tls::build_tls_acceptor;
