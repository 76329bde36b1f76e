#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `mosh_transport` owns the subprocess plumbing of the `oc-mosh` launcher:
//! decomposing free-form command strings into something spawnable, re-quoting
//! tokens so they survive reassembly into a single command line, and driving
//! the secure-shell subprocess through the `MOSH CONNECT` handshake.
//!
//! # Design
//!
//! The crate exposes two modules:
//!
//! - [`command`] provides [`split_command`] and [`quote_if_needed`], the
//!   string-level helpers that turn configuration such as `--ssh "ssh -p
//!   2222"` into a [`CommandSpec`] and assemble the remote server-start
//!   command line.
//! - [`handshake`] provides [`negotiate`], which spawns the secure-shell
//!   client with its stdout piped, scans that stream line by line for the
//!   handshake, and returns the captured [`HandshakeResult`].
//!
//! # Invariants
//!
//! - A spawned handshake subprocess is always reaped before [`negotiate`]
//!   returns; error paths fall back to a kill-and-wait guard so no zombie is
//!   left behind.
//! - Handshake lines are consumed strictly in the order the subprocess wrote
//!   them; when several handshake-shaped lines appear the last one wins.
//! - The subprocess's stderr is never piped without a reader: it stays
//!   attached to the launcher's own stderr so authentication prompts and
//!   diagnostics remain visible.
//!
//! # Errors
//!
//! Both modules surface dedicated error enums ([`CommandError`],
//! [`HandshakeError`]) rather than panicking; callers map them onto the
//! launcher's connection-failure exit code.

pub mod command;
pub mod handshake;

pub use command::{CommandError, CommandSpec, quote_if_needed, split_command};
pub use handshake::{HandshakeError, HandshakeResult, negotiate, parse_connect_line};
