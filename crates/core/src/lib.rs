#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `mosh_core` turns a parsed invocation into a running mosh session. It
//! owns everything between argument parsing (the CLI crate's job) and the
//! subprocess plumbing (the transport crate's job): the typed session
//! configuration, the single linear orchestration pass, host resolution,
//! the launch environment handed to `mosh-client`, client path resolution,
//! and the launcher's exit-code contract.
//!
//! # Design
//!
//! One invocation is one pass through [`client::run_session`]: tokenize the
//! secure-shell command, assemble the remote server-start command, negotiate
//! the handshake, resolve the target host, build the environment, locate
//! and launch the client, and forward its exit code. No state is re-entered
//! and nothing is retried; every failure maps onto the connection-failure
//! exit code at the CLI boundary.
//!
//! # Invariants
//!
//! - [`exit_code::ExitCode`] reserves 254 for invalid arguments and 255 for
//!   connection failures; every other value belongs to the remote shell.
//! - The [`env::LaunchEnvironment`] is built fresh per invocation, merged
//!   additively into the client's inherited environment, and never
//!   persisted.
//! - Subprocess handles never outlive the call that created them.

pub mod client;
pub mod config;
mod console;
pub mod env;
pub mod error;
pub mod exit_code;
pub mod launcher;
pub mod resolve;
pub mod target;
pub mod version;

pub use client::run_session;
pub use config::{PortRange, PredictionMode, SessionConfig};
pub use error::LaunchError;
pub use exit_code::ExitCode;
pub use target::Target;
