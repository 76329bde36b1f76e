//! The connection-failure taxonomy.
//!
//! Everything that can go wrong after argument parsing funnels into
//! [`LaunchError`]. The CLI reports the error once at its top-level
//! boundary and maps it onto exit code 255; nothing in this crate retries.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use mosh_transport::{CommandError, HandshakeError};

use crate::exit_code::ExitCode;
use crate::launcher::ClientNotFoundError;

/// Failures raised while establishing or handing off a session.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// A configured command string used quoting inconsistently.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The handshake subprocess failed or never produced a handshake line.
    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    /// Asking the system resolver about the target host failed.
    #[error("failed to resolve host {host:?}: {source}")]
    HostLookup {
        /// The host that could not be resolved.
        host: String,
        /// The resolver failure.
        #[source]
        source: io::Error,
    },

    /// The resolver answered but returned no usable address.
    #[error("host {host:?} did not resolve to any address")]
    HostUnresolved {
        /// The host that resolved to nothing.
        host: String,
    },

    /// No strategy located the client executable.
    #[error(transparent)]
    ClientNotFound(#[from] ClientNotFoundError),

    /// The client executable was found but could not be started.
    #[error("failed to start {}: {source}", .program.display())]
    LaunchFailed {
        /// The executable that failed to start.
        program: PathBuf,
        /// The underlying spawn failure.
        #[source]
        source: io::Error,
    },

    /// The client was killed by a signal and reported no exit code.
    #[error("{} terminated by a signal before reporting an exit status", .program.display())]
    ClientTerminated {
        /// The executable that died.
        program: PathBuf,
    },
}

impl LaunchError {
    /// Returns the exit code this failure maps onto.
    ///
    /// The whole taxonomy is a connection-setup failure; invalid arguments
    /// are rejected before a `LaunchError` can exist.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Command(_)
            | Self::Handshake(_)
            | Self::HostLookup { .. }
            | Self::HostUnresolved { .. }
            | Self::ClientNotFound(_)
            | Self::LaunchFailed { .. }
            | Self::ClientTerminated { .. } => ExitCode::ConnectionFailure,
        }
    }
}
