//! The launcher's exit-code contract.
//!
//! Two values are reserved for the tool itself; every other exit code is
//! the remote shell's own status, forwarded verbatim so scripts wrapping
//! `oc-mosh` observe the same result they would get from a local shell.
//!
//! Known ambiguity, documented rather than resolved: a remote shell that
//! itself exits with 254 or 255 is indistinguishable from these sentinels.
//! Callers that need to tell the cases apart must consult stderr, where
//! launcher failures are always reported.

use std::fmt;

/// Exit codes owned by the launcher.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful completion.
    Success = 0,

    /// Invalid command-line arguments: malformed target, malformed port
    /// range, or an unknown flag.
    InvalidArguments = 254,

    /// Initial ssh connection or mosh handshake setup failed.
    ConnectionFailure = 255,
}

impl ExitCode {
    /// Returns the numeric exit code.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns a short description of the code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InvalidArguments => "invalid command line arguments",
            Self::ConnectionFailure => "connection setup failure",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
