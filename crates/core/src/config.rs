//! Typed session configuration.
//!
//! The CLI parses its flags into a [`SessionConfig`]; everything downstream
//! works from this struct instead of raw strings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::target::Target;

/// Default command used to reach the remote host.
pub const DEFAULT_SSH_COMMAND: &str = "ssh";

/// Default command that starts the session server on the remote host.
pub const DEFAULT_SERVER_COMMAND: &str = "mosh-server";

/// A server-side UDP port or inclusive port range.
///
/// Parsed from `NNNNN` or `NNNNN:NNNNN` with one to five digits per part.
///
/// # Examples
///
/// ```
/// use mosh_core::PortRange;
///
/// let range: PortRange = "60000:61000".parse().unwrap();
/// assert_eq!(range.to_string(), "60000:61000");
///
/// let single: PortRange = "60123".parse().unwrap();
/// assert_eq!(single.to_string(), "60123");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PortRange {
    low: u16,
    high: u16,
}

impl PortRange {
    /// The default server-side range requested when none is specified.
    pub const DEFAULT: Self = Self {
        low: 60000,
        high: 61000,
    };

    /// Returns the lower bound.
    #[must_use]
    pub const fn low(self) -> u16 {
        self.low
    }

    /// Returns the upper bound; equal to the lower bound for a single port.
    #[must_use]
    pub const fn high(self) -> u16 {
        self.high
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}:{}", self.low, self.high)
        }
    }
}

impl FromStr for PortRange {
    type Err = PortRangeParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PortRangeParseError::Empty);
        }

        let (low, high) = match trimmed.split_once(':') {
            Some((low, high)) => (parse_port(low)?, parse_port(high)?),
            None => {
                let port = parse_port(trimmed)?;
                (port, port)
            }
        };

        if low > high {
            return Err(PortRangeParseError::Inverted { low, high });
        }

        Ok(Self { low, high })
    }
}

fn parse_port(text: &str) -> Result<u16, PortRangeParseError> {
    let invalid = || PortRangeParseError::InvalidPort(text.to_owned());

    if text.is_empty() || text.len() > 5 || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }

    match text.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(invalid()),
    }
}

/// Errors produced while parsing a port range.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum PortRangeParseError {
    /// The range string was empty.
    #[error("port range is empty")]
    Empty,
    /// One of the bounds was not a port number between 1 and 65535.
    #[error("invalid port {0:?} (expected 1-65535)")]
    InvalidPort(String),
    /// The lower bound exceeded the upper bound.
    #[error("port range {low}:{high} is inverted")]
    Inverted {
        /// The parsed lower bound.
        low: u16,
        /// The parsed upper bound.
        high: u16,
    },
}

/// Prediction display mode forwarded to the client.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PredictionMode {
    /// Predict locally when the link feels slow.
    #[default]
    Adaptive,
    /// Always predict locally.
    Always,
    /// Never predict locally.
    Never,
}

impl PredictionMode {
    /// Returns the mode spelling used on the command line and in the
    /// client's environment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for PredictionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredictionMode {
    type Err = PredictionModeParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "adaptive" => Ok(Self::Adaptive),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(PredictionModeParseError(other.to_owned())),
        }
    }
}

/// Error produced for an unknown prediction mode spelling.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown prediction mode {0:?} (expected adaptive, always, or never)")]
pub struct PredictionModeParseError(String);

/// Everything one invocation needs to establish a session.
///
/// Built by the CLI from the parsed command line; consumed once by
/// [`crate::client::run_session`].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// The remote endpoint.
    pub target: Target,
    /// Server-side UDP port or range requested from the remote server.
    pub port_range: PortRange,
    /// Free-form command used to reach the remote host.
    pub ssh_command: String,
    /// Free-form command that starts the session server remotely.
    pub server_command: String,
    /// Explicit client executable override, when given.
    pub client_path: Option<PathBuf>,
    /// Prediction display mode forwarded to the client.
    pub predict: PredictionMode,
    /// Suppress terminal initialisation in the client.
    pub no_term_init: bool,
}

impl SessionConfig {
    /// Creates a configuration for `target` with every option at its
    /// default.
    #[must_use]
    pub fn new(target: Target) -> Self {
        Self {
            target,
            port_range: PortRange::DEFAULT,
            ssh_command: DEFAULT_SSH_COMMAND.to_owned(),
            server_command: DEFAULT_SERVER_COMMAND.to_owned(),
            client_path: None,
            predict: PredictionMode::default(),
            no_term_init: false,
        }
    }
}
