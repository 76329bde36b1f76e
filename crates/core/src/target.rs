//! Remote target parsing.
//!
//! A target names the remote endpoint as `user@host`. Both parts are
//! required: the user becomes `MOSH_USER` in the client environment and the
//! host is resolved to an address just before handoff.

use std::fmt;

use thiserror::Error;

/// The `user@host` identifier naming the remote endpoint.
///
/// # Examples
///
/// ```
/// use mosh_core::Target;
///
/// let target = Target::parse("alice@example.com").unwrap();
/// assert_eq!(target.user(), "alice");
/// assert_eq!(target.host(), "example.com");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Target {
    user: String,
    host: String,
}

impl Target {
    /// Parses a `user@host` string.
    ///
    /// The input is trimmed first. Both parts must be non-empty, neither may
    /// contain whitespace, and exactly one `@` may appear. The host may be
    /// an IP literal or a DNS name; it is not resolved here.
    ///
    /// # Errors
    ///
    /// Returns [`TargetParseError`] describing the first violated rule.
    pub fn parse(text: &str) -> Result<Self, TargetParseError> {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Err(TargetParseError::Empty);
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(TargetParseError::Whitespace(trimmed.to_owned()));
        }

        let Some((user, host)) = trimmed.split_once('@') else {
            return Err(TargetParseError::MissingSeparator(trimmed.to_owned()));
        };

        if user.is_empty() {
            return Err(TargetParseError::MissingUser(trimmed.to_owned()));
        }
        if host.is_empty() {
            return Err(TargetParseError::MissingHost(trimmed.to_owned()));
        }
        if host.contains('@') {
            return Err(TargetParseError::ExtraSeparator(trimmed.to_owned()));
        }

        Ok(Self {
            user: user.to_owned(),
            host: host.to_owned(),
        })
    }

    /// Returns the remote user name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the remote host name or IP literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.host)
    }
}

/// Errors produced while parsing a target.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TargetParseError {
    /// The target string was empty.
    #[error("target is empty; expected user@host")]
    Empty,
    /// The target contained whitespace.
    #[error("target {0:?} contains whitespace")]
    Whitespace(String),
    /// The target carried no `@` separator.
    #[error("target {0:?} must take the form user@host")]
    MissingSeparator(String),
    /// The user part before `@` was empty.
    #[error("target {0:?} is missing the user part")]
    MissingUser(String),
    /// The host part after `@` was empty.
    #[error("target {0:?} is missing the host part")]
    MissingHost(String),
    /// More than one `@` appeared.
    #[error("target {0:?} contains more than one '@'")]
    ExtraSeparator(String),
}
