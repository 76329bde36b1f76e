//! The environment handed to the session client.
//!
//! The client learns the negotiated session key, the remote user, and the
//! optional display tweaks exclusively through environment variables. The
//! mapping is built fresh for each invocation and merged additively on top
//! of the inherited environment; nothing already exported is dropped.

use std::collections::BTreeMap;
use std::process::Command;

use crate::config::PredictionMode;

/// Variable carrying the negotiated session key.
pub const MOSH_KEY_ENV: &str = "MOSH_KEY";

/// Variable carrying the remote user identity.
pub const MOSH_USER_ENV: &str = "MOSH_USER";

/// Variable selecting the client's prediction display mode.
pub const MOSH_PREDICTION_ENV: &str = "MOSH_PREDICTION_DISPLAY";

/// Variable suppressing terminal initialisation in the client.
pub const MOSH_NO_TERM_INIT_ENV: &str = "MOSH_NO_TERM_INIT";

/// Additive environment for one client launch.
#[derive(Clone, Debug)]
pub struct LaunchEnvironment {
    vars: BTreeMap<String, String>,
}

impl LaunchEnvironment {
    /// Creates the environment with the two mandatory variables.
    #[must_use]
    pub fn new(key: &str, user: &str) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert(MOSH_KEY_ENV.to_owned(), key.to_owned());
        vars.insert(MOSH_USER_ENV.to_owned(), user.to_owned());
        Self { vars }
    }

    /// Records the prediction display mode.
    pub fn set_prediction(&mut self, mode: PredictionMode) {
        self.vars
            .insert(MOSH_PREDICTION_ENV.to_owned(), mode.as_str().to_owned());
    }

    /// Asks the client to skip terminal initialisation.
    pub fn set_no_term_init(&mut self) {
        self.vars
            .insert(MOSH_NO_TERM_INIT_ENV.to_owned(), "1".to_owned());
    }

    /// Returns the value recorded for `name`, when present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Iterates the recorded variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of recorded variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Reports whether no variables are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Merges the recorded variables into `command` without clearing the
    /// environment it inherits.
    pub fn apply(&self, command: &mut Command) {
        for (name, value) in &self.vars {
            command.env(name, value);
        }
    }
}
