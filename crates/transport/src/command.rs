//! Command string decomposition and token re-quoting.
//!
//! Remote-shell configuration reaches the launcher as single free-form
//! strings (`ssh -p 2222`, `'my ssh' -v`). [`split_command`] decomposes such
//! a string into a program name and a raw argument string without a full
//! shell grammar; quoting support exists so program paths containing spaces
//! can be expressed. [`quote_if_needed`] performs the reverse duty when a
//! list of tokens is reassembled into the one command-line string handed to
//! the secure-shell client as the remote command.

use std::borrow::Cow;

use thiserror::Error;

/// A command decomposed into a program name and its raw argument string.
///
/// `arguments` is empty when the source string carried none. The string is
/// kept raw; [`CommandSpec::argument_tokens`] splits it on whitespace runs
/// when an argv is needed. Quoted whitespace inside individual argument
/// tokens is not supported by this simple splitter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandSpec {
    program: String,
    arguments: String,
}

impl CommandSpec {
    /// Creates a command spec from already-separated parts.
    #[must_use]
    pub fn new(program: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            arguments: arguments.into(),
        }
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the raw argument string, empty when the command had none.
    #[must_use]
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Splits the raw argument string into whitespace-separated tokens.
    pub fn argument_tokens(&self) -> impl Iterator<Item = &str> {
        self.arguments.split_whitespace()
    }
}

/// Errors produced while decomposing a command string.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CommandError {
    /// The command string used quote characters inconsistently.
    #[error("invalid command string: {input}")]
    Malformed {
        /// The offending input, trimmed.
        input: String,
    },
}

/// Splits a free-form command string into a program name and an argument
/// string.
///
/// Inputs shorter than three characters pass through whole. A leading `'` or
/// `"` starts a quoted program name: the matching closing quote must not be
/// adjacent to the opening one and must be followed by whitespace or the end
/// of the string. Unquoted input splits at the first whitespace run. Quote
/// checking runs before the no-whitespace shortcut so an unbalanced quoted
/// program fails instead of passing through.
///
/// # Errors
///
/// Returns [`CommandError::Malformed`] when quoting is inconsistent.
///
/// # Examples
///
/// ```
/// use mosh_transport::split_command;
///
/// let spec = split_command("'my ssh' -v").unwrap();
/// assert_eq!(spec.program(), "my ssh");
/// assert_eq!(spec.arguments(), "-v");
/// ```
pub fn split_command(input: &str) -> Result<CommandSpec, CommandError> {
    let trimmed = input.trim();

    if trimmed.chars().count() < 3 {
        // Too short to carry both a program and arguments.
        return Ok(CommandSpec::new(trimmed, ""));
    }

    if let Some(quote @ ('\'' | '"')) = trimmed.chars().next() {
        return split_quoted(trimmed, quote);
    }

    match trimmed.find(char::is_whitespace) {
        None => Ok(CommandSpec::new(trimmed, "")),
        Some(index) => {
            let (program, rest) = trimmed.split_at(index);
            Ok(CommandSpec::new(program.trim(), rest.trim()))
        }
    }
}

/// Splits a command string whose program name is wrapped in `quote`.
fn split_quoted(trimmed: &str, quote: char) -> Result<CommandSpec, CommandError> {
    let malformed = || CommandError::Malformed {
        input: trimmed.to_owned(),
    };

    // The quote characters are ASCII, so byte offsets stay on char
    // boundaries.
    let closing = trimmed[1..].find(quote).ok_or_else(malformed)? + 1;
    if closing < 2 {
        // An empty quoted program name.
        return Err(malformed());
    }

    let program = trimmed[1..closing].trim();
    let rest = &trimmed[closing + 1..];

    if rest.is_empty() {
        return Ok(CommandSpec::new(program, ""));
    }

    match rest.chars().next() {
        Some(next) if next.is_whitespace() => Ok(CommandSpec::new(program, rest.trim())),
        _ => Err(malformed()),
    }
}

/// Quotes a token when it would not survive reassembly into a command line.
///
/// Tokens free of whitespace and double quotes pass through unchanged, as do
/// tokens already wrapped in a matching pair of quote characters (which makes
/// the operation idempotent). Anything else is wrapped in double quotes with
/// embedded double quotes doubled.
///
/// # Examples
///
/// ```
/// use mosh_transport::quote_if_needed;
///
/// assert_eq!(quote_if_needed("noSpace"), "noSpace");
/// assert_eq!(quote_if_needed("a b"), "\"a b\"");
/// ```
#[must_use]
pub fn quote_if_needed(token: &str) -> Cow<'_, str> {
    if !token
        .contains(|ch: char| ch.is_whitespace() || ch == '"')
    {
        return Cow::Borrowed(token);
    }

    if is_wrapped(token) {
        return Cow::Borrowed(token);
    }

    let mut quoted = String::with_capacity(token.len() + 2);
    quoted.push('"');
    for ch in token.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Reports whether a token is already wrapped in a matching quote pair.
fn is_wrapped(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first @ ('\'' | '"')), Some(last)) => first == last,
        _ => false,
    }
}
