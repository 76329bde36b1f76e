//! Handshake negotiation over a secure-shell subprocess.
//!
//! The remote session server announces its UDP port and session key with a
//! single `MOSH CONNECT <port> <key>` line relayed through the secure-shell
//! client's stdout. [`negotiate`] spawns that client, scans its stdout to
//! end-of-stream, and keeps the last handshake-shaped line it sees. Scanning
//! to the end means the subprocess always exits on its own (the remote
//! server detaches once the handshake is printed) and the success path reaps
//! it with a plain wait, no kill required.
//!
//! The read is blocking and runs on the calling thread. It is the
//! launcher's primary suspension point and can take as long as the remote
//! authentication round-trip requires; there is no timeout.

use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader};
use std::process::{Child, Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::debug;

/// The port and session key captured from a handshake line.
///
/// Created once per successful negotiation and held only for the duration of
/// one launch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HandshakeResult {
    port: String,
    key: String,
}

impl HandshakeResult {
    /// Returns the negotiated UDP port as the digits the server printed.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Returns the opaque session key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Errors produced while negotiating the handshake.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The secure-shell subprocess could not be started at all.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// The program that failed to spawn.
        program: String,
        /// The underlying spawn failure.
        #[source]
        source: io::Error,
    },

    /// Reading the subprocess's stdout failed mid-stream.
    #[error("failed to read remote session output: {source}")]
    Stream {
        /// The underlying read failure.
        #[source]
        source: io::Error,
    },

    /// The stream closed without ever carrying a handshake line.
    #[error("remote server did not return a valid MOSH CONNECT response ({})", describe_status(.status))]
    NoHandshake {
        /// Exit status of the subprocess, when it could be collected.
        status: Option<ExitStatus>,
    },
}

fn describe_status(status: &Option<ExitStatus>) -> String {
    match status {
        Some(status) => format!("subprocess {status}"),
        None => "subprocess status unknown".to_owned(),
    }
}

/// Matches one line against the handshake shape.
///
/// The accepted shape is optional surrounding whitespace, the literal words
/// `MOSH` and `CONNECT`, a port of one to five ASCII digits, and a key of
/// one or more non-whitespace characters, with nothing after the key. Lines
/// that do not match simply yield `None`; they never abort a scan.
#[must_use]
pub fn parse_connect_line(line: &str) -> Option<HandshakeResult> {
    let mut tokens = line.split_whitespace();

    if tokens.next()? != "MOSH" {
        return None;
    }
    if tokens.next()? != "CONNECT" {
        return None;
    }

    let port = tokens.next()?;
    let key = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    if port.len() > 5 || !port.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    Some(HandshakeResult {
        port: port.to_owned(),
        key: key.to_owned(),
    })
}

/// Spawns the secure-shell subprocess and scans its stdout for the handshake.
///
/// The subprocess is started without a shell intermediary. Its stdout is
/// piped for scanning while stdin and stderr stay attached to the launcher's
/// own streams, keeping authentication prompts interactive and diagnostics
/// visible. The stream is drained to end-of-file and the last handshake
/// match wins; the child is then reaped before this function returns. When
/// the stream closes without a match the child's exit status is folded into
/// the error.
///
/// # Errors
///
/// [`HandshakeError::Spawn`] when the subprocess cannot be started,
/// [`HandshakeError::Stream`] when reading its stdout fails, and
/// [`HandshakeError::NoHandshake`] when the stream closes without a
/// handshake line.
pub fn negotiate<I, S>(program: &str, args: I) -> Result<HandshakeResult, HandshakeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    debug!(program, "starting remote session setup");

    let child = command.spawn().map_err(|source| HandshakeError::Spawn {
        program: program.to_owned(),
        source,
    })?;
    let mut guard = ChildGuard::new(child);

    let stdout = guard.take_stdout().ok_or_else(|| HandshakeError::Stream {
        source: io::Error::new(io::ErrorKind::BrokenPipe, "stdout has already been taken"),
    })?;
    let mut reader = BufReader::new(stdout);

    let mut result = None;
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|source| HandshakeError::Stream { source })?;
        if read == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buffer);
        if let Some(handshake) = parse_connect_line(&line) {
            debug!(port = handshake.port(), "captured session handshake");
            result = Some(handshake);
        }
    }

    let status = guard.wait().ok();
    match result {
        Some(handshake) => {
            debug!(?status, "remote session setup finished");
            Ok(handshake)
        }
        None => Err(HandshakeError::NoHandshake { status }),
    }
}

/// Owns the handshake subprocess and guarantees it is reaped.
///
/// The normal paths consume the guard through [`ChildGuard::wait`]. If the
/// guard is dropped instead (a read error, a panic), a still-running child
/// is killed first and then waited on, so no exit path leaks a zombie.
struct ChildGuard {
    child: Option<Child>,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self { child: Some(child) }
    }

    fn take_stdout(&mut self) -> Option<std::process::ChildStdout> {
        self.child.as_mut().and_then(|child| child.stdout.take())
    }

    fn wait(mut self) -> io::Result<ExitStatus> {
        match self.child.take() {
            Some(mut child) => child.wait(),
            None => Err(io::Error::other("subprocess has already been waited on")),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };

        if let Ok(None) = child.try_wait() {
            let _ = child.kill();
        }

        let _ = child.wait();
    }
}
