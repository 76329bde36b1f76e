//! Client path resolution and the final handoff.
//!
//! Once the handshake is in hand the launcher's remaining job is to find a
//! `mosh-client` executable and become a thin shell around it: spawn it with
//! the terminal's own streams, merge in the launch environment, wait, and
//! forward its exit code verbatim.

use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::env::LaunchEnvironment;
use crate::error::LaunchError;
use crate::version;

/// Environment variable naming an explicit client executable.
pub const MOSH_CLIENT_ENV: &str = "MOSH_CLIENT";

/// Returns the platform-specific client binary file name.
fn client_binary_name() -> String {
    format!("{}{}", version::CLIENT_PROGRAM_NAME, env::consts::EXE_SUFFIX)
}

/// No resolution strategy located the client executable.
///
/// The display text is the user-facing remediation message: it names every
/// strategy the launcher tried, in the order it tried them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientNotFoundError {
    binary: String,
}

impl ClientNotFoundError {
    /// Returns the binary file name that was searched for.
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl fmt::Display for ClientNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "the {} executable cannot be found; possible solutions are:",
            self.binary
        )?;
        writeln!(f, "  - pass the full path with --client")?;
        writeln!(
            f,
            "  - set the {MOSH_CLIENT_ENV} environment variable to the full path"
        )?;
        writeln!(
            f,
            "  - copy {} into the current working directory",
            self.binary
        )?;
        writeln!(
            f,
            "  - copy {} into the directory holding the {} executable",
            self.binary,
            version::PROGRAM_NAME
        )?;
        write!(
            f,
            "  - add the directory containing {} to PATH",
            self.binary
        )
    }
}

impl std::error::Error for ClientNotFoundError {}

/// Locates the client executable using the live process environment.
///
/// Strategies in order: the explicit `override_path` (the `--client` flag),
/// the [`MOSH_CLIENT_ENV`] variable, the current working directory, the
/// directory holding the running executable, then every directory of
/// `PATH`. Each probe is a plain file-existence check.
///
/// # Errors
///
/// Returns [`ClientNotFoundError`] with the remediation message when every
/// strategy fails.
pub fn locate_client(override_path: Option<&Path>) -> Result<PathBuf, ClientNotFoundError> {
    let env_override = env::var_os(MOSH_CLIENT_ENV).map(PathBuf::from);
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let path_var = env::var_os("PATH");

    locate_client_in(
        override_path,
        env_override.as_deref(),
        Path::new("."),
        exe_dir.as_deref(),
        path_var.as_deref(),
    )
}

/// Probes the resolution strategies against explicit locations.
fn locate_client_in(
    override_path: Option<&Path>,
    env_override: Option<&Path>,
    working_dir: &Path,
    exe_dir: Option<&Path>,
    path_var: Option<&OsStr>,
) -> Result<PathBuf, ClientNotFoundError> {
    let binary = client_binary_name();

    for explicit in [override_path, env_override].into_iter().flatten() {
        if explicit.is_file() {
            debug!(client = %explicit.display(), "using explicitly configured client");
            return Ok(explicit.to_path_buf());
        }
    }

    let local = working_dir.join(&binary);
    if local.is_file() {
        debug!(client = %local.display(), "using client from the working directory");
        return Ok(local);
    }

    if let Some(dir) = exe_dir {
        let adjacent = dir.join(&binary);
        if adjacent.is_file() {
            debug!(client = %adjacent.display(), "using client adjacent to the launcher");
            return Ok(adjacent);
        }
    }

    if let Some(path_var) = path_var {
        for dir in env::split_paths(path_var) {
            if dir.as_os_str().is_empty() {
                continue;
            }
            let candidate = dir.join(&binary);
            if candidate.is_file() {
                debug!(client = %candidate.display(), "using client from PATH");
                return Ok(candidate);
            }
        }
    }

    Err(ClientNotFoundError { binary })
}

/// Spawns the client and blocks until it exits.
///
/// The child inherits stdin, stdout, and stderr so the interactive session
/// owns the terminal. The launch environment is merged additively; nothing
/// inherited is dropped. The exit code is returned verbatim, which is what
/// lets the remote shell's status propagate through the whole tool. There
/// are no retries: a client that cannot start is a fatal configuration
/// error.
///
/// # Errors
///
/// [`LaunchError::LaunchFailed`] when the spawn itself fails and
/// [`LaunchError::ClientTerminated`] when the client dies on a signal
/// without an exit code.
pub fn launch(
    program: &Path,
    address: IpAddr,
    port: &str,
    environment: &LaunchEnvironment,
) -> Result<i32, LaunchError> {
    let mut command = Command::new(program);
    command
        .arg(address.to_string())
        .arg(port)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    environment.apply(&mut command);

    debug!(program = %program.display(), %address, port, "handing off to the session client");

    let status = command.status().map_err(|source| LaunchError::LaunchFailed {
        program: program.to_owned(),
        source,
    })?;

    status.code().ok_or_else(|| LaunchError::ClientTerminated {
        program: program.to_owned(),
    })
}
