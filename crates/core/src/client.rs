//! The session orchestration pass.
//!
//! One invocation is one linear pass: tokenize the secure-shell command,
//! assemble the remote server-start command, negotiate the handshake,
//! resolve the target host, build the launch environment, locate the
//! client, and hand off. No state is re-entered and every failure aborts
//! the pass immediately.

use tracing::debug;

use mosh_transport::{CommandError, negotiate, quote_if_needed, split_command};

use crate::config::{PortRange, SessionConfig};
use crate::console;
use crate::env::LaunchEnvironment;
use crate::error::LaunchError;
use crate::launcher;
use crate::resolve;

/// Establishes a session for `config` and returns the client's exit code.
///
/// The returned code is the remote shell's own status, forwarded verbatim;
/// the caller is expected to exit with it.
///
/// # Errors
///
/// Any [`LaunchError`]; all of them map onto the connection-failure exit
/// code at the CLI boundary.
pub fn run_session(config: &SessionConfig) -> Result<i32, LaunchError> {
    let ssh = split_command(&config.ssh_command)?;
    let remote_command = build_remote_command(&config.server_command, config.port_range)?;

    debug!(
        ssh = ssh.program(),
        target = %config.target,
        remote_command = %remote_command,
        "negotiating session"
    );

    let mut args: Vec<String> = ssh.argument_tokens().map(str::to_owned).collect();
    args.push(config.target.to_string());
    args.push("--".to_owned());
    args.push(remote_command);

    let handshake = negotiate(ssh.program(), &args)?;

    let address = resolve::resolve_host(config.target.host())?;

    console::clear_screen();

    let mut environment = LaunchEnvironment::new(handshake.key(), config.target.user());
    environment.set_prediction(config.predict);
    if config.no_term_init {
        environment.set_no_term_init();
    }

    let client = launcher::locate_client(config.client_path.as_deref())?;
    launcher::launch(&client, address, handshake.port(), &environment)
}

/// Assembles the single command-line string that starts the remote server.
///
/// The configured server command is tokenized so a quoted program name
/// survives, then reassembled with the session-start arguments appended and
/// the program re-quoted. The result travels to the remote shell as one
/// string.
fn build_remote_command(server_command: &str, range: PortRange) -> Result<String, CommandError> {
    let server = split_command(server_command)?;

    let mut parts: Vec<String> = Vec::new();
    parts.push(quote_if_needed(server.program()).into_owned());
    if !server.arguments().is_empty() {
        parts.push(server.arguments().to_owned());
    }
    parts.push("new".to_owned());
    parts.push("-s".to_owned());
    parts.push("-p".to_owned());
    parts.push(range.to_string());

    Ok(parts.join(" "))
}
