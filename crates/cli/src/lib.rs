#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! `mosh_cli` implements the thin command-line front-end for the `oc-mosh`
//! launcher. It recognises the supported switches (`--help`/`-h`,
//! `--version`/`-V`, `--client`, `--server`, `--ssh`, `--predict`,
//! `--port`/`-p`, `--no-init`), parses the `user@host` target, and
//! delegates the actual work to [`mosh_core::run_session`].
//!
//! # Design
//!
//! The crate exposes [`run`] as the primary entry point. The function
//! accepts an iterator of arguments together with handles for standard
//! output and error, so tests can drive it with byte buffers while the
//! binary passes the locked real streams. Internally a hand-built
//! [`clap`](https://docs.rs/clap/) command performs the parse; help and
//! version output are rendered from static snapshots so the wording stays
//! deterministic.
//!
//! # Invariants
//!
//! - `run` never panics; failures surface as the exit codes below.
//! - Argument problems (unknown flags, malformed targets, malformed port
//!   ranges) exit with 254 and print a "try --help" hint.
//! - Session failures exit with 255 after a single diagnostic line (or the
//!   multi-line remediation message for a missing client).
//! - Any other exit code is the remote shell's own status, forwarded
//!   verbatim by [`mosh_core::run_session`].
//!
//! # Examples
//!
//! ```
//! use mosh_cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(["oc-mosh", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(!stdout.is_empty());
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Once;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;

use mosh_core::{
    PortRange, PredictionMode, SessionConfig, Target,
    exit_code::ExitCode,
    run_session,
    version::{PROGRAM_NAME, version_banner},
};

/// Maximum exit code representable by a process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Deterministic help text describing the supported surface.
const HELP_TEXT: &str = concat!(
    "oc-mosh 1.4.0-rust\n",
    "https://github.com/oc-shell/oc-mosh\n",
    "\n",
    "Usage: oc-mosh [OPTIONS] USER@HOST\n",
    "\n",
    "Negotiates a mosh session over ssh, then hands the terminal to\n",
    "mosh-client with the negotiated session key in its environment.\n",
    "\n",
    "Options:\n",
    "  -h, --help             Show this help message and exit.\n",
    "  -V, --version          Output version information and exit.\n",
    "      --client PATH      Path to the mosh-client executable.\n",
    "      --server COMMAND   Command that starts mosh-server on the remote host.\n",
    "      --ssh COMMAND      Command used to reach the remote host (default: ssh).\n",
    "      --predict MODE     Prediction display mode: adaptive, always, or never.\n",
    "  -p, --port PORT[:PORT2]\n",
    "                         Server-side UDP port or port range (default: 60000:61000).\n",
    "      --no-init          Do not instruct the client to initialise the terminal.\n",
    "\n",
    "Exit status:\n",
    "  254  invalid command line arguments\n",
    "  255  ssh connection or mosh handshake setup failed\n",
    "  any other value is the exit status of the remote shell\n",
);

/// Runs the launcher front-end and returns its numeric exit status.
///
/// The first argument is the program name, as with a real argv. Diagnostics
/// go to `stderr`; help and version output go to `stdout`.
pub fn run<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator,
    I::Item: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let arguments: Vec<OsString> = args.into_iter().map(Into::into).collect();

    init_tracing();

    let matches = match build_command().try_get_matches_from(&arguments) {
        Ok(matches) => matches,
        Err(error) => return invalid_arguments(stderr, &error.to_string()),
    };

    if matches.get_flag("help") {
        let _ = stdout.write_all(HELP_TEXT.as_bytes());
        return ExitCode::Success.as_i32();
    }

    if matches.get_flag("version") {
        let _ = stdout.write_all(version_banner().as_bytes());
        return ExitCode::Success.as_i32();
    }

    let config = match parse_session_config(&matches) {
        Ok(config) => config,
        Err(message) => return invalid_arguments(stderr, &message),
    };

    debug!(target = %config.target, port_range = %config.port_range, "parsed invocation");

    match run_session(&config) {
        Ok(code) => code,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            error.exit_code().as_i32()
        }
    }
}

/// Converts a numeric exit status into a [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    let byte = u8::try_from(clamped).unwrap_or(u8::MAX);
    std::process::ExitCode::from(byte)
}

/// Builds the clap command describing the supported surface.
///
/// Help and version handling stay manual so their wording is rendered from
/// the static snapshots above.
fn build_command() -> Command {
    Command::new(PROGRAM_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("client")
                .long("client")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(Arg::new("server").long("server").value_name("COMMAND"))
        .arg(Arg::new("ssh").long("ssh").value_name("COMMAND"))
        .arg(Arg::new("predict").long("predict").value_name("MODE"))
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT[:PORT2]"),
        )
        .arg(
            Arg::new("no-init")
                .long("no-init")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("target").value_name("USER@HOST"))
}

/// Turns parsed matches into a typed session configuration.
fn parse_session_config(matches: &ArgMatches) -> Result<SessionConfig, String> {
    let Some(target_text) = matches.get_one::<String>("target") else {
        return Err("a target in the form user@host is required".to_owned());
    };
    let target = Target::parse(target_text).map_err(|error| error.to_string())?;

    let mut config = SessionConfig::new(target);

    if let Some(range) = matches.get_one::<String>("port") {
        config.port_range = range.parse::<PortRange>().map_err(|error| error.to_string())?;
    }
    if let Some(mode) = matches.get_one::<String>("predict") {
        config.predict = mode
            .parse::<PredictionMode>()
            .map_err(|error| error.to_string())?;
    }
    if let Some(ssh) = matches.get_one::<String>("ssh") {
        config.ssh_command.clone_from(ssh);
    }
    if let Some(server) = matches.get_one::<String>("server") {
        config.server_command.clone_from(server);
    }
    config.client_path = matches.get_one::<PathBuf>("client").cloned();
    config.no_term_init = matches.get_flag("no-init");

    Ok(config)
}

/// Reports an argument problem and returns the invalid-arguments status.
fn invalid_arguments<Err: Write>(stderr: &mut Err, message: &str) -> i32 {
    let _ = writeln!(stderr, "{PROGRAM_NAME}: {}", message.trim_end());
    let _ = writeln!(stderr, "Try '{PROGRAM_NAME} --help' for more information.");
    ExitCode::InvalidArguments.as_i32()
}

/// Installs the tracing subscriber once, honouring `RUST_LOG`.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::from_default_env();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_cli(args: &[&str]) -> (i32, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run(args.iter().copied(), &mut stdout, &mut stderr);
        (
            code,
            String::from_utf8(stdout).expect("stdout is UTF-8"),
            String::from_utf8(stderr).expect("stderr is UTF-8"),
        )
    }

    #[test]
    fn version_flag_prints_banner() {
        let (code, stdout, stderr) = run_cli(&["oc-mosh", "--version"]);
        assert_eq!(code, 0);
        assert!(stdout.contains("oc-mosh"));
        assert!(stderr.is_empty());
    }

    #[test]
    fn help_flag_prints_usage() {
        let (code, stdout, stderr) = run_cli(&["oc-mosh", "--help"]);
        assert_eq!(code, 0);
        assert!(stdout.contains("Usage:"));
        assert!(stdout.contains("--predict"));
        assert!(stderr.is_empty());
    }

    #[test]
    fn missing_target_is_an_argument_error() {
        let (code, stdout, stderr) = run_cli(&["oc-mosh"]);
        assert_eq!(code, 254);
        assert!(stdout.is_empty());
        assert!(stderr.contains("user@host"));
        assert!(stderr.contains("--help"));
    }

    #[test]
    fn target_without_user_is_an_argument_error() {
        let (code, _, stderr) = run_cli(&["oc-mosh", "example.com"]);
        assert_eq!(code, 254);
        assert!(stderr.contains("user@host"));
    }

    #[test]
    fn unknown_flag_is_an_argument_error() {
        let (code, _, stderr) = run_cli(&["oc-mosh", "--definitely-invalid", "a@b"]);
        assert_eq!(code, 254);
        assert!(stderr.contains("--help"));
    }

    #[test]
    fn malformed_port_range_is_an_argument_error() {
        let (code, _, stderr) = run_cli(&["oc-mosh", "-p", "abc", "alice@example.com"]);
        assert_eq!(code, 254);
        assert!(stderr.contains("invalid port"));
    }

    #[test]
    fn inverted_port_range_is_an_argument_error() {
        let (code, _, stderr) = run_cli(&["oc-mosh", "-p", "61000:60000", "alice@example.com"]);
        assert_eq!(code, 254);
        assert!(stderr.contains("inverted"));
    }

    #[test]
    fn unknown_prediction_mode_is_an_argument_error() {
        let (code, _, stderr) =
            run_cli(&["oc-mosh", "--predict", "sometimes", "alice@example.com"]);
        assert_eq!(code, 254);
        assert!(stderr.contains("prediction mode"));
    }

    #[test]
    fn exit_code_conversion_clamps_to_a_byte() {
        // std::process::ExitCode has no PartialEq; compare debug renderings.
        let rendered = |status: i32| format!("{:?}", exit_code_from(status));
        assert_eq!(rendered(0), format!("{:?}", std::process::ExitCode::from(0)));
        assert_eq!(
            rendered(255),
            format!("{:?}", std::process::ExitCode::from(255))
        );
        assert_eq!(rendered(-1), format!("{:?}", std::process::ExitCode::from(0)));
        assert_eq!(
            rendered(300),
            format!("{:?}", std::process::ExitCode::from(255))
        );
    }
}
