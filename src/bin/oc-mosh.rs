#![deny(unsafe_code)]

use std::{env, io, io::Write};

fn main() -> std::process::ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    let status = mosh_cli::run(env::args_os(), &mut stdout, &mut stderr);

    let _ = stdout.flush();
    let _ = stderr.flush();

    mosh_cli::exit_code_from(status)
}
