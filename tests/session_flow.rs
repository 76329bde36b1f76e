//! End-to-end session scenarios driven with fake ssh and mosh-client
//! scripts.
//!
//! The fake ssh prints whatever handshake the scenario needs; the fake
//! client records its argv and MOSH_* environment into a file named by the
//! MOSH_RECORD variable, then exits with a chosen status so exit-code
//! passthrough is observable.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("script written");
    let mut perms = fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("script made executable");
    path
}

/// A fake client that records its argv and MOSH_* environment, then exits
/// with `exit_code`.
fn recording_client(dir: &Path, exit_code: i32) -> PathBuf {
    // Only shell builtins: the scenarios run with PATH pointing at an
    // empty directory.
    let body = format!(
        concat!(
            "#!/bin/sh\n",
            "{{\n",
            "  echo \"argv $*\"\n",
            "  echo \"MOSH_KEY=$MOSH_KEY\"\n",
            "  echo \"MOSH_USER=$MOSH_USER\"\n",
            "  echo \"MOSH_PREDICTION_DISPLAY=$MOSH_PREDICTION_DISPLAY\"\n",
            "  echo \"MOSH_NO_TERM_INIT=$MOSH_NO_TERM_INIT\"\n",
            "}} > \"$MOSH_RECORD\"\n",
            "exit {exit_code}\n",
        ),
        exit_code = exit_code
    );
    write_script(dir, "fake-mosh-client", &body)
}

/// Runs oc-mosh with a controlled environment: PATH reduced to an empty
/// directory so no real ssh or mosh-client can leak into the scenarios.
fn run_launcher(dir: &Path, record: &Path, args: &[&str]) -> Output {
    let empty_path = dir.join("empty-path");
    fs::create_dir_all(&empty_path).expect("empty PATH dir");

    Command::new(env!("CARGO_BIN_EXE_oc-mosh"))
        .args(args)
        .current_dir(dir)
        .env_remove("MOSH_CLIENT")
        .env("PATH", &empty_path)
        .env("MOSH_RECORD", record)
        .output()
        .expect("failed to run oc-mosh")
}

#[test]
fn forwards_environment_and_exit_code_to_the_client() {
    let dir = TempDir::new().unwrap();
    let ssh = write_script(
        dir.path(),
        "fake-ssh",
        "#!/bin/sh\necho 'Last login: never'\necho 'MOSH CONNECT 60050 Zm9v'\nexit 0\n",
    );
    let client = recording_client(dir.path(), 7);
    let record = dir.path().join("record");

    let output = run_launcher(
        dir.path(),
        &record,
        &[
            "--ssh",
            ssh.to_str().unwrap(),
            "--client",
            client.to_str().unwrap(),
            "--predict",
            "always",
            "alice@127.0.0.1",
        ],
    );

    assert_eq!(output.status.code(), Some(7), "client exit code must pass through");

    let recorded = fs::read_to_string(&record).expect("client should have recorded its launch");
    assert!(recorded.contains("argv 127.0.0.1 60050"), "unexpected argv: {recorded}");
    assert!(recorded.contains("MOSH_KEY=Zm9v"));
    assert!(recorded.contains("MOSH_USER=alice"));
    assert!(recorded.contains("MOSH_PREDICTION_DISPLAY=always"));
}

#[test]
fn forwards_a_zero_exit_code() {
    let dir = TempDir::new().unwrap();
    let ssh = write_script(
        dir.path(),
        "fake-ssh",
        "#!/bin/sh\necho 'MOSH CONNECT 60021 c2VjcmV0'\n",
    );
    let client = recording_client(dir.path(), 0);
    let record = dir.path().join("record");

    let output = run_launcher(
        dir.path(),
        &record,
        &[
            "--ssh",
            ssh.to_str().unwrap(),
            "--client",
            client.to_str().unwrap(),
            "bob@127.0.0.1",
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let recorded = fs::read_to_string(&record).expect("record written");
    assert!(recorded.contains("argv 127.0.0.1 60021"));
    assert!(recorded.contains("MOSH_KEY=c2VjcmV0"));
}

#[test]
fn no_init_flag_reaches_the_client_environment() {
    let dir = TempDir::new().unwrap();
    let ssh = write_script(
        dir.path(),
        "fake-ssh",
        "#!/bin/sh\necho 'MOSH CONNECT 60021 c2VjcmV0'\n",
    );
    let client = recording_client(dir.path(), 0);
    let record = dir.path().join("record");

    let output = run_launcher(
        dir.path(),
        &record,
        &[
            "--ssh",
            ssh.to_str().unwrap(),
            "--client",
            client.to_str().unwrap(),
            "--no-init",
            "bob@127.0.0.1",
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let recorded = fs::read_to_string(&record).expect("record written");
    assert!(recorded.contains("MOSH_NO_TERM_INIT=1"));
}

#[test]
fn missing_handshake_exits_255_without_launching_the_client() {
    let dir = TempDir::new().unwrap();
    let ssh = write_script(
        dir.path(),
        "fake-ssh",
        "#!/bin/sh\necho 'Permission denied (publickey)'\nexit 255\n",
    );
    let client = recording_client(dir.path(), 0);
    let record = dir.path().join("record");

    let output = run_launcher(
        dir.path(),
        &record,
        &[
            "--ssh",
            ssh.to_str().unwrap(),
            "--client",
            client.to_str().unwrap(),
            "alice@127.0.0.1",
        ],
    );

    assert_eq!(output.status.code(), Some(255));
    assert!(!record.exists(), "the client must not have been invoked");

    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("MOSH CONNECT"), "diagnostic should name the handshake: {stderr}");
}

#[test]
fn missing_client_exits_255_with_remediation() {
    let dir = TempDir::new().unwrap();
    let ssh = write_script(
        dir.path(),
        "fake-ssh",
        "#!/bin/sh\necho 'MOSH CONNECT 60050 Zm9v'\n",
    );
    let record = dir.path().join("record");

    let output = run_launcher(
        dir.path(),
        &record,
        &[
            "--ssh",
            ssh.to_str().unwrap(),
            "--client",
            "/definitely/not/a/client",
            "alice@127.0.0.1",
        ],
    );

    assert_eq!(output.status.code(), Some(255));

    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("cannot be found"), "stderr: {stderr}");
    assert!(stderr.contains("--client"));
    assert!(stderr.contains("MOSH_CLIENT"));
    assert!(stderr.contains("PATH"));
}

#[test]
fn the_last_handshake_line_wins() {
    let dir = TempDir::new().unwrap();
    let ssh = write_script(
        dir.path(),
        "fake-ssh",
        "#!/bin/sh\necho 'MOSH CONNECT 60001 first'\necho 'MOSH CONNECT 60002 second'\n",
    );
    let client = recording_client(dir.path(), 0);
    let record = dir.path().join("record");

    let output = run_launcher(
        dir.path(),
        &record,
        &[
            "--ssh",
            ssh.to_str().unwrap(),
            "--client",
            client.to_str().unwrap(),
            "alice@127.0.0.1",
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let recorded = fs::read_to_string(&record).expect("record written");
    assert!(recorded.contains("argv 127.0.0.1 60002"), "recorded: {recorded}");
    assert!(recorded.contains("MOSH_KEY=second"));
}
