#![allow(dead_code)]
//! Shared helpers: a stub engine script plus a runner for the real binary.
//!
//! The stub logs every invocation (space-joined) to $AUTODOCK_TEST_LOG and
//! answers `info`, `image ls` and bare `help` from environment variables, so
//! each test controls login state and the tag inventory per invocation.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub fn write_stub_engine(dir: &Path) -> PathBuf {
    let lines = [
        "#!/bin/sh",
        "printf '%s\\n' \"$*\" >> \"$AUTODOCK_TEST_LOG\"",
        "if [ \"$1\" = \"info\" ]; then",
        "  echo \"Server:\"",
        "  if [ -n \"$AUTODOCK_TEST_USERNAME\" ]; then",
        "    echo \" Username: $AUTODOCK_TEST_USERNAME\"",
        "  fi",
        "  exit 0",
        "fi",
        "if [ \"$1\" = \"image\" ] && [ \"$2\" = \"ls\" ]; then",
        "  echo \"REPOSITORY          TAG                    IMAGE ID       CREATED        SIZE\"",
        "  if [ -n \"$AUTODOCK_TEST_ROWS\" ]; then",
        "    printf '%s\\n' \"$AUTODOCK_TEST_ROWS\"",
        "  fi",
        "  exit 0",
        "fi",
        "if [ \"$1\" = \"help\" ] && [ -z \"$2\" ]; then",
        "  echo \"Usage:  docker [OPTIONS] COMMAND\"",
        "  echo \"\"",
        "  echo \"Common Commands:\"",
        "  echo \"  run         Create and run a new container from an image\"",
        "  echo \"\"",
        "  echo \"Run 'docker COMMAND --help' for more information on a command.\"",
        "  exit 0",
        "fi",
        "exit \"${AUTODOCK_TEST_EXIT:-0}\"",
    ];
    let path = dir.join("stub-engine");
    fs::write(&path, format!("{}\n", lines.join("\n"))).expect("write stub engine");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub engine");
    }
    path
}

/// Run the autodock binary against a stub engine with elevation disabled.
pub fn run_autodock(engine: &Path, log: &Path, envs: &[(&str, &str)], args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_autodock"));
    cmd.args(args)
        .env("AUTODOCK_ENGINE", engine)
        .env("AUTODOCK_SUDO", "")
        .env("AUTODOCK_TEST_LOG", log)
        .env("NO_COLOR", "1");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("run autodock")
}

pub fn logged_lines(log: &Path) -> Vec<String> {
    match fs::read_to_string(log) {
        Ok(s) => s.lines().map(|l| l.to_string()).collect(),
        Err(_) => Vec::new(),
    }
}

pub fn stdout_str(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

pub fn stderr_str(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}
