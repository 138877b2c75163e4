#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::ffi::OsStr;
use std::fs::{self, Permissions};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Launcher stand-in: appends one `===`-terminated argv record to the file
/// named by `CI_RUNNER_TEST_ARGS` on every invocation, dumps its environment
/// into `CI_RUNNER_TEST_ENV`, then exits with a scripted code.
fn stub_cargo(dir: &Path, code: i32) -> PathBuf {
    let path = dir.join("cargo-stub");
    let script = format!(
        "#!/bin/sh\n\
         printf '%s\\n' \"$@\" >> \"$CI_RUNNER_TEST_ARGS\"\n\
         printf '===\\n' >> \"$CI_RUNNER_TEST_ARGS\"\n\
         env > \"$CI_RUNNER_TEST_ENV\"\n\
         exit {code}\n"
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, Permissions::from_mode(0o755)).unwrap();
    path
}

struct Harness {
    _dir: TempDir,
    cargo: PathBuf,
    args_file: PathBuf,
    env_file: PathBuf,
}

fn harness(code: i32) -> Harness {
    let dir = TempDir::new().unwrap();
    let cargo = stub_cargo(dir.path(), code);
    let args_file = dir.path().join("argv.txt");
    let env_file = dir.path().join("env.txt");
    Harness { _dir: dir, cargo, args_file, env_file }
}

fn ci_runner(harness: &Harness) -> Command {
    let mut cmd = Command::cargo_bin("ci-runner").unwrap();
    cmd.env_remove("KIND")
        .env_remove("RUST_LOG")
        .env_remove("ELASTIC_LOG")
        .env("CARGO", &harness.cargo)
        .env("CI_RUNNER_TEST_ARGS", &harness.args_file)
        .env("CI_RUNNER_TEST_ENV", &harness.env_file);
    cmd
}

/// Argv records left by the stub, one per launch.
fn recorded_invocations(harness: &Harness) -> Vec<Vec<String>> {
    fs::read_to_string(&harness.args_file)
        .unwrap()
        .split_terminator("===\n")
        .map(|record| record.lines().map(str::to_owned).collect())
        .collect()
}

/// Argv of the one expected launch; fails if the stub ran more than once.
fn recorded_args(harness: &Harness) -> Vec<String> {
    let mut invocations = recorded_invocations(harness);
    assert_eq!(invocations.len(), 1, "expected exactly one collaborator launch");
    invocations.remove(0)
}

#[test]
fn build_kind_runs_workspace_tests_verbosely() {
    let h = harness(0);
    ci_runner(&h)
        .env("KIND", "build")
        .assert()
        .success()
        .stderr(predicate::str::contains("test --workspace --verbose"));
    assert_eq!(recorded_args(&h), vec!["test", "--workspace", "--verbose"]);
}

#[test]
fn integration_kind_passes_fixed_args_and_log_override() {
    let h = harness(0);
    ci_runner(&h).env("KIND", "integration").assert().success();
    assert_eq!(
        recorded_args(&h),
        vec!["run", "-p", "integration", "--", "default", "sniffed_node"]
    );

    let child_env = fs::read_to_string(&h.env_file).unwrap();
    assert!(child_env.lines().any(|line| line == "ELASTIC_LOG=debug"));
}

#[test]
fn build_failure_code_propagates_verbatim() {
    let h = harness(7);
    ci_runner(&h).env("KIND", "build").assert().failure().code(7);
}

#[test]
fn integration_failure_code_propagates_verbatim() {
    let h = harness(2);
    ci_runner(&h).env("KIND", "integration").assert().failure().code(2);

    // The code must come from the collaborator, not from a resolution
    // failure that shares the exit code.
    assert_eq!(
        recorded_args(&h),
        vec!["run", "-p", "integration", "--", "default", "sniffed_node"]
    );
}

#[test]
fn unrecognized_kind_is_a_silent_success_without_children() {
    let h = harness(0);
    ci_runner(&h)
        .env("KIND", "lint")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));
    assert!(!h.args_file.exists());
}

#[test]
fn empty_kind_is_unrecognized_not_missing() {
    let h = harness(0);
    ci_runner(&h)
        .env("KIND", "")
        .assert()
        .success()
        .stdout(predicate::str::contains("KIND=\"\""));
    assert!(!h.args_file.exists());
}

#[test]
fn non_utf8_kind_is_unrecognized_not_missing() {
    let h = harness(0);
    ci_runner(&h)
        .env("KIND", OsStr::from_bytes(b"bu\xffild"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));
    assert!(!h.args_file.exists());
}

#[test]
fn missing_kind_is_a_configuration_error_before_any_spawn() {
    let h = harness(0);
    ci_runner(&h).assert().failure().code(2).stderr(predicate::str::contains("KIND"));
    assert!(!h.args_file.exists());
}

#[test]
fn missing_kind_with_lenient_flag_is_a_noop() {
    let h = harness(0);
    ci_runner(&h)
        .arg("--lenient")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to do"));
    assert!(!h.args_file.exists());
}

#[test]
fn cli_kind_overrides_environment() {
    let h = harness(0);
    ci_runner(&h).env("KIND", "integration").args(["--kind", "build"]).assert().success();
    assert_eq!(recorded_args(&h), vec!["test", "--workspace", "--verbose"]);
}

#[test]
fn repeat_runs_report_the_same_outcome() {
    let h = harness(3);
    ci_runner(&h).env("KIND", "build").assert().failure().code(3);
    ci_runner(&h).env("KIND", "build").assert().failure().code(3);

    // One launch per run, recorded separately.
    assert_eq!(recorded_invocations(&h).len(), 2);
}

#[test]
fn trace_line_shows_env_override_before_launch() {
    let h = harness(0);
    ci_runner(&h)
        .env("KIND", "integration")
        .assert()
        .success()
        .stderr(predicate::str::contains("ELASTIC_LOG=debug"))
        .stderr(predicate::str::contains("run -p integration -- default sniffed_node"));
}

#[test]
fn unlaunchable_runner_maps_to_command_not_found() {
    let h = harness(0);
    ci_runner(&h)
        .env("KIND", "build")
        .env("CARGO", "/definitely/not/a/real/launcher")
        .assert()
        .failure()
        .code(127)
        .stderr(predicate::str::contains("failed to launch"));
}
