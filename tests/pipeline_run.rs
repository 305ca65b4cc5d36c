//! End-to-end runs of the action binary against a stub `bdy`.

#![cfg(unix)]

mod common;

use common::{ActionHarness, TEST_TOKEN};

#[test]
fn successful_run_publishes_the_run_url() {
    let result = ActionHarness::with_stub(
        "echo 'Run started: https://app.buddy.works/w/p/pipelines/123'",
    )
    .input("workspace", "w")
    .input("project", "p")
    .input("identifier", "id")
    .input("branch", "main")
    .run();

    assert_eq!(result.exit_code(), 0, "stderr: {}", result.stderr());
    assert_eq!(
        result.bdy_args(),
        [
            "pipeline",
            "run",
            "id",
            "--workspace",
            "w",
            "--project",
            "p",
            "--branch",
            "main"
        ]
    );
    assert!(
        result
            .github_output()
            .contains("run_url=https://app.buddy.works/w/p/pipelines/123\n"),
        "github_output: {}",
        result.github_output()
    );
    assert!(
        result
            .github_env()
            .contains("BUDDY_RUN_URL=https://app.buddy.works/w/p/pipelines/123\n"),
        "github_env: {}",
        result.github_env()
    );
    assert!(
        result.stdout().contains(&format!("::add-mask::{TEST_TOKEN}")),
        "token was not masked: {}",
        result.stdout()
    );
}

#[test]
fn output_without_a_url_is_still_a_success() {
    let result = ActionHarness::with_stub("echo 'run queued'")
        .input("workspace", "w")
        .input("project", "p")
        .input("identifier", "id")
        .run();

    assert_eq!(result.exit_code(), 0, "stderr: {}", result.stderr());
    assert!(!result.github_output().contains("run_url="));
    assert!(!result.github_env().contains("BUDDY_RUN_URL="));
}

#[test]
fn tool_failure_reports_stderr_and_exits_nonzero() {
    let result = ActionHarness::with_stub("echo 'unauthorized' >&2\nexit 1")
        .input("workspace", "w")
        .input("project", "p")
        .input("identifier", "id")
        .run();

    assert_eq!(result.exit_code(), 1);
    assert!(
        result.stdout().contains("::error::unauthorized"),
        "stdout: {}",
        result.stdout()
    );
}

#[test]
fn invalid_priority_fails_before_the_tool_runs() {
    let result = ActionHarness::with_stub("echo should-not-run")
        .input("workspace", "w")
        .input("project", "p")
        .input("identifier", "id")
        .input("priority", "urgent")
        .run();

    assert_eq!(result.exit_code(), 1);
    assert!(
        result
            .stdout()
            .contains("Invalid priority: \"urgent\". Must be one of: LOW, NORMAL, HIGH"),
        "stdout: {}",
        result.stdout()
    );
    assert!(!result.bdy_was_invoked(), "bdy must not run on bad input");
}

#[test]
fn missing_token_is_reported_by_name() {
    let result = ActionHarness::with_stub("echo should-not-run")
        .without_env("BUDDY_TOKEN")
        .input("workspace", "w")
        .input("project", "p")
        .input("identifier", "id")
        .run();

    assert_eq!(result.exit_code(), 1);
    assert!(
        result.stdout().contains("BUDDY_TOKEN is not set."),
        "stdout: {}",
        result.stdout()
    );
    assert!(!result.bdy_was_invoked());
}

#[test]
fn missing_required_input_is_reported_by_name() {
    let result = ActionHarness::with_stub("echo should-not-run")
        .input("workspace", "w")
        .input("project", "p")
        .run();

    assert_eq!(result.exit_code(), 1);
    assert!(
        result
            .stdout()
            .contains("Input required and not supplied: identifier"),
        "stdout: {}",
        result.stdout()
    );
    assert!(!result.bdy_was_invoked());
}

#[test]
fn wait_is_forwarded_last() {
    let result = ActionHarness::with_stub("echo ok")
        .input("workspace", "w")
        .input("project", "p")
        .input("identifier", "id")
        .input("action", "build, test")
        .input("wait", "30")
        .run();

    assert_eq!(result.exit_code(), 0, "stderr: {}", result.stderr());
    let args = result.bdy_args();
    assert_eq!(
        args,
        [
            "pipeline",
            "run",
            "id",
            "--workspace",
            "w",
            "--project",
            "p",
            "--action",
            "build",
            "--action",
            "test",
            "--wait",
            "30"
        ]
    );
}
