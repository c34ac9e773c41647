use super::*;
use std::time::Duration;

#[tokio::test]
async fn run_with_timeout_success() {
    let cmd = ScriptCommand::new("echo", Duration::from_secs(5)).arg("hello");
    let output = run_with_timeout(&cmd, "echo").await.unwrap();
    assert!(output.success());
    assert_eq!(output.stdout.trim(), "hello");
}

#[tokio::test]
async fn run_with_timeout_nonzero_exit_is_not_an_error() {
    let cmd = ScriptCommand::new("false", Duration::from_secs(5));
    let output = run_with_timeout(&cmd, "false").await.unwrap();
    assert!(!output.success());
}

#[tokio::test]
async fn run_with_timeout_spawn_failure() {
    let cmd = ScriptCommand::new("/nonexistent/binary", Duration::from_secs(5));
    let result = run_with_timeout(&cmd, "nonexistent").await;
    assert!(matches!(result, Err(ExecError::Spawn { .. })));
}

#[tokio::test]
async fn run_with_timeout_elapses() {
    let cmd = ScriptCommand::new("sleep", Duration::from_millis(100)).arg("10");
    let result = run_with_timeout(&cmd, "test sleep").await;
    assert!(matches!(result, Err(ExecError::Timeout { .. })));
}
