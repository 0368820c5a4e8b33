// tests/integration/config_errors.rs

use std::io::Write;

use tempfile::NamedTempFile;

use fandag::config::load_and_validate;
use fandag::errors::SchedulerError;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str) -> String {
    let file = write_config(contents);
    match load_and_validate(file.path()) {
        Err(SchedulerError::ConfigError(msg)) => msg,
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_trigger_returns_config_error() {
    let msg = expect_config_error(
        r#"
[task.A]
triggers = ["Ghost"]

[[seed]]
task = "A"
"#,
    );
    assert!(msg.contains("unknown trigger 'Ghost'"), "got: {msg}");
    assert!(msg.contains("'A'"));
}

#[test]
fn missing_seed_returns_config_error() {
    let msg = expect_config_error(
        r#"
[task.A]
action = "identity"
"#,
    );
    assert!(msg.contains("[[seed]]"), "got: {msg}");
}

#[test]
fn seed_for_unknown_task_returns_config_error() {
    let msg = expect_config_error(
        r#"
[task.A]

[[seed]]
task = "B"
payload = 1
"#,
    );
    assert!(msg.contains("unknown task 'B'"), "got: {msg}");
}

#[test]
fn zero_workers_returns_config_error() {
    let msg = expect_config_error(
        r#"
[config]
workers = 0

[task.A]

[[seed]]
task = "A"
"#,
    );
    assert!(msg.contains("workers"), "got: {msg}");
}

#[test]
fn zero_concurrency_returns_config_error() {
    let msg = expect_config_error(
        r#"
[config]
concurrency = 0

[task.A]

[[seed]]
task = "A"
"#,
    );
    assert!(msg.contains("concurrency"), "got: {msg}");
}

#[test]
fn multiply_without_factor_returns_config_error() {
    let msg = expect_config_error(
        r#"
[task.double]
action = "multiply"

[[seed]]
task = "double"
payload = 2
"#,
    );
    assert!(msg.contains("factor"), "got: {msg}");
}

#[test]
fn config_without_tasks_returns_config_error() {
    let msg = expect_config_error("[config]\nworkers = 2\n");
    assert!(msg.contains("[task.<name>]"), "got: {msg}");
}

#[test]
fn malformed_toml_returns_toml_error() {
    let file = write_config("[task.A\naction = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(SchedulerError::TomlError(_))
    ));
}

#[test]
fn unknown_action_name_is_rejected_at_parse_time() {
    let file = write_config(
        r#"
[task.A]
action = "teleport"

[[seed]]
task = "A"
"#,
    );
    assert!(matches!(
        load_and_validate(file.path()),
        Err(SchedulerError::TomlError(_))
    ));
}

#[test]
fn missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Nope.toml");
    assert!(matches!(
        load_and_validate(&missing),
        Err(SchedulerError::IoError(_))
    ));
}

#[test]
fn trigger_cycles_are_accepted() {
    let file = write_config(
        r#"
[task.ping]
triggers = ["pong"]

[task.pong]
triggers = ["ping"]

[[seed]]
task = "ping"
"#,
    );
    assert!(load_and_validate(file.path()).is_ok());
}
