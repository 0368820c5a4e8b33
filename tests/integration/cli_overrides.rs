// tests/integration/cli_overrides.rs

use std::path::PathBuf;

use clap::Parser;

use fandag::apply_cli_overrides;
use fandag::cli::CliArgs;
use fandag::config::loader::default_config_path;
use fandag::config::validate_config;
use fandag::cli::LogLevel;
use fandag::logging::{parse_level_str, resolve_filter};
use fandag::types::{FailurePolicy, TerminationMode};
use fandag_test_utils::builders::{ConfigFileBuilder, TaskConfigBuilder};

fn base_config() -> fandag::config::ConfigFile {
    ConfigFileBuilder::new()
        .workers(2)
        .with_task("A", TaskConfigBuilder::identity().build())
        .with_seed("A", 1)
        .build()
}

#[test]
fn cli_defaults_leave_config_untouched() {
    let args = CliArgs::try_parse_from(["fandag"]).unwrap();
    assert_eq!(args.config, default_config_path());
    assert_eq!(args.config, PathBuf::from("Fandag.toml"));
    assert!(!args.dry_run);

    let mut cfg = base_config();
    apply_cli_overrides(&mut cfg, &args);

    assert_eq!(cfg.config.workers, 2);
    assert_eq!(cfg.config.concurrency, None);
    assert_eq!(cfg.config.termination, TerminationMode::Drain);
    assert_eq!(cfg.config.failure_policy, FailurePolicy::Isolate);
}

#[test]
fn cli_flags_override_config_section() {
    let args = CliArgs::try_parse_from([
        "fandag",
        "--config",
        "other.toml",
        "--workers",
        "8",
        "--concurrency",
        "3",
        "--daemon",
        "--fail-fast",
        "--log-level",
        "debug",
    ])
    .unwrap();

    let mut cfg = base_config();
    apply_cli_overrides(&mut cfg, &args);

    assert_eq!(args.config, PathBuf::from("other.toml"));
    assert_eq!(cfg.config.workers, 8);
    assert_eq!(cfg.config.concurrency, Some(3));
    assert_eq!(cfg.config.termination, TerminationMode::Daemon);
    assert_eq!(cfg.config.failure_policy, FailurePolicy::FailFast);
    assert!(validate_config(&cfg).is_ok());
}

#[test]
fn zero_workers_from_cli_fails_revalidation() {
    let args = CliArgs::try_parse_from(["fandag", "--workers", "0"]).unwrap();
    let mut cfg = base_config();
    apply_cli_overrides(&mut cfg, &args);
    assert!(validate_config(&cfg).is_err());
}

#[test]
fn unknown_log_level_is_a_parse_error() {
    assert!(CliArgs::try_parse_from(["fandag", "--log-level", "loud"]).is_err());
}

#[test]
fn env_log_levels_are_parsed_leniently() {
    assert_eq!(parse_level_str("debug"), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str(" WARNING "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("trace"), Some(tracing::Level::TRACE));
    assert_eq!(parse_level_str("chatty"), None);
}

#[test]
fn mode_options_are_parsed_from_strings() {
    let args = CliArgs::try_parse_from([
        "fandag",
        "--termination",
        "Daemon",
        "--failure-policy",
        "fail-fast",
    ])
    .unwrap();
    assert_eq!(args.termination, Some(TerminationMode::Daemon));
    assert_eq!(args.failure_policy, Some(FailurePolicy::FailFast));

    let mut cfg = base_config();
    apply_cli_overrides(&mut cfg, &args);
    assert_eq!(cfg.config.termination, TerminationMode::Daemon);
    assert_eq!(cfg.config.failure_policy, FailurePolicy::FailFast);
}

#[test]
fn mode_options_can_restore_defaults_over_config() {
    let mut cfg = ConfigFileBuilder::new()
        .termination(TerminationMode::Daemon)
        .failure_policy(FailurePolicy::FailFast)
        .with_task("A", TaskConfigBuilder::identity().build())
        .with_seed("A", 1)
        .build();
    let args = CliArgs::try_parse_from([
        "fandag",
        "--termination",
        "drain",
        "--failure-policy",
        "isolate",
    ])
    .unwrap();

    apply_cli_overrides(&mut cfg, &args);
    assert_eq!(cfg.config.termination, TerminationMode::Drain);
    assert_eq!(cfg.config.failure_policy, FailurePolicy::Isolate);
}

#[test]
fn unknown_mode_values_are_rejected() {
    assert!(CliArgs::try_parse_from(["fandag", "--termination", "forever"]).is_err());
    assert!(CliArgs::try_parse_from(["fandag", "--failure-policy", "shrug"]).is_err());
}

#[test]
fn shorthand_flags_conflict_with_explicit_modes() {
    assert!(
        CliArgs::try_parse_from(["fandag", "--daemon", "--termination", "drain"]).is_err()
    );
    assert!(
        CliArgs::try_parse_from(["fandag", "--fail-fast", "--failure-policy", "isolate"])
            .is_err()
    );
}

#[test]
fn log_flag_takes_precedence_over_env() {
    let filter = resolve_filter(Some(LogLevel::Trace), Some("error"));
    assert_eq!(filter.to_string(), "trace");
}

#[test]
fn env_accepts_bare_levels_and_directives() {
    assert_eq!(resolve_filter(None, Some("Debug")).to_string(), "debug");
    assert_eq!(resolve_filter(None, None).to_string(), "info");
    assert_eq!(resolve_filter(None, Some("   ")).to_string(), "info");

    let directive = resolve_filter(None, Some("fandag::engine=trace")).to_string();
    assert!(directive.contains("fandag::engine=trace"), "got: {directive}");
}
