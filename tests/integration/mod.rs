// tests/integration/mod.rs

mod cli_overrides;
mod config_errors;
mod config_run;
