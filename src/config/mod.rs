// src/config/mod.rs

//! Configuration loading and validation for fandag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate references and pool settings (`validate.rs`).
//! - Build the task graph and seeds it describes (`build.rs`).

pub mod build;
pub mod loader;
pub mod model;
pub mod validate;

pub use build::{ConfiguredGraph, build_graph};
pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{ActionKind, ConfigFile, ConfigSection, SeedConfig, TaskConfig};
pub use validate::validate_config;
