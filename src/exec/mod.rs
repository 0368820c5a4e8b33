// src/exec/mod.rs

//! Action execution layer.
//!
//! - [`action`] provides the `Action` trait the scheduler invokes, plus the
//!   `from_fn` closure adapter.
//! - [`builtin`] contains the `i64` actions (`identity`, `multiply`, `add`,
//!   `fail`) that config files can refer to.

pub mod action;
pub mod builtin;

pub use action::{Action, ActionFuture, FnAction, from_fn};
pub use builtin::{BuiltinAction, Operation};
