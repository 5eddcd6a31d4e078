//! Query execution layer.
//!
//! Sits between the classifier and the database driver: nothing reaches a
//! `QueryRunner` without passing through the guard in this module.

mod guard;

pub use guard::{ExecutionGuard, DEFAULT_QUERY_TIMEOUT};
