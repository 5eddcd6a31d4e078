//! Warden - a read-only SQL gateway with embedding-based schema search.
//!
//! Untrusted SQL text is classified before execution so that only single,
//! read-only SELECT statements ever reach PostgreSQL; schema questions are
//! answered by ranking precomputed description embeddings against a
//! caller-supplied query vector.

pub mod accessor;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod query;
pub mod search;

pub use accessor::DataAccessor;
pub use error::{Result, WardenError};
