//! Database abstraction layer.
//!
//! Provides the `QueryRunner` trait the execution guard depends on, so the
//! real PostgreSQL driver and test doubles are interchangeable.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingQueryRunner, MockQueryRunner, SlowQueryRunner, SpyQueryRunner};
pub use postgres::PostgresRunner;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::DatabaseConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Connects to PostgreSQL and returns a boxed query runner.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &DatabaseConfig) -> Result<Box<dyn QueryRunner>> {
    let runner = PostgresRunner::connect(config).await?;
    Ok(Box::new(runner))
}

/// Capability to run a single read query against the database.
///
/// Implementations own connection acquisition and release; callers never hold
/// a connection across calls. Driver failures must be translated into
/// [`crate::error::WardenError`] variants, never passed through raw.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Executes a parameterless read query, materializing all rows.
    async fn run_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the underlying connection pool.
    async fn close(&self) -> Result<()>;
}
