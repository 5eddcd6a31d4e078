//! Test doubles for the `QueryRunner` trait.
//!
//! Provides canned, failing, spying, and slow runners so the guard and the
//! façade can be exercised without a live database.

use super::{ColumnInfo, QueryResult, QueryRunner, Row, Value};
use crate::error::{Result, WardenError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A query runner that returns a predefined result for every query.
pub struct MockQueryRunner {
    result: QueryResult,
}

impl MockQueryRunner {
    /// Creates a mock runner returning a three-row `music_table` sample.
    pub fn new() -> Self {
        let columns = vec![
            ColumnInfo::new("id", "integer"),
            ColumnInfo::new("title", "varchar"),
            ColumnInfo::new("artist", "varchar"),
        ];
        let rows: Vec<Row> = vec![
            vec![Value::Int(1), "Bohemian Rhapsody".into(), "Queen".into()],
            vec![Value::Int(2), "Starman".into(), "David Bowie".into()],
            vec![Value::Int(3), "Kashmir".into(), "Led Zeppelin".into()],
        ];
        Self {
            result: QueryResult::with_data(columns, rows),
        }
    }

    /// Creates a mock runner returning the given result.
    pub fn with_result(result: QueryResult) -> Self {
        Self { result }
    }
}

impl Default for MockQueryRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryRunner for MockQueryRunner {
    async fn run_query(&self, _sql: &str) -> Result<QueryResult> {
        Ok(self.result.clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A query runner that fails every query with an execution error.
pub struct FailingQueryRunner {
    message: String,
}

impl FailingQueryRunner {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl QueryRunner for FailingQueryRunner {
    async fn run_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(WardenError::execution(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A query runner that records every invocation.
///
/// Used to verify that rejected statements never reach the database.
pub struct SpyQueryRunner {
    calls: Arc<AtomicUsize>,
}

impl SpyQueryRunner {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns a handle to the invocation counter.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Returns the number of queries that reached this runner.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for SpyQueryRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryRunner for SpyQueryRunner {
    async fn run_query(&self, _sql: &str) -> Result<QueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(QueryResult::new())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A query runner that sleeps before answering, for timeout tests.
pub struct SlowQueryRunner {
    delay: Duration,
}

impl SlowQueryRunner {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl QueryRunner for SlowQueryRunner {
    async fn run_query(&self, _sql: &str) -> Result<QueryResult> {
        tokio::time::sleep(self.delay).await;
        Ok(QueryResult::new())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
