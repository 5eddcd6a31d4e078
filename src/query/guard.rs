//! Execution guard for classified statements.
//!
//! Enforces the classifier's verdict immediately before execution and applies
//! the query deadline. The guard never trusts a caller to have validated: a
//! non-SELECT statement fails here without the runner ever being invoked.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::classify::SqlStatement;
use crate::db::{QueryResult, QueryRunner};
use crate::error::{Result, WardenError};

/// Default deadline for a single query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Guards query execution behind a kind check and a deadline.
pub struct ExecutionGuard<'a> {
    runner: &'a dyn QueryRunner,
    timeout: Duration,
}

impl<'a> ExecutionGuard<'a> {
    /// Creates a guard with the default timeout.
    pub fn new(runner: &'a dyn QueryRunner) -> Self {
        Self {
            runner,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Creates a guard with a custom timeout.
    pub fn with_timeout(runner: &'a dyn QueryRunner, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    /// Executes a classified statement, materializing all rows.
    ///
    /// Fails with [`WardenError::Forbidden`] before any I/O if the statement
    /// kind is not SELECT, and with [`WardenError::Timeout`] if the deadline
    /// elapses. On timeout the in-flight future is dropped, which cancels the
    /// driver operation; the pool reclaims the connection.
    pub async fn execute(&self, statement: &SqlStatement) -> Result<QueryResult> {
        if !statement.kind().is_allowed() {
            warn!(kind = %statement.kind(), "refusing to execute non-SELECT statement");
            return Err(WardenError::forbidden(
                statement.kind(),
                "refusing to execute a non-SELECT statement",
            ));
        }

        let started = Instant::now();

        let result = tokio::time::timeout(
            self.timeout,
            self.runner.run_query(statement.normalized()),
        )
        .await;

        match result {
            Err(_elapsed) => {
                warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "query exceeded deadline, cancelling"
                );
                Err(WardenError::Timeout {
                    seconds: self.timeout.as_secs(),
                })
            }
            Ok(Err(e)) => Err(e),
            Ok(Ok(query_result)) => {
                let execution_time = started.elapsed();
                debug!(
                    rows = query_result.row_count,
                    elapsed_ms = execution_time.as_millis() as u64,
                    "query executed"
                );
                Ok(query_result.with_execution_time(execution_time))
            }
        }
    }
}
