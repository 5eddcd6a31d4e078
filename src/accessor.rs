//! The data accessor façade.
//!
//! Single entry point composing the classifier, the execution guard, and the
//! embedding index. External callers see exactly two operations: execute a
//! SQL string, or fetch a schema description ranked against a query vector.

use std::time::Duration;

use tracing::{info, warn};

use crate::classify::SqlClassifier;
use crate::config::DatabaseConfig;
use crate::db::{self, QueryResult, QueryRunner};
use crate::error::Result;
use crate::query::{ExecutionGuard, DEFAULT_QUERY_TIMEOUT};
use crate::search::{format_matches, EmbeddingIndex, PostgresSchemaStore};

/// Ranked elements returned per schema search.
pub const DEFAULT_SCHEMA_TOP_K: usize = 4;

/// Read-only SQL gateway with embedding-based schema search.
pub struct DataAccessor {
    classifier: SqlClassifier,
    runner: Box<dyn QueryRunner>,
    index: EmbeddingIndex,
    query_timeout: Duration,
    schema_top_k: usize,
}

impl DataAccessor {
    /// Creates an accessor from a query runner and a loaded index.
    pub fn new(runner: Box<dyn QueryRunner>, index: EmbeddingIndex) -> Self {
        Self {
            classifier: SqlClassifier::new(),
            runner,
            index,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            schema_top_k: DEFAULT_SCHEMA_TOP_K,
        }
    }

    /// Connects to PostgreSQL and loads the schema-element index.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to {}", config.display_string());
        let runner = db::connect(config).await?;

        let store = PostgresSchemaStore::connect(config).await?;
        let index = EmbeddingIndex::load(&store).await?;

        Ok(Self::new(runner, index))
    }

    /// Overrides the query deadline.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Overrides how many ranked elements a schema search returns.
    pub fn with_schema_top_k(mut self, top_k: usize) -> Self {
        self.schema_top_k = top_k;
        self
    }

    /// Classifies and executes a raw SQL string.
    ///
    /// Failures from classification or execution propagate unchanged, so
    /// callers can tell a rejected statement from a database failure.
    pub async fn execute_sql(&self, sql: &str) -> Result<QueryResult> {
        let statement = self.classifier.classify(sql).inspect_err(|e| {
            warn!(category = e.category(), "rejected SQL statement");
        })?;

        let guard = ExecutionGuard::with_timeout(self.runner.as_ref(), self.query_timeout);
        let result = guard.execute(&statement).await?;

        info!(rows = result.row_count, "SQL executed");
        Ok(result)
    }

    /// Ranks schema elements against `query_vector` and renders them.
    ///
    /// Pure computation over the loaded index; never touches the database.
    pub fn fetch_database_schema(&self, query_vector: &[f32]) -> Result<String> {
        let matches = self.index.search(query_vector, self.schema_top_k)?;
        info!(matches = matches.len(), "schema search completed");
        Ok(format_matches(&matches))
    }

    /// Closes the underlying connection pool.
    pub async fn close(&self) -> Result<()> {
        self.runner.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MockQueryRunner, SpyQueryRunner};
    use crate::error::WardenError;
    use crate::search::{SchemaElement, NO_MATCHES_MESSAGE};

    fn sample_index() -> EmbeddingIndex {
        EmbeddingIndex::new(vec![
            SchemaElement::column_level("track", "title", "Track title", vec![1.0, 0.0]),
            SchemaElement::column_level("album", "name", "Album name", vec![0.0, 1.0]),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_execute_sql_select() {
        let accessor = DataAccessor::new(Box::new(MockQueryRunner::new()), sample_index());

        let result = accessor
            .execute_sql("SELECT * FROM music_table")
            .await
            .unwrap();

        assert_eq!(result.row_count, 3);
    }

    #[tokio::test]
    async fn test_execute_sql_rejects_drop_before_any_io() {
        let spy = SpyQueryRunner::new();
        let calls = spy.call_counter();
        let accessor = DataAccessor::new(Box::new(spy), sample_index());

        let err = accessor
            .execute_sql("DROP TABLE music_table")
            .await
            .unwrap_err();

        assert!(matches!(err, WardenError::Forbidden { .. }));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_execute_sql_rejects_batch() {
        let spy = SpyQueryRunner::new();
        let calls = spy.call_counter();
        let accessor = DataAccessor::new(Box::new(spy), sample_index());

        let err = accessor
            .execute_sql("SELECT 1; DROP TABLE music_table;")
            .await
            .unwrap_err();

        assert!(matches!(err, WardenError::MultipleStatements { .. }));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_database_schema_formats_matches() {
        let accessor = DataAccessor::new(Box::new(MockQueryRunner::new()), sample_index());

        let rendered = accessor.fetch_database_schema(&[1.0, 0.0]).unwrap();

        assert!(rendered.starts_with("track:"));
        assert!(rendered.contains("  title: Track title"));
    }

    #[tokio::test]
    async fn test_fetch_database_schema_wrong_dimension() {
        let accessor = DataAccessor::new(Box::new(MockQueryRunner::new()), sample_index());

        let err = accessor
            .fetch_database_schema(&[1.0, 0.0, 0.0])
            .unwrap_err();

        assert!(matches!(err, WardenError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_fetch_database_schema_empty_index() {
        let accessor = DataAccessor::new(
            Box::new(MockQueryRunner::new()),
            EmbeddingIndex::new(vec![]).unwrap(),
        );

        let rendered = accessor.fetch_database_schema(&[1.0, 0.0]).unwrap();
        assert_eq!(rendered, NO_MATCHES_MESSAGE);
    }

    #[tokio::test]
    async fn test_schema_top_k_override() {
        let accessor = DataAccessor::new(Box::new(MockQueryRunner::new()), sample_index())
            .with_schema_top_k(1);

        let rendered = accessor.fetch_database_schema(&[1.0, 0.0]).unwrap();
        assert!(rendered.contains("track:"));
        assert!(!rendered.contains("album:"));
    }
}
