//! Live PostgreSQL tests.
//!
//! These tests require a running database and are skipped unless
//! DATABASE_URL is set.

use db_warden::classify::classify_sql;
use db_warden::config::DatabaseConfig;
use db_warden::db::{PostgresRunner, QueryRunner, Value};
use db_warden::query::ExecutionGuard;

/// Helper to create a runner from DATABASE_URL.
async fn get_test_runner() -> Option<PostgresRunner> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = DatabaseConfig::from_connection_string(&url).ok()?;
    PostgresRunner::connect(&config).await.ok()
}

#[tokio::test]
async fn test_execute_simple_select() {
    let Some(runner) = get_test_runner().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let statement = classify_sql("SELECT 1 AS num, 'hello' AS greeting").unwrap();
    let guard = ExecutionGuard::new(&runner);
    let result = guard.execute(&statement).await.unwrap();

    assert_eq!(result.columns.len(), 2);
    assert_eq!(result.columns[0].name, "num");
    assert_eq!(result.columns[1].name, "greeting");
    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows[0][0], Value::Int(1));

    runner.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_result_is_not_an_error() {
    let Some(runner) = get_test_runner().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let statement = classify_sql("SELECT 1 AS n WHERE false").unwrap();
    let guard = ExecutionGuard::new(&runner);
    let result = guard.execute(&statement).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(result.row_count, 0);

    runner.close().await.unwrap();
}

#[tokio::test]
async fn test_driver_error_becomes_execution_error() {
    let Some(runner) = get_test_runner().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let statement = classify_sql("SELECT * FROM nonexistent_table_xyz").unwrap();
    let guard = ExecutionGuard::new(&runner);
    let error = guard.execute(&statement).await.unwrap_err();

    assert!(matches!(
        error,
        db_warden::error::WardenError::Execution(_)
    ));
    assert!(
        error.to_string().contains("nonexistent_table_xyz")
            || error.to_string().contains("does not exist")
    );

    runner.close().await.unwrap();
}
