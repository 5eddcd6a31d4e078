//! End-to-end tests for the data accessor façade.
//!
//! Exercises the full classify → guard → runner pipeline and the search →
//! format pipeline with in-memory doubles; no database required.

use std::sync::atomic::Ordering;
use std::time::Duration;

use db_warden::accessor::DataAccessor;
use db_warden::db::{MockQueryRunner, SlowQueryRunner, SpyQueryRunner};
use db_warden::error::WardenError;
use db_warden::search::{EmbeddingIndex, SchemaElement, NO_MATCHES_MESSAGE};

fn music_index() -> EmbeddingIndex {
    EmbeddingIndex::new(vec![
        SchemaElement::column_level("track", "title", "Title of the track", vec![1.0, 0.0, 0.0]),
        SchemaElement::column_level(
            "track",
            "milliseconds",
            "Track length in milliseconds",
            vec![0.9, 0.1, 0.0],
        ),
        SchemaElement::column_level("album", "title", "Album title", vec![0.0, 1.0, 0.0]),
        SchemaElement::table_level("artist", "Performing artists", vec![0.0, 0.0, 1.0]),
    ])
    .unwrap()
}

#[tokio::test]
async fn select_on_three_row_table_returns_three_rows() {
    let accessor = DataAccessor::new(Box::new(MockQueryRunner::new()), music_index());

    let result = accessor
        .execute_sql("SELECT * FROM music_table")
        .await
        .unwrap();

    assert_eq!(result.row_count, 3);
    assert_eq!(result.column_names(), vec!["id", "title", "artist"]);
}

#[tokio::test]
async fn drop_fails_before_any_connection_work() {
    let spy = SpyQueryRunner::new();
    let calls = spy.call_counter();
    let accessor = DataAccessor::new(Box::new(spy), music_index());

    let err = accessor
        .execute_sql("DROP TABLE music_table")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WardenError::Forbidden { .. }
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn select_then_drop_batch_is_rejected() {
    let spy = SpyQueryRunner::new();
    let calls = spy.call_counter();
    let accessor = DataAccessor::new(Box::new(spy), music_index());

    let err = accessor
        .execute_sql("SELECT 1; DROP TABLE music_table;")
        .await
        .unwrap_err();

    assert!(matches!(err, WardenError::MultipleStatements { count: 2 }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn all_select_batch_is_still_rejected() {
    let spy = SpyQueryRunner::new();
    let calls = spy.call_counter();
    let accessor = DataAccessor::new(Box::new(spy), music_index());

    let err = accessor
        .execute_sql("SELECT 1; SELECT 2")
        .await
        .unwrap_err();

    assert!(matches!(err, WardenError::MultipleStatements { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn insert_update_delete_all_fail_with_forbidden() {
    let accessor = DataAccessor::new(Box::new(MockQueryRunner::new()), music_index());

    for sql in [
        "INSERT INTO track (title) VALUES ('x')",
        "UPDATE track SET title = 'x'",
        "DELETE FROM track WHERE id = 1",
    ] {
        let err = accessor.execute_sql(sql).await.unwrap_err();
        assert!(
            matches!(err, WardenError::Forbidden { .. }),
            "SQL: '{}' - got {:?}",
            sql,
            err
        );
    }
}

#[tokio::test]
async fn timeout_surfaces_distinct_error() {
    let accessor = DataAccessor::new(
        Box::new(SlowQueryRunner::new(Duration::from_secs(60))),
        music_index(),
    )
    .with_query_timeout(Duration::from_millis(20));

    let err = accessor.execute_sql("SELECT 1").await.unwrap_err();
    assert!(matches!(err, WardenError::Timeout { .. }));
}

#[tokio::test]
async fn schema_search_renders_grouped_tables() {
    let accessor = DataAccessor::new(Box::new(MockQueryRunner::new()), music_index());

    let rendered = accessor.fetch_database_schema(&[1.0, 0.0, 0.0]).unwrap();

    // Both track columns score highest and group under one header.
    let track_pos = rendered.find("track:").unwrap();
    assert!(rendered.contains("  title: Title of the track"));
    assert!(rendered.contains("  milliseconds: Track length in milliseconds"));
    assert_eq!(track_pos, 0);
}

#[tokio::test]
async fn schema_search_wrong_dimension_fails_fast() {
    let accessor = DataAccessor::new(Box::new(MockQueryRunner::new()), music_index());

    let err = accessor.fetch_database_schema(&[1.0]).unwrap_err();

    match err {
        WardenError::DimensionMismatch { expected, actual } => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 1);
        }
        other => panic!("expected DimensionMismatch, got {:?}", other),
    }
}

#[tokio::test]
async fn schema_search_on_empty_index_reports_no_matches() {
    let accessor = DataAccessor::new(
        Box::new(MockQueryRunner::new()),
        EmbeddingIndex::new(vec![]).unwrap(),
    );

    let rendered = accessor.fetch_database_schema(&[0.5, 0.5]).unwrap();
    assert_eq!(rendered, NO_MATCHES_MESSAGE);
}

#[tokio::test]
async fn concurrent_calls_share_the_accessor() {
    let accessor = std::sync::Arc::new(DataAccessor::new(
        Box::new(MockQueryRunner::new()),
        music_index(),
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let accessor = std::sync::Arc::clone(&accessor);
        handles.push(tokio::spawn(async move {
            let result = accessor.execute_sql("SELECT * FROM music_table").await?;
            accessor.fetch_database_schema(&[1.0, 0.0, 0.0])?;
            Ok::<usize, WardenError>(result.row_count)
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 3);
    }
}
