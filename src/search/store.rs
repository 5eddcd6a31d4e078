//! Schema-element stores.
//!
//! The embedding index is loaded once per process from a store: the real one
//! reads the `schema_embeddings` table in PostgreSQL, while the static store
//! serves fixed elements from memory or a JSON file.

use std::path::Path;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{Result, WardenError};

use super::SchemaElement;

/// Capability to supply the table/column → description → embedding mapping.
#[async_trait]
pub trait SchemaElementStore: Send + Sync {
    /// Loads all schema elements, in a stable order.
    async fn load_elements(&self) -> Result<Vec<SchemaElement>>;
}

/// Store backed by a `schema_embeddings` table.
///
/// Expected shape: `table_name TEXT, column_name TEXT NULL, description TEXT,
/// embedding REAL[]`.
#[derive(Debug)]
pub struct PostgresSchemaStore {
    pool: PgPool,
}

impl PostgresSchemaStore {
    /// Connects a small dedicated pool for schema loading.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&conn_str)
            .await
            .map_err(|e| WardenError::connection(format!("schema store: {e}")))?;

        Ok(Self { pool })
    }

    /// Creates a store from an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaElementStore for PostgresSchemaStore {
    async fn load_elements(&self) -> Result<Vec<SchemaElement>> {
        let rows: Vec<(String, Option<String>, String, Vec<f32>)> = sqlx::query_as(
            r#"
            SELECT table_name, column_name, description, embedding
            FROM schema_embeddings
            ORDER BY table_name, column_name NULLS FIRST
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| WardenError::execution(format!("Failed to load schema embeddings: {e}")))?;

        let elements: Vec<SchemaElement> = rows
            .into_iter()
            .map(|(table, column, description, embedding)| SchemaElement {
                table,
                column,
                description,
                embedding,
            })
            .collect();

        info!("Loaded {} schema elements", elements.len());
        Ok(elements)
    }
}

/// In-memory store with a fixed element set.
#[derive(Debug, Default)]
pub struct StaticSchemaStore {
    elements: Vec<SchemaElement>,
}

impl StaticSchemaStore {
    /// Creates a store serving the given elements.
    pub fn new(elements: Vec<SchemaElement>) -> Self {
        Self { elements }
    }

    /// Loads elements from a JSON file containing an array of schema elements.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WardenError::config(format!("Failed to read {}: {e}", path.display()))
        })?;

        let elements: Vec<SchemaElement> = serde_json::from_str(&content).map_err(|e| {
            WardenError::config(format!("Invalid schema elements in {}: {e}", path.display()))
        })?;

        Ok(Self::new(elements))
    }
}

#[async_trait]
impl SchemaElementStore for StaticSchemaStore {
    async fn load_elements(&self) -> Result<Vec<SchemaElement>> {
        Ok(self.elements.clone())
    }
}
