//! Schema semantic search.
//!
//! Holds per-element description embeddings and ranks them against a
//! caller-supplied query vector by cosine similarity. The index is read-only
//! after load; concurrent searches share it without coordination.

mod format;
mod store;

pub use format::{format_matches, NO_MATCHES_MESSAGE};
pub use store::{PostgresSchemaStore, SchemaElementStore, StaticSchemaStore};

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WardenError};

/// A table or column paired with its human-authored description and the
/// embedding of that description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaElement {
    /// Table this element belongs to.
    pub table: String,

    /// Column name, or None for a table-level description.
    pub column: Option<String>,

    /// Human-readable description of the element.
    pub description: String,

    /// Fixed-dimension embedding of the description.
    pub embedding: Vec<f32>,
}

impl SchemaElement {
    /// Creates a table-level element.
    pub fn table_level(
        table: impl Into<String>,
        description: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            table: table.into(),
            column: None,
            description: description.into(),
            embedding,
        }
    }

    /// Creates a column-level element.
    pub fn column_level(
        table: impl Into<String>,
        column: impl Into<String>,
        description: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            table: table.into(),
            column: Some(column.into()),
            description: description.into(),
            embedding,
        }
    }
}

/// A schema element paired with its similarity score and rank position.
///
/// Constructed per search call and discarded after formatting.
#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub element: SchemaElement,
    /// Cosine similarity to the query vector; higher is more relevant.
    pub score: f32,
    /// 1-based position in the ranked result.
    pub rank: usize,
}

/// In-memory index of schema-element embeddings.
#[derive(Debug, Default)]
pub struct EmbeddingIndex {
    elements: Vec<SchemaElement>,
    dimension: Option<usize>,
}

impl EmbeddingIndex {
    /// Builds an index from loaded elements.
    ///
    /// All elements must share one embedding dimension; the first element
    /// fixes it. An empty element set is valid and yields empty searches.
    pub fn new(elements: Vec<SchemaElement>) -> Result<Self> {
        let dimension = elements.first().map(|e| e.embedding.len());

        if let Some(expected) = dimension {
            for element in &elements {
                if element.embedding.len() != expected {
                    return Err(WardenError::DimensionMismatch {
                        expected,
                        actual: element.embedding.len(),
                    });
                }
            }
        }

        Ok(Self {
            elements,
            dimension,
        })
    }

    /// Loads an index from a schema-element store.
    pub async fn load(store: &dyn SchemaElementStore) -> Result<Self> {
        Self::new(store.load_elements().await?)
    }

    /// Number of elements held by the index.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true when no elements are loaded.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Embedding dimension fixed at load time, or None for an empty index.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Ranks the stored elements against `query_vector`.
    ///
    /// Returns at most `top_k` matches in strictly descending score order;
    /// ties break by ascending load index, so ordering is reproducible and
    /// independent of description text. A `top_k` larger than the element
    /// count returns all elements. An empty index yields an empty sequence,
    /// not an error; the dimension check cannot apply when no dimension was
    /// fixed at load.
    pub fn search(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<RankedMatch>> {
        if let Some(expected) = self.dimension {
            if query_vector.len() != expected {
                return Err(WardenError::DimensionMismatch {
                    expected,
                    actual: query_vector.len(),
                });
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| (index, cosine_similarity(query_vector, &element.embedding)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        Ok(scored
            .into_iter()
            .take(top_k)
            .enumerate()
            .map(|(position, (index, score))| RankedMatch {
                element: self.elements[index].clone(),
                score,
                rank: position + 1,
            })
            .collect())
    }
}

/// Cosine similarity between two equal-length vectors.
///
/// Returns 0.0 when either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
