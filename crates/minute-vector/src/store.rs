//! Vector-store contract and the in-memory brute-force implementation.
//!
//! The external vector database is reached through [`VectorStore`]; the
//! store embeds query text internally, so the embedding collaborator never
//! leaks to other subsystems. Filters are metadata equality predicates and
//! documents live in named namespaces.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use minute_core::error::{MinuteError, Result};
use minute_core::types::{IndexedDocument, MetadataFilter, ScoredDocument};

use crate::embedding::{DynEmbeddingService, EmbeddingService};

/// Narrow contract of the external vector database.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or overwrite documents by id within a namespace.
    async fn upsert(&self, documents: Vec<IndexedDocument>, namespace: &str) -> Result<()>;

    /// Embed `query_text` and return the `top_k` most similar documents,
    /// optionally restricted by a metadata equality filter.
    async fn query(
        &self,
        query_text: &str,
        top_k: usize,
        filter: Option<&MetadataFilter>,
        namespace: &str,
    ) -> Result<Vec<ScoredDocument>>;

    /// Delete documents matching the filter; `None` clears the namespace.
    /// Returns the number of documents removed.
    async fn delete(&self, filter: Option<&MetadataFilter>, namespace: &str) -> Result<usize>;
}

struct StoredEntry {
    embedding: Vec<f32>,
    document: IndexedDocument,
}

/// In-memory vector store with brute-force cosine similarity search.
///
/// Thread-safe via an interior RwLock; O(n) per query, which is fine for the
/// dataset sizes the tests and the local CLI work with.
pub struct InMemoryVectorStore {
    embedder: Box<dyn DynEmbeddingService>,
    namespaces: RwLock<HashMap<String, HashMap<String, StoredEntry>>>,
}

impl InMemoryVectorStore {
    /// Create an empty store over the given embedding service.
    pub fn new(embedder: impl EmbeddingService + 'static) -> Self {
        Self {
            embedder: Box::new(embedder),
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    /// Total number of documents in a namespace.
    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .map(|ns| ns.get(namespace).map(|m| m.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, namespace: &str) -> bool {
        self.len(namespace) == 0
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, documents: Vec<IndexedDocument>, namespace: &str) -> Result<()> {
        let mut embedded = Vec::with_capacity(documents.len());
        for doc in documents {
            if doc.metadata.get("meeting_id").is_none() {
                return Err(MinuteError::Store(format!(
                    "Document {} is missing meeting_id metadata",
                    doc.id
                )));
            }
            let embedding = self.embedder.embed_boxed(&doc.text).await?;
            embedded.push((doc, embedding));
        }

        let mut namespaces = self
            .namespaces
            .write()
            .map_err(|e| MinuteError::Store(format!("Lock poisoned: {}", e)))?;
        let entries = namespaces.entry(namespace.to_string()).or_default();
        let count = embedded.len();
        for (document, embedding) in embedded {
            entries.insert(
                document.id.clone(),
                StoredEntry {
                    embedding,
                    document,
                },
            );
        }
        tracing::debug!(count, namespace, "Documents upserted");
        Ok(())
    }

    async fn query(
        &self,
        query_text: &str,
        top_k: usize,
        filter: Option<&MetadataFilter>,
        namespace: &str,
    ) -> Result<Vec<ScoredDocument>> {
        let query_vec = self.embedder.embed_boxed(query_text).await?;

        let namespaces = self
            .namespaces
            .read()
            .map_err(|e| MinuteError::Store(format!("Lock poisoned: {}", e)))?;
        let Some(entries) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredDocument> = entries
            .values()
            .filter(|entry| {
                filter
                    .map(|f| f.matches(&entry.document.metadata))
                    .unwrap_or(true)
            })
            .map(|entry| ScoredDocument {
                score: cosine_similarity(&query_vec, &entry.embedding),
                document: entry.document.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                // Stable tie-break so identical scores keep a fixed order.
                .then_with(|| a.document.id.cmp(&b.document.id))
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn delete(&self, filter: Option<&MetadataFilter>, namespace: &str) -> Result<usize> {
        let mut namespaces = self
            .namespaces
            .write()
            .map_err(|e| MinuteError::Store(format!("Lock poisoned: {}", e)))?;
        let Some(entries) = namespaces.get_mut(namespace) else {
            return Ok(0);
        };

        let before = entries.len();
        match filter {
            Some(f) => entries.retain(|_, entry| !f.matches(&entry.document.metadata)),
            None => entries.clear(),
        }
        Ok(before - entries.len())
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude or lengths differ.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();

    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}
