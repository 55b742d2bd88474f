//! Batched ingestion for live sources (e.g., streaming transcript chunks).
//!
//! Documents accumulate under a lock and flush to the vector store every
//! `batch_size` items and once more on shutdown. A failed flush drops that
//! batch instead of retrying: ingestion from live sources is best-effort,
//! at-most-once.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use minute_core::error::Result;
use minute_core::types::IndexedDocument;

use crate::store::VectorStore;

pub struct BatchIngestor {
    store: Arc<dyn VectorStore>,
    namespace: String,
    batch_size: usize,
    pending: Mutex<Vec<IndexedDocument>>,
}

impl BatchIngestor {
    /// `batch_size` of 0 is treated as 1 (flush on every push).
    pub fn new(store: Arc<dyn VectorStore>, namespace: impl Into<String>, batch_size: usize) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            batch_size: batch_size.max(1),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Queue one document, flushing if the batch is full.
    pub async fn push(&self, document: IndexedDocument) -> Result<()> {
        let mut pending = self.pending.lock().await;
        pending.push(document);
        if pending.len() >= self.batch_size {
            self.flush_locked(&mut pending).await;
        }
        Ok(())
    }

    /// Flush whatever is queued right now.
    pub async fn flush(&self) {
        let mut pending = self.pending.lock().await;
        self.flush_locked(&mut pending).await;
    }

    /// Final flush; call once when the source ends.
    pub async fn shutdown(&self) {
        self.flush().await;
    }

    /// Number of documents currently queued.
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn flush_locked(&self, pending: &mut Vec<IndexedDocument>) {
        if pending.is_empty() {
            return;
        }
        let batch = std::mem::take(pending);
        let count = batch.len();
        match self.store.upsert(batch, &self.namespace).await {
            Ok(()) => debug!(count, namespace = %self.namespace, "Batch flushed"),
            // At-most-once: the batch is already dropped, do not requeue.
            Err(e) => warn!(count, error = %e, "Batch flush failed; dropping batch"),
        }
    }
}
