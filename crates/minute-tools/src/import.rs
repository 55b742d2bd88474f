//! Import-by-reference: fetch a document's true full content from the
//! external document store and route it through generic ingestion.
//!
//! Fetching happens in code, not through the model, so the stored content
//! is the page itself rather than a paraphrase that could silently drop
//! detail.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use minute_chunk::ChunkingParams;
use minute_core::config::RetrievalConfig;
use minute_core::error::MinuteError;
use minute_vector::VectorStore;

use crate::error::ToolError;
use crate::ingest::{ingest_document_text, MetadataExtractor};
use crate::registry::{parse_args, Tool, ToolContext};

// =============================================================================
// Document store collaborator
// =============================================================================

/// A candidate page returned from a document-store search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub id: String,
    pub title: String,
}

/// Narrow contract of the external document store (wiki, notes service).
///
/// `fetch` returns the complete text content; implementations handle any
/// pagination internally so callers never see partial pages.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PageRef>, MinuteError>;
    async fn fetch(&self, page_id: &str) -> Result<String, MinuteError>;
}

/// In-memory document store for tests and local runs.
///
/// Pages are stored as block lists to exercise the pagination contract:
/// `fetch` concatenates all blocks, mirroring a real client walking pages
/// of block children.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    pages: Vec<(PageRef, Vec<String>)>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page whose content is split into blocks.
    pub fn add_page(&mut self, id: &str, title: &str, blocks: Vec<String>) {
        self.pages.push((
            PageRef {
                id: id.to_string(),
                title: title.to_string(),
            },
            blocks,
        ));
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn search(&self, query: &str) -> Result<Vec<PageRef>, MinuteError> {
        let needle = query.to_lowercase();
        Ok(self
            .pages
            .iter()
            .filter(|(page, _)| page.title.to_lowercase().contains(&needle))
            .map(|(page, _)| page.clone())
            .collect())
    }

    async fn fetch(&self, page_id: &str) -> Result<String, MinuteError> {
        self.pages
            .iter()
            .find(|(page, _)| page.id == page_id)
            .map(|(_, blocks)| blocks.join("\n"))
            .ok_or_else(|| MinuteError::DocumentStore(format!("Page not found: {}", page_id)))
    }
}

// =============================================================================
// import_document
// =============================================================================

/// Find a page in the external document store by name and ingest its full
/// content.
pub struct ImportDocumentTool {
    documents: Arc<dyn DocumentStore>,
    store: Arc<dyn VectorStore>,
    extractor: Arc<dyn MetadataExtractor>,
    chunking: ChunkingParams,
    retrieval: RetrievalConfig,
}

impl ImportDocumentTool {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        store: Arc<dyn VectorStore>,
        extractor: Arc<dyn MetadataExtractor>,
        chunking: ChunkingParams,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            documents,
            store,
            extractor,
            chunking,
            retrieval,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImportArgs {
    query: String,
}

#[async_trait]
impl Tool for ImportDocumentTool {
    fn name(&self) -> &'static str {
        "import_document"
    }

    fn description(&self) -> &'static str {
        "Search the external document store by page name, fetch the page's full \
         content, and save it into the index. Use this instead of save_text for \
         stored documents so nothing is lost to summarization."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Page name or title fragment to import."},
            },
            "required": ["query"],
        })
    }

    async fn invoke(&self, _ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let args: ImportArgs = parse_args(args)?;
        if args.query.trim().is_empty() {
            return Ok("No page name given to import.".to_string());
        }

        let candidates = self
            .documents
            .search(&args.query)
            .await
            .map_err(|e| ToolError::Unavailable(format!("Document store search failed: {}", e)))?;

        let Some(page) = candidates.first() else {
            return Ok(format!("No documents found matching '{}'.", args.query));
        };

        let content = self
            .documents
            .fetch(&page.id)
            .await
            .map_err(|e| ToolError::Unavailable(format!("Document fetch failed: {}", e)))?;

        if content.trim().is_empty() {
            return Ok(format!(
                "Document '{}' was found but has no content to import.",
                page.title
            ));
        }

        tracing::info!(page_id = %page.id, title = %page.title, "Importing document");

        ingest_document_text(
            &self.store,
            &self.extractor,
            &self.chunking,
            &self.retrieval,
            &content,
            &page.title,
            "Document Import",
            None,
        )
        .await
    }
}

// =============================================================================
// Tests
// =============================================================================
