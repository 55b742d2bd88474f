use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MinuteError, Result};

/// Top-level configuration for the Minute application.
///
/// Loaded from `~/.minute/config.toml` by default. Each section corresponds
/// to one subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinuteConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

impl MinuteConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MinuteConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MinuteError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Chunking engine parameters. Sizes are in Unicode characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Minimum characters before a chunk may be cut.
    pub min_chunk_size: usize,
    /// Maximum characters a chunk may grow to before a cut is forced.
    pub max_chunk_size: usize,
    /// Trailing characters of the previous chunk prepended to the next one.
    ///
    /// Overlap is applied after size bounding, so post-overlap chunks may
    /// exceed `max_chunk_size` by up to this many characters.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: 1500,
            max_chunk_size: 3000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval parameters shared by the planner and the search tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Vector-store namespace all documents live in.
    pub namespace: String,
    /// Result count for focused questions.
    pub focused_k: usize,
    /// Result count for comprehensive questions without a meeting filter.
    pub comprehensive_k: usize,
    /// Result count when retrieving a whole meeting by id.
    pub full_meeting_k: usize,
    /// Documents scanned when listing recent meetings.
    pub list_scan_k: usize,
    /// Documents accumulated before the batch ingestor flushes.
    pub batch_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            focused_k: 5,
            comprehensive_k: 20,
            full_meeting_k: 100,
            list_scan_k: 100,
            batch_size: 5,
        }
    }
}

/// Conversational agent parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum model calls per user turn before the loop is stopped.
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { max_iterations: 10 }
    }
}
