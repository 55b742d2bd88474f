use thiserror::Error;

/// Top-level error type for the Minute system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<MinuteError>` so that the `?`
/// operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MinuteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chunking error: {0}")]
    Chunking(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Language model error: {0}")]
    Model(String),

    #[error("Document store error: {0}")]
    DocumentStore(String),

    #[error("Metadata extraction error: {0}")]
    Extraction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MinuteError {
    fn from(err: toml::de::Error) -> Self {
        MinuteError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MinuteError {
    fn from(err: toml::ser::Error) -> Self {
        MinuteError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MinuteError {
    fn from(err: serde_json::Error) -> Self {
        MinuteError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Minute operations.
pub type Result<T> = std::result::Result<T, MinuteError>;
