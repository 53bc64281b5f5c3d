//! Error types for email-vectors

use thiserror::Error;

/// Errors that can occur in the vector store
#[derive(Debug, Error)]
pub enum VectorDbError {
    /// RocksDB error
    #[error("Storage error: {0}")]
    Storage(#[from] rocksdb::Error),

    /// Serialization error (bincode)
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Model loading error
    #[error("Model error: {0}")]
    Model(String),

    /// Embedding generation error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Collection name rejected by validation
    #[error("Invalid collection name: {0}")]
    InvalidCollectionName(String),

    /// Collection does not exist
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Collection already exists
    #[error("Collection already exists: {0}")]
    CollectionExists(String),

    /// Embedding length differs from the collection's
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Item id already stored or repeated within a batch
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// Bad argument to a store operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Database or collection could not be opened at construction
    #[error("Failed to initialize vector database: {0}")]
    Initialization(#[source] Box<VectorDbError>),

    /// Store has no open collection
    #[error("Vector database not initialized")]
    NotInitialized,

    /// Every record lacked text content
    #[error("No documents with text content to add")]
    NoDocuments,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VectorDbError {
    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Wrap a construction-time failure
    pub fn initialization(err: VectorDbError) -> Self {
        Self::Initialization(Box::new(err))
    }
}

/// Result type for vector store operations
pub type Result<T> = std::result::Result<T, VectorDbError>;
