//! Store configuration
//!
//! Values are resolved once, before the store is constructed, and are not
//! re-read afterwards.

use std::path::PathBuf;

/// Default on-disk location of the vector database
pub const VECTOR_DB_PATH: &str = "./vector_db";

/// Default collection name
pub const COLLECTION_NAME: &str = "email_collection";

/// Default sentence-embedding model
pub const EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Largest file accepted for ingest (100 MiB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// File extensions accepted for ingest
pub const SUPPORTED_FORMATS: &[&str] = &[".csv", ".json", ".txt", ".eml"];

pub const ENV_DB_PATH: &str = "EMAIL_VECTORS_DB_PATH";
pub const ENV_COLLECTION: &str = "EMAIL_VECTORS_COLLECTION";
pub const ENV_MODEL: &str = "EMAIL_VECTORS_MODEL";
pub const ENV_SEARCH_LIMIT: &str = "EMAIL_VECTORS_SEARCH_LIMIT";
pub const ENV_MODEL_CACHE: &str = "EMAIL_VECTORS_MODEL_CACHE";

/// Configuration for [`EmailVectorStore`](crate::EmailVectorStore)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorDbConfig {
    /// Directory holding the database files
    pub db_path: PathBuf,
    /// Name of the collection emails are stored in
    pub collection_name: String,
    /// Embedding model identifier
    pub embedding_model: String,
    /// Result limit used by [`EmailVectorStore::search`](crate::EmailVectorStore::search)
    pub search_limit: usize,
    /// Where downloaded model weights live (discovered when unset)
    pub model_cache_dir: Option<PathBuf>,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(VECTOR_DB_PATH),
            collection_name: COLLECTION_NAME.to_string(),
            embedding_model: EMBEDDING_MODEL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            model_cache_dir: None,
        }
    }
}

impl VectorDbConfig {
    /// Defaults overridden by `EMAIL_VECTORS_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.is_empty()) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(name) = lookup(ENV_COLLECTION).filter(|v| !v.is_empty()) {
            config.collection_name = name;
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.is_empty()) {
            config.embedding_model = model;
        }
        if let Some(raw) = lookup(ENV_SEARCH_LIMIT) {
            match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => config.search_limit = limit,
                _ => log::warn!(
                    "Ignoring {}={:?}: expected a positive integer",
                    ENV_SEARCH_LIMIT,
                    raw
                ),
            }
        }
        if let Some(cache) = lookup(ENV_MODEL_CACHE).filter(|v| !v.is_empty()) {
            config.model_cache_dir = Some(PathBuf::from(cache));
        }

        config
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the default search limit (clamped to at least 1)
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    pub fn with_model_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_cache_dir = Some(dir.into());
        self
    }
}
