//! Email vector store
//!
//! Owns the database handle and the email collection. Every public operation
//! comes in two forms: a `try_*` method returning [`Result`], and a
//! never-failing method that logs the error and returns a benign value
//! (`false`, an empty list, or `None`).
//!
//! The store is meant to have a single owner. Callers sharing it across
//! threads must wrap it in a mutex.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::VectorDbConfig;
use crate::embedding::{load_provider, EmbeddingProvider};
use crate::error::{Result, VectorDbError};
use crate::record::{new_item_id, EmailRecord, Metadata, SearchHit};
use crate::storage::{Collection, VectorDatabase};

/// Description stored on the email collection
pub const COLLECTION_DESCRIPTION: &str = "Email data collection";

/// Summary of the open collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub count: usize,
    pub path: PathBuf,
}

/// Persistent semantic index of emails
pub struct EmailVectorStore {
    config: VectorDbConfig,
    provider: Arc<dyn EmbeddingProvider>,
    database: Option<VectorDatabase>,
    collection: Option<Collection>,
}

impl EmailVectorStore {
    /// Open or create the collection described by `config`
    ///
    /// # Errors
    /// Returns [`VectorDbError::Initialization`] if the database directory or
    /// the collection cannot be opened or created.
    pub fn new(config: VectorDbConfig, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let mut store = Self {
            config,
            provider,
            database: None,
            collection: None,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Load the embedding model named in `config`, then open the store
    pub fn from_config(config: VectorDbConfig) -> Result<Self> {
        let provider = load_provider(&config)?;
        Self::new(config, provider)
    }

    fn initialize(&mut self) -> Result<()> {
        let database =
            VectorDatabase::open(&self.config.db_path).map_err(VectorDbError::initialization)?;

        let (collection, created) = database
            .get_or_create_collection(&self.config.collection_name, collection_metadata())
            .map_err(VectorDbError::initialization)?;

        if created {
            log::info!("Created new collection: {}", collection.name());
        } else {
            log::info!(
                "Loaded existing collection: {} ({} items)",
                collection.name(),
                collection.count()
            );
        }

        self.database = Some(database);
        self.collection = Some(collection);
        Ok(())
    }

    /// Check if the collection is open
    pub fn is_initialized(&self) -> bool {
        self.collection.is_some()
    }

    pub fn config(&self) -> &VectorDbConfig {
        &self.config
    }

    /// Name of the embedding model in use
    pub fn embedding_model(&self) -> &str {
        self.provider.model_name()
    }

    fn collection(&self) -> Result<&Collection> {
        self.collection.as_ref().ok_or(VectorDbError::NotInitialized)
    }

    /// Embed and store emails
    ///
    /// Records without text content are skipped. All remaining texts are
    /// embedded in one batch and written in one atomic batch.
    ///
    /// # Returns
    /// Number of emails stored
    ///
    /// # Errors
    /// [`VectorDbError::NoDocuments`] if no record had text; the store is not
    /// touched in that case.
    pub fn try_add_emails(&self, emails: &[EmailRecord]) -> Result<usize> {
        let collection = self.collection()?;

        let mut documents = Vec::new();
        let mut metadatas = Vec::new();
        let mut ids = Vec::new();

        for email in emails {
            let Some(text) = email.text() else {
                continue;
            };
            documents.push(text.to_string());
            metadatas.push(email.metadata());
            ids.push(new_item_id());
        }

        if documents.is_empty() {
            return Err(VectorDbError::NoDocuments);
        }

        let texts: Vec<&str> = documents.iter().map(String::as_str).collect();
        let embeddings = self.provider.embed_batch(&texts)?;
        if embeddings.len() != documents.len() {
            return Err(VectorDbError::embedding(format!(
                "Expected {} embeddings, got {}",
                documents.len(),
                embeddings.len()
            )));
        }

        collection.add(&ids, &embeddings, &documents, &metadatas)?;

        log::info!(
            "Successfully added {} emails to vector database",
            documents.len()
        );
        Ok(documents.len())
    }

    /// Embed and store emails, reporting success as a flag
    pub fn add_emails(&self, emails: &[EmailRecord]) -> bool {
        match self.try_add_emails(emails) {
            Ok(_) => true,
            Err(VectorDbError::NoDocuments) => {
                log::warn!("No emails with text content to add ({} given)", emails.len());
                false
            }
            Err(e) => {
                log::error!("Error adding emails to vector database: {}", e);
                false
            }
        }
    }

    /// Nearest emails to a natural-language query, closest first
    pub fn try_search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let collection = self.collection()?;
        if limit == 0 {
            return Err(VectorDbError::invalid_argument("limit must be at least 1"));
        }

        let query_embedding = self.provider.embed(query)?;
        let matches = collection.query(&query_embedding, limit)?;

        Ok(matches
            .into_iter()
            .map(|m| SearchHit {
                document: m.document,
                metadata: m.metadata,
                distance: m.distance,
            })
            .collect())
    }

    /// Nearest emails to `query`; empty on any failure
    pub fn search_emails(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        match self.try_search(query, limit) {
            Ok(hits) => hits,
            Err(VectorDbError::NotInitialized) => vec![],
            Err(e) => {
                log::error!("Error searching emails: {}", e);
                vec![]
            }
        }
    }

    /// [`search_emails`](Self::search_emails) with the configured limit
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.search_emails(query, self.config.search_limit)
    }

    pub fn try_collection_info(&self) -> Result<CollectionInfo> {
        let collection = self.collection()?;
        Ok(CollectionInfo {
            name: collection.name().to_string(),
            count: collection.count(),
            path: self.config.db_path.clone(),
        })
    }

    /// Name, item count and path of the collection; `None` when unavailable
    pub fn collection_info(&self) -> Option<CollectionInfo> {
        match self.try_collection_info() {
            Ok(info) => Some(info),
            Err(VectorDbError::NotInitialized) => None,
            Err(e) => {
                log::error!("Error getting collection info: {}", e);
                None
            }
        }
    }

    /// Delete the collection and recreate it empty
    ///
    /// The database directory is left in place.
    pub fn try_clear_collection(&mut self) -> Result<()> {
        let database = self.database.as_ref().ok_or(VectorDbError::NotInitialized)?;
        if self.collection.is_none() {
            return Err(VectorDbError::NotInitialized);
        }

        let name = self.config.collection_name.as_str();
        database.delete_collection(name)?;
        self.collection = None;
        self.collection = Some(database.create_collection(name, collection_metadata())?);

        log::info!("Cleared collection: {}", name);
        Ok(())
    }

    pub fn clear_collection(&mut self) -> bool {
        match self.try_clear_collection() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error clearing collection: {}", e);
                false
            }
        }
    }

    /// Wipe the database, remove its directory, and start over empty
    ///
    /// If reinitialisation fails the store is left uninitialized.
    pub fn try_delete_database(&mut self) -> Result<()> {
        if let Some(database) = &self.database {
            database.reset()?;
        }

        // Release the RocksDB lock before removing files
        self.collection = None;
        self.database = None;

        let path = &self.config.db_path;
        if path.exists() {
            std::fs::remove_dir_all(path)?;
            log::info!("Removed database directory: {}", path.display());
        }

        self.initialize()
    }

    pub fn delete_database(&mut self) -> bool {
        match self.try_delete_database() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error deleting database: {}", e);
                false
            }
        }
    }
}

fn collection_metadata() -> Metadata {
    Metadata::from([(
        "description".to_string(),
        COLLECTION_DESCRIPTION.to_string(),
    )])
}
