//! Email Vectors
//!
//! Persistent semantic search over email records: emails are embedded with a
//! sentence-embedding model and stored, with their metadata, in a named
//! collection of an on-disk vector database.
//!
//! ## Features
//!
//! - **Local embeddings** - fastembed ONNX models (all-MiniLM-L6-v2 by default), or an offline hashing embedder
//! - **RocksDB persistence** - Atomic batch writes with HNSW index for nearest-neighbour search
//! - **Never-failing boundary** - Every operation also has a `try_*` form returning an explicit error
//!
//! ## Example
//!
//! ```ignore
//! use email_vectors::{EmailRecord, EmailVectorStore, VectorDbConfig};
//!
//! let mut store = EmailVectorStore::from_config(VectorDbConfig::from_env())?;
//!
//! let email = EmailRecord::new()
//!     .with_text("The /upload endpoint fails on large payloads")
//!     .with_field("subject", "Upload errors")
//!     .with_field("from", "ops@example.com");
//!
//! store.add_emails(&[email]);
//!
//! for hit in store.search_emails("upload failures", 5) {
//!     println!("{:.3} {}", hit.distance, hit.metadata["subject"]);
//! }
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod manager;
pub mod record;
pub mod storage;

// Re-exports for convenience
pub use config::VectorDbConfig;
pub use embedding::{load_provider, EmbeddingProvider, FastEmbedProvider, HashingEmbedder};
pub use error::VectorDbError;
pub use manager::{CollectionInfo, EmailVectorStore};
pub use record::{EmailRecord, Metadata, SearchHit, StoredItem, TEXT_FIELD};
pub use storage::{Collection, QueryMatch, VectorDatabase};
