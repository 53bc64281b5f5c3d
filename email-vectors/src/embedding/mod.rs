//! Embedding providers
//!
//! Sentence embeddings come from fastembed (ONNX, all-MiniLM-L6-v2 by
//! default). A deterministic hashing embedder covers offline use and tests.

mod discovery;
mod hashing;
mod onnx;
mod provider;

pub use discovery::find_model_cache_dir;
pub use hashing::{HashingEmbedder, DEFAULT_HASHING_DIMENSION};
pub use onnx::{resolve_model, FastEmbedProvider};
pub use provider::{load_provider, EmbeddingProvider};
