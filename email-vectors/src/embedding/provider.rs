//! Embedding provider trait and selection

use std::sync::Arc;

use super::discovery::find_model_cache_dir;
use super::hashing::HashingEmbedder;
use super::onnx::FastEmbedProvider;
use crate::config::VectorDbConfig;
use crate::error::{Result, VectorDbError};

/// Turns text into fixed-length vectors
///
/// Implementations return one vector per input text, in input order, all of
/// length [`dimension`](Self::dimension).
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the underlying model
    fn model_name(&self) -> &str;

    /// Length of every vector this provider produces
    fn dimension(&self) -> usize;

    /// Embed a batch of texts
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| VectorDbError::embedding("Model returned no embedding"))
    }
}

/// Build the provider named by `config.embedding_model`
///
/// `hashing` / `hashing-<dim>` select the offline [`HashingEmbedder`];
/// anything else is loaded through fastembed.
pub fn load_provider(config: &VectorDbConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let name = config.embedding_model.as_str();

    if let Some(embedder) = HashingEmbedder::from_model_name(name)? {
        log::info!(
            "Using hashing embedder ({}d, offline)",
            embedder.dimension()
        );
        return Ok(Arc::new(embedder));
    }

    let cache_dir = find_model_cache_dir(config.model_cache_dir.as_deref());
    let provider = FastEmbedProvider::new(name, &cache_dir)?;
    Ok(Arc::new(provider))
}
