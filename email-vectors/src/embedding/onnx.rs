//! fastembed sentence embeddings
//!
//! Runs ONNX sentence-transformer models locally. Weights are downloaded into
//! the model cache directory on first use.

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::Path;

use super::provider::EmbeddingProvider;
use crate::error::{Result, VectorDbError};

/// Map a model identifier to a fastembed model
///
/// Accepts bare names (`all-MiniLM-L6-v2`) and hub-style names
/// (`sentence-transformers/all-MiniLM-L6-v2`), case-insensitively.
pub fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    let bare = name.rsplit('/').next().unwrap_or(name).to_lowercase();

    match bare.as_str() {
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        _ => Err(VectorDbError::model(format!(
            "Unsupported embedding model: {}",
            name
        ))),
    }
}

/// Sentence-embedding model backed by fastembed
pub struct FastEmbedProvider {
    model: TextEmbedding,
    name: String,
    dimension: usize,
}

impl FastEmbedProvider {
    /// Load `model_name`, caching weights under `cache_dir`
    pub fn new(model_name: &str, cache_dir: &Path) -> Result<Self> {
        let model_id = resolve_model(model_name)?;

        log::info!(
            "Loading embedding model {} (cache: {})",
            model_name,
            cache_dir.display()
        );

        let options = InitOptions::new(model_id)
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(false);

        let model = TextEmbedding::try_new(options)
            .map_err(|e| VectorDbError::model(format!("Failed to load {}: {}", model_name, e)))?;

        // Get dimension by encoding test string
        let probe = model
            .embed(vec!["test"], None)
            .map_err(|e| VectorDbError::model(format!("Failed to encode test string: {}", e)))?;
        let dimension = probe.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(VectorDbError::model(format!(
                "{} produced an empty embedding",
                model_name
            )));
        }

        log::info!("Embedding model ready ({}d)", dimension);

        Ok(Self {
            model,
            name: model_name.to_string(),
            dimension,
        })
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let embeddings = self
            .model
            .embed(texts.to_vec(), None)
            .map_err(|e| VectorDbError::embedding(format!("Failed to encode texts: {}", e)))?;

        if embeddings.len() != texts.len() {
            return Err(VectorDbError::embedding(format!(
                "Model returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        Ok(embeddings)
    }
}
