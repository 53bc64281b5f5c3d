//! Feature-hashing embedder
//!
//! Deterministic bag-of-words vectors that need no model download. Texts that
//! share words land close together, which is enough for offline use and tests.

use super::provider::EmbeddingProvider;
use crate::error::{Result, VectorDbError};

/// Dimension used by plain `hashing`, same as all-MiniLM-L6-v2
pub const DEFAULT_HASHING_DIMENSION: usize = 384;

const MODEL_PREFIX: &str = "hashing";

/// Signed feature-hashing embedder, L2-normalised
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    name: String,
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            name: format!("{}-{}", MODEL_PREFIX, dimension),
            dimension,
        }
    }

    /// Parse `hashing` or `hashing-<dim>`; `None` for any other model name
    pub fn from_model_name(name: &str) -> Result<Option<Self>> {
        let Some(rest) = name.strip_prefix(MODEL_PREFIX) else {
            return Ok(None);
        };

        if rest.is_empty() {
            return Ok(Some(Self::new(DEFAULT_HASHING_DIMENSION)));
        }

        let dimension = rest
            .strip_prefix('-')
            .and_then(|d| d.parse::<usize>().ok())
            .filter(|d| *d > 0)
            .ok_or_else(|| VectorDbError::model(format!("Invalid hashing model: {}", name)))?;

        Ok(Some(Self::new(dimension)))
    }

    fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];

        for token in Self::tokenize(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSION)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.vectorize(text)).collect())
    }
}

/// 64-bit FNV-1a, stable across builds so stored vectors stay comparable
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_model_name_parsing() {
        assert_eq!(
            HashingEmbedder::from_model_name("hashing")
                .unwrap()
                .unwrap()
                .dimension(),
            DEFAULT_HASHING_DIMENSION
        );
        assert_eq!(
            HashingEmbedder::from_model_name("hashing-32")
                .unwrap()
                .unwrap()
                .dimension(),
            32
        );
        assert!(HashingEmbedder::from_model_name("all-MiniLM-L6-v2")
            .unwrap()
            .is_none());
        assert!(HashingEmbedder::from_model_name("hashing-0").is_err());
        assert!(HashingEmbedder::from_model_name("hashingx").is_err());
    }

    #[test]
    fn test_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(64);
        let a = embedder.embed("Budget review on Monday").unwrap();
        let b = embedder.embed("budget REVIEW on monday!").unwrap();
        assert_eq!(a, b);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_words_are_closer() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed("server outage postmortem").unwrap();
        let related = embedder.embed("postmortem for the server outage").unwrap();
        let unrelated = embedder.embed("lunch menu for friday").unwrap();
        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(8);
        let v = embedder.embed("  ...  ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_batch_preserves_order() {
        let embedder = HashingEmbedder::new(32);
        let batch = embedder.embed_batch(&["alpha", "beta", "gamma"]).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[1], embedder.embed("beta").unwrap());
    }
}
