//! Model cache discovery
//!
//! Finds where embedding model weights are (or will be) stored.

use std::path::{Path, PathBuf};

use crate::config::ENV_MODEL_CACHE;

/// Cache directory fastembed uses when nothing else is configured
const FASTEMBED_DEFAULT_CACHE: &str = ".fastembed_cache";

/// Find the model cache directory with priority:
/// 1. Explicitly configured directory
/// 2. EMAIL_VECTORS_MODEL_CACHE environment variable
/// 3. FASTEMBED_CACHE_PATH environment variable
/// 4. User home directory (~/.email-vectors/models)
/// 5. `.fastembed_cache` in the working directory
pub fn find_model_cache_dir(configured: Option<&Path>) -> PathBuf {
    find_with(configured, |key| std::env::var_os(key))
}

fn find_with(
    configured: Option<&Path>,
    env: impl Fn(&str) -> Option<std::ffi::OsString>,
) -> PathBuf {
    // Priority 1: configured
    if let Some(dir) = configured {
        log::debug!("Using configured model cache: {}", dir.display());
        return dir.to_path_buf();
    }

    // Priority 2-3: environment
    for key in [ENV_MODEL_CACHE, "FASTEMBED_CACHE_PATH"] {
        if let Some(value) = env(key).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(value);
            log::info!("Using {}: {}", key, path.display());
            return path;
        }
    }

    // Priority 4: user home directory
    if let Some(home) = env("HOME").or_else(|| env("USERPROFILE")) {
        return PathBuf::from(home).join(".email-vectors").join("models");
    }

    log::warn!(
        "No home directory found, caching models in {}",
        FASTEMBED_DEFAULT_CACHE
    );
    PathBuf::from(FASTEMBED_DEFAULT_CACHE)
}
