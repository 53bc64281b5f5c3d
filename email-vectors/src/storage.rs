//! RocksDB storage with HNSW indexing
//!
//! Persistent collections of embedded documents using RocksDB with LZ4
//! compression. Each collection keeps an in-memory instant-distance HNSW index
//! for nearest-neighbour queries; it is rebuilt from disk when a collection is
//! first opened.
//!
//! Key layout (values are bincode):
//! - `collection:{name}` -> collection name and metadata
//! - `item:{name}:{id}` -> [`StoredItem`]

use dashmap::DashMap;
use instant_distance::{Builder, HnswMap, Point, Search};
use parking_lot::RwLock;
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Result, VectorDbError};
use crate::record::{Metadata, StoredItem};

const COLLECTION_PREFIX: &str = "collection:";
const ITEM_PREFIX: &str = "item:";

/// Search beam width
///
/// Collections larger than this answer queries with `limit <= HNSW_EF_SEARCH`
/// from the approximate HNSW index; larger limits and smaller collections use
/// an exact scan. The two paths can rank near-ties differently.
const HNSW_EF_SEARCH: usize = 100;
const HNSW_EF_CONSTRUCTION: usize = 100;

/// HNSW point wrapper
#[derive(Clone)]
struct EmbeddingPoint {
    vector: Vec<f32>,
}

impl Point for EmbeddingPoint {
    fn distance(&self, other: &Self) -> f32 {
        cosine_distance(&self.vector, &other.vector)
    }
}

/// In-memory view of one collection's embeddings
#[derive(Default)]
struct CollectionIndex {
    ids: Vec<String>,
    points: Vec<EmbeddingPoint>,
    known: HashSet<String>,
    hnsw: Option<HnswMap<EmbeddingPoint, String>>,
    dimension: Option<usize>,
    /// Set once the collection is deleted so stale handles stop working
    dropped: bool,
}

impl CollectionIndex {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn push(&mut self, id: String, vector: Vec<f32>) {
        if self.dimension.is_none() {
            self.dimension = Some(vector.len());
        }
        self.known.insert(id.clone());
        self.ids.push(id);
        self.points.push(EmbeddingPoint { vector });
    }

    /// Rebuild HNSW index
    ///
    /// Collections that fit in one search beam are scanned exactly instead.
    fn rebuild(&mut self) {
        if self.points.len() <= HNSW_EF_SEARCH {
            self.hnsw = None;
            return;
        }

        let hnsw = Builder::default()
            .ef_construction(HNSW_EF_CONSTRUCTION)
            .ef_search(HNSW_EF_SEARCH)
            .build(self.points.clone(), self.ids.clone());

        self.hnsw = Some(hnsw);
    }

    fn drop_all(&mut self) {
        *self = Self {
            dropped: true,
            ..Self::default()
        };
    }

    /// Closest ids to `query`, ascending by distance
    fn nearest(&self, query: &[f32], limit: usize) -> Vec<(String, f32)> {
        match &self.hnsw {
            Some(hnsw) if limit <= HNSW_EF_SEARCH => {
                let query_point = EmbeddingPoint {
                    vector: query.to_vec(),
                };
                let mut search = Search::default();
                hnsw.search(&query_point, &mut search)
                    .take(limit)
                    .map(|item| (item.value.clone(), item.distance))
                    .collect()
            }
            _ => self.linear_search(query, limit),
        }
    }

    /// Exact scan fallback
    fn linear_search(&self, query: &[f32], limit: usize) -> Vec<(String, f32)> {
        let mut results: Vec<(String, f32)> = self
            .ids
            .iter()
            .zip(&self.points)
            .map(|(id, point)| (id.clone(), cosine_distance(query, &point.vector)))
            .collect();

        results.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);
        results
    }
}

/// Persisted description of a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionRecord {
    name: String,
    metadata: Metadata,
}

/// One nearest-neighbour match from [`Collection::query`]
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMatch {
    pub id: String,
    pub document: String,
    pub metadata: Metadata,
    pub distance: f32,
}

/// RocksDB-backed vector database holding named collections
pub struct VectorDatabase {
    db: Arc<DB>,
    path: PathBuf,
    indexes: DashMap<String, Arc<RwLock<CollectionIndex>>>,
}

impl VectorDatabase {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_max_background_jobs(2);
        opts.set_bytes_per_sync(1048576); // 1MB
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&opts, path)?;

        log::info!("VectorDatabase opened at: {}", path.display());

        Ok(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
            indexes: DashMap::new(),
        })
    }

    /// Directory the database lives in
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open an existing collection
    pub fn get_collection(&self, name: &str) -> Result<Collection> {
        let record = self
            .read_record(name)?
            .ok_or_else(|| VectorDbError::CollectionNotFound(name.to_string()))?;

        let cached = self.indexes.get(name).map(|entry| Arc::clone(entry.value()));
        let index = match cached {
            Some(index) => index,
            None => {
                let loaded = Arc::new(RwLock::new(self.load_index(name)?));
                self.indexes
                    .entry(name.to_string())
                    .or_insert(loaded)
                    .value()
                    .clone()
            }
        };

        Ok(Collection {
            name: record.name,
            metadata: record.metadata,
            db: Arc::clone(&self.db),
            index,
        })
    }

    /// Create a new, empty collection
    pub fn create_collection(&self, name: &str, metadata: Metadata) -> Result<Collection> {
        validate_collection_name(name)?;

        if self.read_record(name)?.is_some() {
            return Err(VectorDbError::CollectionExists(name.to_string()));
        }

        let record = CollectionRecord {
            name: name.to_string(),
            metadata,
        };
        self.db
            .put(collection_key(name).as_bytes(), bincode::serialize(&record)?)?;
        self.db.flush()?;

        let index = Arc::new(RwLock::new(CollectionIndex::default()));
        if let Some(stale) = self.indexes.insert(name.to_string(), Arc::clone(&index)) {
            stale.write().drop_all();
        }

        log::debug!("Created collection {}", name);

        Ok(Collection {
            name: record.name,
            metadata: record.metadata,
            db: Arc::clone(&self.db),
            index,
        })
    }

    /// Open `name`, creating it with `metadata` if absent
    ///
    /// The flag is true when the collection was created.
    pub fn get_or_create_collection(
        &self,
        name: &str,
        metadata: Metadata,
    ) -> Result<(Collection, bool)> {
        match self.get_collection(name) {
            Ok(collection) => Ok((collection, false)),
            Err(VectorDbError::CollectionNotFound(_)) => {
                Ok((self.create_collection(name, metadata)?, true))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a collection and every item in it
    pub fn delete_collection(&self, name: &str) -> Result<()> {
        if self.read_record(name)?.is_none() {
            return Err(VectorDbError::CollectionNotFound(name.to_string()));
        }

        let mut batch = WriteBatch::default();
        batch.delete(collection_key(name).as_bytes());

        let mut removed = 0;
        for key in self.keys_with_prefix(&item_prefix(name))? {
            batch.delete(&key);
            removed += 1;
        }

        self.db.write(batch)?;
        self.db.flush()?;

        if let Some((_, index)) = self.indexes.remove(name) {
            index.write().drop_all();
        }

        log::info!("Deleted collection {} ({} items)", name, removed);
        Ok(())
    }

    /// Names of all collections
    pub fn list_collections(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for key in self.keys_with_prefix(COLLECTION_PREFIX)? {
            let key = String::from_utf8_lossy(&key);
            if let Some(name) = key.strip_prefix(COLLECTION_PREFIX) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Wipe every collection and item
    pub fn reset(&self) -> Result<()> {
        let mut batch = WriteBatch::default();
        let mut count = 0;

        for item in self.db.iterator(IteratorMode::Start) {
            let (key, _) = item?;
            batch.delete(&key);
            count += 1;
        }

        self.db.write(batch)?;
        self.db.flush()?;

        for entry in self.indexes.iter() {
            entry.value().write().drop_all();
        }
        self.indexes.clear();

        log::warn!("Reset vector database at {} ({} keys)", self.path.display(), count);
        Ok(())
    }

    fn read_record(&self, name: &str) -> Result<Option<CollectionRecord>> {
        match self.db.get(collection_key(name).as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<Box<[u8]>>> {
        let mut keys = Vec::new();
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward));

        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            keys.push(key);
        }
        Ok(keys)
    }

    /// Load a collection's items from disk into a fresh index
    fn load_index(&self, name: &str) -> Result<CollectionIndex> {
        let prefix = item_prefix(name);
        let mut index = CollectionIndex::default();
        let mut skipped = 0;

        let iter = self
            .db
            .iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward));

        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }

            // Gracefully handle deserialization errors
            match bincode::deserialize::<StoredItem>(&value) {
                Ok(stored) => {
                    if index.dimension.is_some_and(|d| d != stored.embedding.len()) {
                        log::warn!(
                            "Item {} has dimension {}, expected {:?}. Skipping.",
                            stored.id,
                            stored.embedding.len(),
                            index.dimension
                        );
                        skipped += 1;
                        continue;
                    }
                    index.push(stored.id, stored.embedding);
                }
                Err(e) => {
                    log::warn!(
                        "Failed to deserialize item {}: {}. Skipping.",
                        String::from_utf8_lossy(&key),
                        e
                    );
                    skipped += 1;
                }
            }
        }

        if index.len() > 0 {
            log::info!("Loaded {} items from collection {}", index.len(), name);
            index.rebuild();
        }
        if skipped > 0 {
            log::warn!("Skipped {} unreadable items in {}", skipped, name);
        }

        Ok(index)
    }
}

/// Handle onto one collection
///
/// Handles for the same collection share one index. Once the collection is
/// deleted or the database reset, every operation on an old handle fails
/// with [`VectorDbError::CollectionNotFound`].
#[derive(Clone)]
pub struct Collection {
    name: String,
    metadata: Metadata,
    db: Arc<DB>,
    index: Arc<RwLock<CollectionIndex>>,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Number of stored items (0 for a dropped handle)
    pub fn count(&self) -> usize {
        self.index.read().len()
    }

    /// Store a batch of items
    ///
    /// The batch is written atomically: if any item is rejected, or the write
    /// fails, nothing is stored.
    pub fn add(
        &self,
        ids: &[String],
        embeddings: &[Vec<f32>],
        documents: &[String],
        metadatas: &[Metadata],
    ) -> Result<()> {
        let len = ids.len();
        if embeddings.len() != len || documents.len() != len || metadatas.len() != len {
            return Err(VectorDbError::invalid_argument(format!(
                "Batch length mismatch: {} ids, {} embeddings, {} documents, {} metadatas",
                len,
                embeddings.len(),
                documents.len(),
                metadatas.len()
            )));
        }
        if len == 0 {
            return Ok(());
        }

        let mut index = self.index.write();
        if index.dropped {
            return Err(VectorDbError::CollectionNotFound(self.name.clone()));
        }

        let expected = index.dimension.unwrap_or(embeddings[0].len());
        if expected == 0 {
            return Err(VectorDbError::invalid_argument("Empty embedding"));
        }

        let mut batch_ids = HashSet::with_capacity(len);
        for (id, embedding) in ids.iter().zip(embeddings) {
            if embedding.len() != expected {
                return Err(VectorDbError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
            if index.known.contains(id) || !batch_ids.insert(id.as_str()) {
                return Err(VectorDbError::DuplicateId(id.clone()));
            }
        }

        let mut batch = WriteBatch::default();
        for i in 0..len {
            let item = StoredItem {
                id: ids[i].clone(),
                embedding: embeddings[i].clone(),
                document: documents[i].clone(),
                metadata: metadatas[i].clone(),
            };
            batch.put(
                item_key(&self.name, &item.id).as_bytes(),
                bincode::serialize(&item)?,
            );
        }
        self.db.write(batch)?;
        self.db.flush()?;

        for (id, embedding) in ids.iter().zip(embeddings) {
            index.push(id.clone(), embedding.clone());
        }
        index.rebuild();

        log::debug!("Added {} items to {}", len, self.name);
        Ok(())
    }

    /// The `n_results` items closest to `embedding`, ascending by distance
    pub fn query(&self, embedding: &[f32], n_results: usize) -> Result<Vec<QueryMatch>> {
        if n_results == 0 {
            return Err(VectorDbError::invalid_argument(
                "n_results must be at least 1",
            ));
        }

        let index = self.index.read();
        if index.dropped {
            return Err(VectorDbError::CollectionNotFound(self.name.clone()));
        }
        if index.len() == 0 {
            return Ok(vec![]);
        }
        if let Some(expected) = index.dimension {
            if embedding.len() != expected {
                return Err(VectorDbError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        let nearest = index.nearest(embedding, n_results);
        drop(index);

        let mut matches = Vec::with_capacity(nearest.len());
        for (id, distance) in nearest {
            match self.db.get(item_key(&self.name, &id).as_bytes())? {
                Some(bytes) => {
                    let item: StoredItem = bincode::deserialize(&bytes)?;
                    matches.push(QueryMatch {
                        id: item.id,
                        document: item.document,
                        metadata: item.metadata,
                        distance,
                    });
                }
                None => log::warn!("Indexed item {} missing from storage", id),
            }
        }

        Ok(matches)
    }
}

/// Check a collection name: 3-63 chars of `[A-Za-z0-9._-]`, alphanumeric at
/// both ends
pub fn validate_collection_name(name: &str) -> Result<()> {
    let valid_len = (3..=63).contains(&name.len());
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    let valid_ends = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
        && name
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphanumeric());

    if valid_len && valid_chars && valid_ends {
        Ok(())
    } else {
        Err(VectorDbError::InvalidCollectionName(name.to_string()))
    }
}

fn collection_key(name: &str) -> String {
    format!("{}{}", COLLECTION_PREFIX, name)
}

fn item_prefix(name: &str) -> String {
    format!("{}{}:", ITEM_PREFIX, name)
}

fn item_key(name: &str, id: &str) -> String {
    format!("{}{}", item_prefix(name), id)
}

/// Cosine distance = 1 - similarity (HNSW finds minimum)
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Calculate cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn meta(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn seeded(db: &VectorDatabase) -> Collection {
        let collection = db.create_collection("emails", Metadata::new()).unwrap();
        collection
            .add(
                &ids(&["a", "b", "c"]),
                &[
                    vec![1.0, 0.0, 0.0],
                    vec![0.0, 1.0, 0.0],
                    vec![0.7, 0.7, 0.0],
                ],
                &ids(&["doc a", "doc b", "doc c"]),
                &[
                    meta(&[("subject", "A")]),
                    meta(&[("subject", "B")]),
                    meta(&[("subject", "C")]),
                ],
            )
            .unwrap();
        collection
    }

    #[test]
    fn test_cosine_distance_identical() {
        let a = vec![1.0, 0.0, 0.0];
        assert!(cosine_distance(&a, &a).abs() < 0.001);
    }

    #[test]
    fn test_cosine_distance_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_distance_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert!((cosine_distance(&a, &b) - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_collection_name_validation() {
        for ok in ["email_collection", "abc", "inbox-2024.v1"] {
            assert!(validate_collection_name(ok).is_ok(), "{}", ok);
        }
        for bad in ["", "ab", "_leading", "trailing-", "has:colon", "has space"] {
            assert!(validate_collection_name(bad).is_err(), "{}", bad);
        }
        assert!(validate_collection_name(&"x".repeat(64)).is_err());
    }

    #[test]
    fn test_get_or_create() {
        let dir = TempDir::new().unwrap();
        let db = VectorDatabase::open(dir.path()).unwrap();

        let (first, created) = db
            .get_or_create_collection("emails", meta(&[("description", "d")]))
            .unwrap();
        assert!(created);
        assert_eq!(first.metadata()["description"], "d");

        let (second, created) = db
            .get_or_create_collection("emails", Metadata::new())
            .unwrap();
        assert!(!created);
        assert_eq!(second.metadata()["description"], "d");
        assert_eq!(db.list_collections().unwrap(), vec!["emails".to_string()]);
    }

    #[test]
    fn test_create_existing_and_get_missing() {
        let dir = TempDir::new().unwrap();
        let db = VectorDatabase::open(dir.path()).unwrap();
        db.create_collection("emails", Metadata::new()).unwrap();

        assert!(matches!(
            db.create_collection("emails", Metadata::new()),
            Err(VectorDbError::CollectionExists(_))
        ));
        assert!(matches!(
            db.get_collection("missing"),
            Err(VectorDbError::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_query_orders_by_distance() {
        let dir = TempDir::new().unwrap();
        let db = VectorDatabase::open(dir.path()).unwrap();
        let collection = seeded(&db);
        assert_eq!(collection.count(), 3);

        let matches = collection.query(&[1.0, 0.1, 0.0], 3).unwrap();
        let order: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
        assert!(matches.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(matches[0].document, "doc a");
        assert_eq!(matches[0].metadata["subject"], "A");
    }

    #[test]
    fn test_query_limit_and_empty() {
        let dir = TempDir::new().unwrap();
        let db = VectorDatabase::open(dir.path()).unwrap();
        let empty = db.create_collection("empty", Metadata::new()).unwrap();
        assert!(empty.query(&[1.0, 0.0], 5).unwrap().is_empty());

        let collection = seeded(&db);
        assert_eq!(collection.query(&[0.0, 1.0, 0.0], 1).unwrap().len(), 1);
        assert_eq!(collection.query(&[0.0, 1.0, 0.0], 500).unwrap().len(), 3);
        assert!(collection.query(&[0.0, 1.0, 0.0], 0).is_err());
    }

    #[test]
    fn test_rejected_batches_store_nothing() {
        let dir = TempDir::new().unwrap();
        let db = VectorDatabase::open(dir.path()).unwrap();
        let collection = seeded(&db);

        let mismatch = collection.add(
            &ids(&["d", "e"]),
            &[vec![1.0, 0.0, 0.0], vec![1.0, 0.0]],
            &ids(&["d", "e"]),
            &[Metadata::new(), Metadata::new()],
        );
        assert!(matches!(
            mismatch,
            Err(VectorDbError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));

        let duplicate = collection.add(
            &ids(&["f", "a"]),
            &[vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]],
            &ids(&["f", "a"]),
            &[Metadata::new(), Metadata::new()],
        );
        assert!(matches!(duplicate, Err(VectorDbError::DuplicateId(id)) if id == "a"));

        let lengths = collection.add(&ids(&["g"]), &[], &[], &[]);
        assert!(matches!(lengths, Err(VectorDbError::InvalidArgument(_))));

        assert_eq!(collection.count(), 3);
        drop(collection);
        drop(db);

        let reopened = VectorDatabase::open(dir.path()).unwrap();
        assert_eq!(reopened.get_collection("emails").unwrap().count(), 3);
    }

    #[test]
    fn test_items_persist_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let db = VectorDatabase::open(dir.path()).unwrap();
            seeded(&db);
        }

        let db = VectorDatabase::open(dir.path()).unwrap();
        let collection = db.get_collection("emails").unwrap();
        assert_eq!(collection.count(), 3);
        let top = collection.query(&[0.0, 1.0, 0.0], 1).unwrap();
        assert_eq!(top[0].id, "b");
    }

    #[test]
    fn test_delete_collection_invalidates_handles() {
        let dir = TempDir::new().unwrap();
        let db = VectorDatabase::open(dir.path()).unwrap();
        let stale = seeded(&db);
        let other = db.create_collection("archive", Metadata::new()).unwrap();
        other
            .add(
                &ids(&["z"]),
                &[vec![0.0, 0.0, 1.0]],
                &ids(&["doc z"]),
                &[Metadata::new()],
            )
            .unwrap();

        db.delete_collection("emails").unwrap();

        assert_eq!(stale.count(), 0);
        assert!(matches!(
            stale.query(&[1.0, 0.0, 0.0], 1),
            Err(VectorDbError::CollectionNotFound(_))
        ));
        assert!(db.get_collection("emails").is_err());
        assert_eq!(db.get_collection("archive").unwrap().count(), 1);

        let recreated = db.create_collection("emails", Metadata::new()).unwrap();
        assert_eq!(recreated.count(), 0);
    }

    #[test]
    fn test_large_collection_uses_hnsw() {
        let dir = TempDir::new().unwrap();
        let db = VectorDatabase::open(dir.path()).unwrap();
        let collection = db.create_collection("bulk", Metadata::new()).unwrap();

        let n = HNSW_EF_SEARCH + 50;
        let vectors: Vec<Vec<f32>> = (0..n)
            .map(|i| {
                let angle = i as f32 * 0.37;
                vec![angle.cos(), angle.sin(), (i % 7) as f32 * 0.1, 1.0]
            })
            .collect();
        let item_ids: Vec<String> = (0..n).map(|i| format!("item-{}", i)).collect();
        let documents: Vec<String> = (0..n).map(|i| format!("document {}", i)).collect();
        collection
            .add(&item_ids, &vectors, &documents, &vec![Metadata::new(); n])
            .unwrap();

        assert!(collection.index.read().hnsw.is_some());

        let matches = collection.query(&vectors[42], 5).unwrap();
        assert_eq!(matches.len(), 5);
        assert_eq!(matches[0].id, "item-42");
        assert!(matches[0].distance.abs() < 1e-4);
        assert!(matches.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_reset_wipes_everything() {
        let dir = TempDir::new().unwrap();
        let db = VectorDatabase::open(dir.path()).unwrap();
        let collection = seeded(&db);

        db.reset().unwrap();

        assert!(db.list_collections().unwrap().is_empty());
        assert_eq!(collection.count(), 0);
        assert!(db.get_collection("emails").is_err());
    }
}
