//! Merge per-chunk JSON fragments into one catalog.
//!
//! Each chunk is `{"items": [...]}`. Items are kept as raw JSON objects so
//! that fields this crate does not model survive the merge unchanged.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{Catalog, Metadata};
use crate::dedup::{dedup_by_name, Named};
use crate::error::HistaliError;
use crate::tables::Tables;

const CHUNK_PREFIX: &str = "chunk-";
const CHUNK_SUFFIX: &str = ".json";

/// One item of a chunk, as found on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkItem(pub Map<String, Value>);

impl ChunkItem {
    pub fn category(&self) -> Option<&str> {
        self.0.get("category").and_then(Value::as_str)
    }
}

impl Named for ChunkItem {
    /// Missing or non-string names compare as empty.
    fn name(&self) -> &str {
        self.0.get("name").and_then(Value::as_str).unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
struct Chunk {
    #[serde(default)]
    items: Vec<ChunkItem>,
}

/// Counts gathered while merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Items read from each chunk file, in merge order.
    pub chunks: Vec<(PathBuf, usize)>,
    pub total_before_dedup: usize,
    pub duplicates: Vec<String>,
    /// Items per category after dedup; `UNKNOWN` for items without one.
    pub categories: BTreeMap<String, usize>,
}

impl MergeReport {
    pub fn unique(&self) -> usize {
        self.categories.values().sum()
    }
}

/// `chunk-*.json` files directly inside `dir`, ordered by file name.
pub fn discover_chunks(dir: &Path) -> Result<Vec<PathBuf>, HistaliError> {
    if !dir.is_dir() {
        return Err(HistaliError::InputNotFound(dir.to_path_buf()));
    }
    let read_err = |source: std::io::Error| HistaliError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        let is_chunk = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(CHUNK_PREFIX) && n.ends_with(CHUNK_SUFFIX));
        if is_chunk && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Items of one chunk file; a chunk without `items` is empty.
pub fn load_chunk(path: &Path) -> Result<Vec<ChunkItem>, HistaliError> {
    let text = fs::read_to_string(path).map_err(|source| HistaliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let chunk: Chunk = serde_json::from_str(&text).map_err(|source| HistaliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(chunk.items)
}

/// Deduplicate `items`, number them 1..N and wrap them with enums and metadata.
pub fn merge_items(
    items: Vec<ChunkItem>,
    tables: &Tables,
    report: &mut MergeReport,
) -> Catalog<ChunkItem> {
    report.total_before_dedup = items.len();
    let dedup = dedup_by_name(items);
    report.duplicates = dedup.duplicates;

    let mut foods = dedup.unique;
    for (i, item) in foods.iter_mut().enumerate() {
        item.0.insert("id".to_string(), Value::from(i + 1));
        let category = item.category().unwrap_or("UNKNOWN").to_string();
        *report.categories.entry(category).or_insert(0) += 1;
    }

    let metadata = Metadata::from_tables(tables, foods.len());
    Catalog::new(foods, tables).with_metadata(metadata)
}

/// Load every chunk in `dir` and merge them.
pub fn merge_chunks(
    dir: &Path,
    tables: &Tables,
) -> Result<(Catalog<ChunkItem>, MergeReport), HistaliError> {
    let mut report = MergeReport::default();
    let mut items = Vec::new();

    for path in discover_chunks(dir)? {
        let chunk = load_chunk(&path)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), items = chunk.len(), "loaded chunk");

        report.chunks.push((path, chunk.len()));
        items.extend(chunk);
    }

    let catalog = merge_items(items, tables, &mut report);
    Ok((catalog, report))
}
