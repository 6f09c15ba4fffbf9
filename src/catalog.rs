//! The output document: numbered foods plus the enumerations they use.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::HistaliError;
use crate::model::FoodRecord;
use crate::tables::Tables;

/// The `enums` block: every enumeration value with its display data, keyed by id
/// in table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enums {
    pub category: Map<String, Value>,
    /// `{label, category}`; `category` is omitted for shared subcategories.
    pub subcategory: Map<String, Value>,
    /// `{value, label, color}` with `value` the code printed in the document.
    pub histamine_level: Map<String, Value>,
    pub flag: Map<String, Value>,
}

impl Enums {
    pub fn from_tables(tables: &Tables) -> Self {
        let category = tables
            .categories
            .iter()
            .map(|c| (c.id.to_string(), Value::from(c.label.as_str())))
            .collect();

        let mut subcategory = Map::new();
        for sub in &tables.subcategories {
            if subcategory.contains_key(&sub.id) {
                continue;
            }
            let mut info = Map::new();
            info.insert("label".to_string(), Value::from(sub.label.as_str()));
            if let Some(owner) = sub.category {
                info.insert("category".to_string(), Value::from(owner.as_str()));
            }
            subcategory.insert(sub.id.clone(), Value::Object(info));
        }

        let histamine_level = tables
            .levels
            .iter()
            .map(|l| {
                let info = json!({ "value": l.code, "label": l.label, "color": l.color });
                (l.level.to_string(), info)
            })
            .collect();

        let flag = tables
            .flags
            .iter()
            .map(|f| (f.flag.to_string(), json!({ "abbr": f.code, "label": f.label })))
            .collect();

        Self {
            category,
            subcategory,
            histamine_level,
            flag,
        }
    }
}

/// Provenance block written by the merge step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub source: String,
    pub language: String,
    pub version: String,
    pub total_items: usize,
}

impl Metadata {
    pub fn from_tables(tables: &Tables, total_items: usize) -> Self {
        Self {
            source: tables.source.clone(),
            language: tables.language.clone(),
            version: tables.version.clone(),
            total_items,
        }
    }
}

/// A record with its 1-based position in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberedFood {
    pub id: usize,
    #[serde(flatten)]
    pub record: FoodRecord,
}

/// `{"foods": [...], "enums": {...}, "metadata": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog<F> {
    pub foods: Vec<F>,
    pub enums: Enums,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl<F> Catalog<F> {
    /// Wrap already-numbered foods with the enums of `tables`.
    pub fn new(foods: Vec<F>, tables: &Tables) -> Self {
        Self {
            foods,
            enums: Enums::from_tables(tables),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl Catalog<NumberedFood> {
    /// Number already-deduplicated records 1..N.
    pub fn from_records(records: Vec<FoodRecord>, tables: &Tables) -> Self {
        let foods = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| NumberedFood { id: i + 1, record })
            .collect();
        Self::new(foods, tables)
    }
}

/// Write `value` as two-space indented UTF-8 JSON, creating parent directories.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), HistaliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| HistaliError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut data = serde_json::to_vec_pretty(value)?;
    data.push(b'\n');
    fs::write(path, data).map_err(|source| HistaliError::Write {
        path: path.to_path_buf(),
        source,
    })
}
