//! Consistency checks over a finished catalog.
//!
//! Items are read as loose JSON so that malformed values are reported
//! instead of failing deserialization.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::dedup::normalize_name;
use crate::error::HistaliError;
use crate::model::{Category, Flag, HistamineLevel};

/// Names in messages are cut to this many characters.
const NAME_WIDTH: usize = 30;

/// Default minimum item count for a complete catalog.
pub const DEFAULT_MIN_ITEMS: usize = 400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingName { id: String },
    InvalidLevel { id: String, name: String, level: String },
    InvalidCategory { id: String, name: String, category: String },
    UnknownFlag { id: String, name: String, flag: String },
    DuplicateName { name: String },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingName { id } => write!(f, "Item {id}: missing name"),
            Issue::InvalidLevel { id, name, level } => {
                write!(f, "Item {id} ({name}): invalid histamine level '{level}'")
            }
            Issue::InvalidCategory { id, name, category } => {
                write!(f, "Item {id} ({name}): invalid category '{category}'")
            }
            Issue::UnknownFlag { id, name, flag } => {
                write!(f, "Item {id} ({name}): unknown flag '{flag}'")
            }
            Issue::DuplicateName { name } => write!(f, "Potential duplicate: '{name}'"),
        }
    }
}

/// Value counts, most frequent first; ties keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution(pub Vec<(String, usize)>);

impl Distribution {
    fn from_values<I: IntoIterator<Item = String>>(values: I) -> Self {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for value in values {
            match index.get(&value) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(value.clone(), counts.len());
                    counts.push((value, 1));
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Distribution(counts)
    }

    pub fn get(&self, value: &str) -> usize {
        self.0
            .iter()
            .find(|(v, _)| v == value)
            .map_or(0, |(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(v, c)| (v.as_str(), *c))
    }
}

/// `count` as a percentage of `total`; zero when `total` is zero.
pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub total: usize,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    /// Normalized names that occur more than once.
    pub duplicates: Vec<String>,
    pub levels: Distribution,
    pub flags: Distribution,
    pub categories: Distribution,
}

impl ValidationReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn meets_minimum(&self, min_items: usize) -> bool {
        self.total >= min_items
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "null".to_string(),
    }
}

fn truncate(name: &str) -> String {
    name.chars().take(NAME_WIDTH).collect()
}

fn is_known<T>(value: Option<&Value>, all: &[T], as_str: fn(&T) -> &'static str) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| all.iter().any(|v| as_str(v) == s))
}

/// Check every item of `foods`.
pub fn validate_foods(foods: &[Value]) -> ValidationReport {
    let mut report = ValidationReport {
        total: foods.len(),
        ..ValidationReport::default()
    };

    for item in foods {
        let id = match item.get("id") {
            Some(Value::Null) | None => "?".to_string(),
            Some(v) => display_value(Some(v)),
        };
        let raw_name = item.get("name").and_then(Value::as_str).unwrap_or("");
        let name = truncate(raw_name);

        if raw_name.is_empty() {
            report.errors.push(Issue::MissingName { id: id.clone() });
        }

        let level = item.get("histamineLevel");
        if !is_known(level, &HistamineLevel::ALL, HistamineLevel::as_str) {
            report.errors.push(Issue::InvalidLevel {
                id: id.clone(),
                name: name.clone(),
                level: display_value(level),
            });
        }

        let category = item.get("category");
        if !is_known(category, &Category::ALL, Category::as_str) {
            report.errors.push(Issue::InvalidCategory {
                id: id.clone(),
                name: name.clone(),
                category: display_value(category),
            });
        }

        for flag in flags_of(item) {
            if !is_known(Some(flag), &Flag::ALL, Flag::as_str) {
                report.warnings.push(Issue::UnknownFlag {
                    id: id.clone(),
                    name: name.clone(),
                    flag: display_value(Some(flag)),
                });
            }
        }
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for item in foods {
        let key = normalize_name(item.get("name").and_then(Value::as_str).unwrap_or(""));
        if key.is_empty() {
            continue;
        }
        if !seen.insert(key.clone()) && reported.insert(key.clone()) {
            report.warnings.push(Issue::DuplicateName { name: key.clone() });
            report.duplicates.push(key);
        }
    }

    report.levels = Distribution::from_values(
        foods
            .iter()
            .map(|item| display_value(item.get("histamineLevel"))),
    );
    report.flags = Distribution::from_values(
        foods
            .iter()
            .flat_map(flags_of)
            .map(|flag| display_value(Some(flag))),
    );
    report.categories =
        Distribution::from_values(foods.iter().map(|item| display_value(item.get("category"))));

    #[cfg(feature = "tracing")]
    tracing::debug!(
        total = report.total,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated catalog"
    );

    report
}

fn flags_of(item: &Value) -> impl Iterator<Item = &Value> {
    item.get("flags")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Check the `foods` array of a catalog document; a missing array is empty.
pub fn validate_catalog(catalog: &Value) -> ValidationReport {
    let foods = catalog
        .get("foods")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    validate_foods(foods)
}

/// Read and check a catalog file.
pub fn validate_file(path: &Path) -> Result<ValidationReport, HistaliError> {
    if !path.exists() {
        return Err(HistaliError::InputNotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| HistaliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog: Value = serde_json::from_str(&text).map_err(|source| HistaliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(validate_catalog(&catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good_foods() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "losos", "histamineLevel": "POORLY_TOLERATED",
                   "category": "ANIMAL_PRODUCTS", "flags": ["HIGH_HISTAMINE"]}),
            json!({"id": 2, "name": "ryža", "histamineLevel": "WELL_TOLERATED",
                   "category": "PLANT_PRODUCTS", "flags": []}),
            json!({"id": 3, "name": "jahody", "histamineLevel": "POORLY_TOLERATED",
                   "category": "PLANT_PRODUCTS", "flags": ["HISTAMINE_LIBERATOR"]}),
        ]
    }

    #[test]
    fn test_clean_catalog_succeeds() {
        let report = validate_foods(&good_foods());
        assert!(report.is_success());
        assert!(report.warnings.is_empty());
        assert_eq!(report.total, 3);
        assert_eq!(report.levels.0[0], ("POORLY_TOLERATED".to_string(), 2));
        assert_eq!(report.categories.get("PLANT_PRODUCTS"), 2);
        assert_eq!(report.flags.get("HIGH_HISTAMINE"), 1);
    }

    #[test]
    fn test_bogus_level_is_an_error() {
        let mut foods = good_foods();
        foods[1]["histamineLevel"] = json!("BOGUS");
        let report = validate_foods(&foods);
        assert!(!report.is_success());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0].to_string(),
            "Item 2 (ryža): invalid histamine level 'BOGUS'"
        );
    }

    #[test]
    fn test_unknown_flag_is_only_a_warning() {
        let before = validate_foods(&good_foods());
        let mut foods = good_foods();
        foods[0]["flags"] = json!(["HIGH_HISTAMINE", "SPICY"]);
        let after = validate_foods(&foods);
        assert_eq!(after.warnings.len(), before.warnings.len() + 1);
        assert_eq!(after.is_success(), before.is_success());
    }

    #[test]
    fn test_missing_fields() {
        let foods = vec![json!({"flags": []})];
        let report = validate_foods(&foods);
        assert_eq!(
            report.errors,
            vec![
                Issue::MissingName { id: "?".into() },
                Issue::InvalidLevel { id: "?".into(), name: String::new(), level: "null".into() },
                Issue::InvalidCategory { id: "?".into(), name: String::new(), category: "null".into() },
            ]
        );
    }

    #[test]
    fn test_one_warning_per_duplicated_name() {
        let mut foods = good_foods();
        foods.push(json!({"id": 4, "name": "Losos ", "histamineLevel": "POORLY_TOLERATED", "category": "ANIMAL_PRODUCTS"}));
        foods.push(json!({"id": 5, "name": "LOSOS", "histamineLevel": "POORLY_TOLERATED", "category": "ANIMAL_PRODUCTS"}));
        let report = validate_foods(&foods);
        assert_eq!(report.duplicates, vec!["losos".to_string()]);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.is_success());
    }

    #[test]
    fn test_long_names_truncated() {
        let foods = vec![json!({"id": 7, "name": "a".repeat(40), "histamineLevel": "X", "category": "BEVERAGES"})];
        let report = validate_foods(&foods);
        assert_eq!(
            report.errors[0],
            Issue::InvalidLevel { id: "7".into(), name: "a".repeat(30), level: "X".into() }
        );
    }

    #[test]
    fn test_empty_catalog() {
        let report = validate_catalog(&json!({"foods": []}));
        assert!(report.is_success());
        assert_eq!(report.total, 0);
        assert!(!report.meets_minimum(DEFAULT_MIN_ITEMS));
        assert_eq!(percent(0, report.total), 0.0);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
    }
}
