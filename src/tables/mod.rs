//! Lookup tables that drive line classification and the `enums` block.
//!
//! Tables are plain data: one TOML document per document edition, bundled
//! into the binary and parsed on request. A custom edition can be loaded
//! from disk with [`Tables::from_file`].

use std::path::Path;

use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::error::HistaliError;
use crate::model::{Category, Flag, HistamineLevel, OTHER_SUBCATEGORY};

/// All bundled tables: (locale, file contents).
const TABLES: &[(&str, &str)] = &[
    ("sk", include_str!("sk.toml")),
    ("en", include_str!("en.toml")),
];

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    pub id: Category,
    /// Case-sensitive substring that identifies the category heading.
    pub marker: String,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubcategoryEntry {
    pub id: String,
    /// Lowercase substrings that identify the subcategory heading.
    pub keys: Vec<String>,
    pub label: String,
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelEntry {
    pub level: HistamineLevel,
    pub code: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlagEntry {
    pub flag: Flag,
    pub code: String,
    pub label: String,
}

/// Immutable lookup data for one edition of the source document.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct Tables {
    pub locale: String,
    pub source: String,
    pub language: String,
    pub version: String,
    #[serde(default)]
    pub skip_markers: Vec<String>,
    pub categories: Vec<CategoryEntry>,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryEntry>,
    pub levels: Vec<LevelEntry>,
    pub flags: Vec<FlagEntry>,
}

impl Tables {
    /// Parse and check a tables document.
    pub fn from_toml_str(contents: &str) -> Result<Self, HistaliError> {
        let mut tables: Tables = toml::from_str(contents)?;
        for sub in &mut tables.subcategories {
            for key in &mut sub.keys {
                *key = key.to_lowercase();
            }
        }
        tables.check()?;
        Ok(tables)
    }

    pub fn from_file(path: &Path) -> Result<Self, HistaliError> {
        let contents = std::fs::read_to_string(path).map_err(|source| HistaliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    fn check(&self) -> Result<(), HistaliError> {
        if self.categories.is_empty() {
            return Err(HistaliError::InvalidTables(
                "at least one category is required".into(),
            ));
        }
        if let Some(c) = self.categories.iter().find(|c| c.marker.trim().is_empty()) {
            return Err(HistaliError::InvalidTables(format!(
                "category {} has an empty marker",
                c.id
            )));
        }
        for (i, level) in self.levels.iter().enumerate() {
            if level.code.is_empty() || level.code.contains(char::is_whitespace) {
                return Err(HistaliError::InvalidTables(format!(
                    "level {} has an invalid code {:?}",
                    level.level, level.code
                )));
            }
            if self.levels[..i].iter().any(|l| l.code == level.code) {
                return Err(HistaliError::InvalidTables(format!(
                    "duplicate level code {:?}",
                    level.code
                )));
            }
        }
        for (i, flag) in self.flags.iter().enumerate() {
            if flag.code.is_empty() || flag.code.contains(char::is_whitespace) {
                return Err(HistaliError::InvalidTables(format!(
                    "flag {} has an invalid code {:?}",
                    flag.flag, flag.code
                )));
            }
            if self.flags[..i].iter().any(|f| f.code == flag.code) {
                return Err(HistaliError::InvalidTables(format!(
                    "duplicate flag code {:?}",
                    flag.code
                )));
            }
        }
        if let Some(sub) = self
            .subcategories
            .iter()
            .find(|s| s.keys.iter().any(|k| k.trim().is_empty()))
        {
            return Err(HistaliError::InvalidTables(format!(
                "subcategory {} has an empty key",
                sub.id
            )));
        }
        Ok(())
    }

    /// The category whose marker opens the data section.
    pub fn start_category(&self) -> &CategoryEntry {
        // `check` guarantees at least one category.
        &self.categories[0]
    }

    /// Category whose marker occurs in `text`. The longest marker wins.
    pub fn category_for(&self, text: &str) -> Option<Category> {
        self.categories
            .iter()
            .filter(|c| text.contains(c.marker.as_str()))
            .max_by_key(|c| c.marker.chars().count())
            .map(|c| c.id)
    }

    /// Subcategory whose key occurs in the lowercased `text`.
    ///
    /// The longest matching key wins; equal lengths fall back to the
    /// lexicographically smaller key, so table order never matters.
    pub fn subcategory_entry_for(&self, text: &str) -> Option<&SubcategoryEntry> {
        let lower = text.to_lowercase();
        let mut best: Option<(&str, &SubcategoryEntry)> = None;
        for sub in &self.subcategories {
            for key in &sub.keys {
                if !lower.contains(key.as_str()) {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((best_key, _)) => {
                        let (len, best_len) = (key.chars().count(), best_key.chars().count());
                        len > best_len || (len == best_len && key.as_str() < best_key)
                    }
                };
                if better {
                    best = Some((key.as_str(), sub));
                }
            }
        }
        best.map(|(_, sub)| sub)
    }

    /// Subcategory id whose key occurs in the lowercased `text`.
    pub fn subcategory_for(&self, text: &str) -> Option<&str> {
        self.subcategory_entry_for(text).map(|sub| sub.id.as_str())
    }

    /// Subcategory in effect right after the `category` heading `text`.
    ///
    /// A heading that also names a subcategory of that category (`Nápoje`)
    /// selects it; otherwise the subcategory falls back to `OTHER`.
    pub fn subcategory_after_category(&self, category: Category, text: &str) -> String {
        self.subcategory_entry_for(text)
            .filter(|sub| sub.category.is_none_or(|owner| owner == category))
            .map_or_else(|| OTHER_SUBCATEGORY.to_string(), |sub| sub.id.clone())
    }

    pub fn level_for_code(&self, code: &str) -> Option<HistamineLevel> {
        self.levels.iter().find(|l| l.code == code).map(|l| l.level)
    }

    pub fn is_level_code(&self, text: &str) -> bool {
        self.level_for_code(text).is_some()
    }

    pub fn flag_for_code(&self, code: &str) -> Option<Flag> {
        self.flags.iter().find(|f| f.code == code).map(|f| f.flag)
    }

    pub fn is_flag_code(&self, text: &str) -> bool {
        self.flag_for_code(text).is_some()
    }

    /// Flags named by the whitespace-separated words of `text`; unknown words are ignored.
    pub fn flags_in<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Flag> + 'a {
        text.split_whitespace()
            .filter_map(|word| self.flag_for_code(word))
    }

    /// `true` if `text` has at least one word and every word is a flag code or `?`.
    pub fn is_flags_only(&self, text: &str) -> bool {
        let mut words = text.split_whitespace().peekable();
        words.peek().is_some() && words.all(|w| w == "?" || self.is_flag_code(w))
    }

    /// `true` if `text` contains a page header, footer, or column heading.
    pub fn is_boilerplate(&self, text: &str) -> bool {
        self.skip_markers.iter().any(|m| text.contains(m.as_str()))
    }
}

/// Build a subcategory identifier from a free-form label.
///
/// Uppercases, strips combining diacritics (NFD), turns spaces into `_` and
/// drops commas: `"Strukoviny a sója"` becomes `"STRUKOVINY_A_SOJA"`.
pub fn derive_subcategory_id(label: &str) -> String {
    label
        .trim()
        .to_uppercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .filter(|c| *c != ',')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Return the bundled tables for a locale (case-insensitive match).
pub fn get_tables(locale: &str) -> Result<Tables, HistaliError> {
    let locale_lower = locale.to_lowercase();
    let (_, contents) = TABLES
        .iter()
        .find(|(name, _)| *name == locale_lower)
        .ok_or_else(|| HistaliError::UnknownLocale(locale.to_string()))?;
    Tables::from_toml_str(contents)
}

/// Return the list of bundled locales.
pub fn available_locales() -> Vec<&'static str> {
    TABLES.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sk() -> Tables {
        get_tables("sk").unwrap()
    }

    #[test]
    fn test_longest_subcategory_key_wins() {
        let tables = sk();
        assert_eq!(tables.subcategory_for("Nápoje"), Some("BEVERAGES"));
        assert_eq!(
            tables.subcategory_for("Kofeínové nápoje"),
            Some("CAFFEINE_DRINKS")
        );
        assert_eq!(
            tables.subcategory_for("Alkoholické nápoje"),
            Some("ALCOHOLIC_BEVERAGES")
        );
    }

    #[test]
    fn test_subcategory_match_ignores_table_order() {
        let mut tables = sk();
        let forward = tables.subcategory_for("Nealko nápoje, limonády").map(str::to_string);
        tables.subcategories.reverse();
        let backward = tables.subcategory_for("Nealko nápoje, limonády").map(str::to_string);
        assert_eq!(forward, backward);
        assert_eq!(forward.as_deref(), Some("SOFT_DRINKS"));
    }

    #[test]
    fn test_subcategory_alternate_spelling() {
        let tables = sk();
        assert_eq!(tables.subcategory_for("Mořské plody"), Some("SEAFOOD"));
        assert_eq!(tables.subcategory_for("MORSKÉ PLODY"), Some("SEAFOOD"));
    }

    #[test]
    fn test_category_marker_is_case_sensitive() {
        let tables = sk();
        assert_eq!(tables.category_for("Nápoje"), Some(Category::Beverages));
        assert_eq!(tables.category_for("Alkoholické nápoje"), None);
        assert_eq!(
            tables.category_for("3 Rastlinné potraviny"),
            Some(Category::PlantProducts)
        );
    }

    #[test]
    fn test_flags_only() {
        let tables = sk();
        assert!(tables.is_flags_only("H"));
        assert!(tables.is_flags_only("H! A"));
        assert!(tables.is_flags_only("?"));
        assert!(tables.is_flags_only("H ? L"));
        assert!(!tables.is_flags_only(""));
        assert!(!tables.is_flags_only("   "));
        assert!(!tables.is_flags_only("h"));
        assert!(!tables.is_flags_only("H avokádo"));
    }

    #[test]
    fn test_flags_in_keeps_order_and_skips_unknown() {
        let tables = sk();
        let flags: Vec<Flag> = tables.flags_in("L x H!").collect();
        assert_eq!(flags, vec![Flag::HistamineLiberator, Flag::FastSpoilage]);
    }

    #[test]
    fn test_derive_subcategory_id() {
        assert_eq!(derive_subcategory_id("Strukoviny a sója"), "STRUKOVINY_A_SOJA");
        assert_eq!(
            derive_subcategory_id("Huby, riasy, mikroorganizmy"),
            "HUBY_RIASY_MIKROORGANIZMY"
        );
    }

    #[test]
    fn test_subcategory_after_category_heading() {
        let tables = sk();
        assert_eq!(
            tables.subcategory_after_category(Category::Beverages, "Nápoje"),
            "BEVERAGES"
        );
        assert_eq!(
            tables.subcategory_after_category(Category::PlantProducts, "Rastlinné potraviny"),
            OTHER_SUBCATEGORY
        );
        // A key owned by another category does not apply.
        assert_eq!(
            tables.subcategory_after_category(Category::FoodAdditives, "Potravinové aditíva, nápoje"),
            OTHER_SUBCATEGORY
        );
    }

    #[test]
    fn test_duplicate_level_code_rejected() {
        let doc = r##"
            locale = "xx"
            source = "s"
            language = "xx"
            version = "1"
            flags = []
            [[categories]]
            id = "ANIMAL_PRODUCTS"
            marker = "Animal"
            label = "Animal"
            [[levels]]
            level = "WELL_TOLERATED"
            code = "0"
            label = "ok"
            color = "#000"
            [[levels]]
            level = "VARIABLE"
            code = "0"
            label = "var"
            color = "#000"
        "##;
        assert!(matches!(
            Tables::from_toml_str(doc),
            Err(HistaliError::InvalidTables(_))
        ));
    }

    #[test]
    fn test_missing_categories_rejected() {
        let doc = r#"
            locale = "xx"
            source = "s"
            language = "xx"
            version = "1"
            categories = []
            levels = []
            flags = []
        "#;
        assert!(matches!(
            Tables::from_toml_str(doc),
            Err(HistaliError::InvalidTables(_))
        ));
    }
}
