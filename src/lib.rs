//! Food histamine-compatibility list extraction.
//!
//! `histali` turns the `pdftohtml` rendering of a food compatibility list
//! into a JSON catalog of food records. Bold runs are headings (category,
//! subcategory, histamine level with flag codes), plain runs are food names
//! and notes. Lookup tables per document edition drive the classification.
//!
//! # Quick start
//!
//! ```rust
//! use histali::{extract_lang, Config};
//!
//! let html = "<html><body><b>Živočíšne potraviny</b><b>Ryby</b>\
//!             <b>3 H!</b>tuniak<br/></body></html>";
//! let extraction = extract_lang(html, "sk", &Config::default()).unwrap();
//! assert_eq!(extraction.records[0].name, "tuniak");
//! ```
//!
//! Besides extraction the crate merges chunked JSON fragments ([`merge`]),
//! validates finished catalogs ([`validate`]) and strips embedded base64
//! payloads from the raw HTML ([`preprocess`]).

pub mod catalog;
mod classify;
mod dedup;
mod error;
mod extractor;
pub mod merge;
mod model;
pub mod preprocess;
pub mod tables;
mod token;
mod tokenizer;
pub mod validate;

pub use catalog::{Catalog, Enums, Metadata, NumberedFood};
pub use classify::{LineClass, LineClassifier};
pub use dedup::{dedup_by_name, normalize_name, Dedup, Named};
pub use error::HistaliError;
pub use extractor::{extract_records, Extraction, IncompleteRecord, IncompleteReason};
pub use model::{Category, Flag, FlagSet, FoodRecord, HistamineLevel, OTHER_SUBCATEGORY};
pub use tables::{available_locales, get_tables, Tables};
pub use token::{Token, TokenKind};
pub use tokenizer::{tokenize, tokenize_document};

/// Extraction settings.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Treat unrecognized bold headings as subcategories with a derived id.
    pub derive_unknown_subcategories: bool,
    /// Log headers that produced no record at `warn` instead of `debug`.
    pub report_incomplete: bool,
    /// Minimum food name length, in characters.
    pub min_name_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            derive_unknown_subcategories: false,
            report_incomplete: true,
            min_name_len: 2,
        }
    }
}

impl Config {
    pub fn with_derive_unknown_subcategories(mut self, v: bool) -> Self {
        self.derive_unknown_subcategories = v;
        self
    }
    pub fn with_report_incomplete(mut self, v: bool) -> Self {
        self.report_incomplete = v;
        self
    }
    pub fn with_min_name_len(mut self, n: usize) -> Self {
        self.min_name_len = n;
        self
    }
}

/// Extract food records from HTML, in document order and without deduplication.
pub fn extract(html: &str, tables: &Tables, config: &Config) -> Result<Extraction, HistaliError> {
    let tokens = tokenize(html);
    extract_records(&tokens, tables, config)
}

/// Extract using the bundled tables for `locale`.
///
/// Equivalent to `get_tables(locale)` followed by `extract()`.
pub fn extract_lang(
    html: &str,
    locale: &str,
    config: &Config,
) -> Result<Extraction, HistaliError> {
    let tables = get_tables(locale)?;
    extract(html, &tables, config)
}

/// Deduplicate records and number them into a catalog.
///
/// Returns the catalog and the names of the discarded duplicates.
pub fn build_catalog(
    records: Vec<FoodRecord>,
    tables: &Tables,
) -> (Catalog<NumberedFood>, Vec<String>) {
    let Dedup { unique, duplicates } = dedup_by_name(records);
    (Catalog::from_records(unique, tables), duplicates)
}

/// Convenience: extract, deduplicate and number in one call.
pub fn extract_catalog(
    html: &str,
    tables: &Tables,
    config: &Config,
) -> Result<Catalog<NumberedFood>, HistaliError> {
    let extraction = extract(html, tables, config)?;
    Ok(build_catalog(extraction.records, tables).0)
}
