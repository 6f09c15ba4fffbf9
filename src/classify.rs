use regex::Regex;

use crate::error::HistaliError;
use crate::model::{Category, FlagSet, HistamineLevel};
use crate::tables::Tables;
use crate::token::Token;

/// Context-free classification of a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Page header, footer, or column heading.
    Boilerplate,
    Category(Category),
    Subcategory(String),
    /// Histamine-level code, optionally followed by flag codes.
    Header { level: HistamineLevel, flags: FlagSet },
    Other,
}

/// Classifies tokens against one set of lookup tables.
#[derive(Debug)]
pub struct LineClassifier<'t> {
    tables: &'t Tables,
    /// `^(code|code|...)\s*(.*)$`, or `None` when the tables define no levels.
    header_re: Option<Regex>,
}

impl<'t> LineClassifier<'t> {
    pub fn new(tables: &'t Tables) -> Result<Self, HistaliError> {
        let mut codes: Vec<&str> = tables.levels.iter().map(|l| l.code.as_str()).collect();
        // Longer codes first so alternation never stops at a shorter prefix.
        codes.sort_by_key(|c| std::cmp::Reverse(c.chars().count()));
        let header_re = if codes.is_empty() {
            None
        } else {
            let alternation = codes
                .iter()
                .map(|c| regex::escape(c))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"^({alternation})\s*(.*)$"))?)
        };
        Ok(Self { tables, header_re })
    }

    pub fn tables(&self) -> &'t Tables {
        self.tables
    }

    /// Classify a token seen outside a record.
    ///
    /// Boilerplate is checked for every token; only emphasized tokens can be
    /// categories, subcategories, or headers. Rules are tried in that order.
    pub fn classify(&self, token: &Token) -> LineClass {
        if self.tables.is_boilerplate(&token.text) {
            return LineClass::Boilerplate;
        }
        if token.is_plain() {
            return LineClass::Other;
        }
        if let Some(category) = self.tables.category_for(&token.text) {
            return LineClass::Category(category);
        }
        if let Some(id) = self.tables.subcategory_for(&token.text) {
            return LineClass::Subcategory(id.to_string());
        }
        match self.match_header(&token.text) {
            Some((level, flags)) => LineClass::Header { level, flags },
            None => LineClass::Other,
        }
    }

    /// Parse a histamine-level line such as `"2 H L"` or `"0H!"`.
    pub fn match_header(&self, text: &str) -> Option<(HistamineLevel, FlagSet)> {
        let caps = self.header_re.as_ref()?.captures(text)?;
        let level = self
            .tables
            .level_for_code(&caps[1])
            .unwrap_or(HistamineLevel::InsufficientInfo);
        let flags = self.tables.flags_in(caps[2].trim()).collect();
        Some((level, flags))
    }

    /// `true` if the text would end a record's notes: a bare flag code, a bare
    /// level code, or flags-only text.
    pub fn ends_notes(&self, text: &str) -> bool {
        self.tables.is_flag_code(text)
            || self.tables.is_level_code(text)
            || self.tables.is_flags_only(text)
    }
}
