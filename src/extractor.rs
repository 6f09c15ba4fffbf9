//! Record extraction as an explicit state machine over the token stream.
//!
//! ```text
//! SeekingStart ──start marker──▶ Scanning
//! Scanning ──category──▶ Scanning (category set, subcategory reset)
//! Scanning ──subcategory──▶ Scanning (subcategory set)
//! Scanning ──header──▶ CollectingName
//! CollectingName ──flags-only──▶ CollectingName (flags added)
//! CollectingName ──plain──▶ CollectingNotes
//! CollectingName ──emphasized──▶ Scanning (header dropped, token reprocessed)
//! CollectingNotes ──plain──▶ CollectingNotes (note appended)
//! CollectingNotes ──emphasized / flag / level code──▶ Scanning (record emitted, token reprocessed)
//! ```
//!
//! Boilerplate tokens are consumed without effect in every state after the start.

use crate::classify::{LineClass, LineClassifier};
use crate::error::HistaliError;
use crate::model::{Category, FlagSet, FoodRecord, HistamineLevel, OTHER_SUBCATEGORY};
use crate::tables::{derive_subcategory_id, Tables};
use crate::token::Token;
use crate::Config;

/// Why a histamine-level header produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncompleteReason {
    /// No plain token followed before the next heading or end of input.
    MissingName,
    /// The candidate name was too short, a flag code, or a bare `?`/`-`.
    RejectedName(String),
}

/// A header that was dropped instead of becoming a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteRecord {
    /// Text of the histamine-level header.
    pub header: String,
    pub category: Category,
    pub subcategory: String,
    pub reason: IncompleteReason,
}

/// Result of one extraction run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Extraction {
    /// Records in document order.
    pub records: Vec<FoodRecord>,
    /// Category in effect after the last token.
    pub category: Category,
    /// Subcategory in effect after the last token.
    pub subcategory: String,
    /// Whether the start marker was found.
    pub started: bool,
    pub incomplete: Vec<IncompleteRecord>,
}

/// A record under construction.
#[derive(Debug)]
struct Pending {
    header: String,
    level: HistamineLevel,
    flags: FlagSet,
    name: String,
    notes: Vec<String>,
}

#[derive(Debug)]
enum State {
    SeekingStart,
    Scanning,
    CollectingName(Pending),
    CollectingNotes(Pending),
}

/// What to do with the current token after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    Consume,
    Reprocess,
}

struct Extractor<'t, 'c> {
    classifier: LineClassifier<'t>,
    config: &'c Config,
    category: Category,
    subcategory: String,
    started: bool,
    records: Vec<FoodRecord>,
    incomplete: Vec<IncompleteRecord>,
}

impl<'t, 'c> Extractor<'t, 'c> {
    fn new(tables: &'t Tables, config: &'c Config) -> Result<Self, HistaliError> {
        Ok(Self {
            classifier: LineClassifier::new(tables)?,
            config,
            category: tables.start_category().id,
            subcategory: OTHER_SUBCATEGORY.to_string(),
            started: false,
            records: Vec::new(),
            incomplete: Vec::new(),
        })
    }

    fn tables(&self) -> &'t Tables {
        self.classifier.tables()
    }

    fn run(mut self, tokens: &[Token]) -> Extraction {
        let mut state = State::SeekingStart;
        let mut i = 0;
        while i < tokens.len() {
            let (next, advance) = self.step(state, &tokens[i]);
            state = next;
            if advance == Advance::Consume {
                i += 1;
            }
        }
        match state {
            State::CollectingName(pending) => self.drop_header(pending, IncompleteReason::MissingName),
            State::CollectingNotes(pending) => self.finish(pending),
            State::SeekingStart | State::Scanning => {}
        }

        Extraction {
            records: self.records,
            category: self.category,
            subcategory: self.subcategory,
            started: self.started,
            incomplete: self.incomplete,
        }
    }

    /// The transition function.
    fn step(&mut self, state: State, token: &Token) -> (State, Advance) {
        let tables = self.tables();
        match state {
            State::SeekingStart => {
                let start = tables.start_category();
                if token.text.contains(start.marker.as_str()) {
                    self.started = true;
                    self.category = start.id;
                    (State::Scanning, Advance::Consume)
                } else {
                    (State::SeekingStart, Advance::Consume)
                }
            }
            State::Scanning => {
                match self.classifier.classify(token) {
                    LineClass::Boilerplate => {}
                    LineClass::Category(category) => {
                        self.category = category;
                        self.subcategory = tables.subcategory_after_category(category, &token.text);
                    }
                    LineClass::Subcategory(id) => self.subcategory = id,
                    LineClass::Header { level, flags } => {
                        let pending = Pending {
                            header: token.text.clone(),
                            level,
                            flags,
                            name: String::new(),
                            notes: Vec::new(),
                        };
                        return (State::CollectingName(pending), Advance::Consume);
                    }
                    LineClass::Other => {
                        if self.config.derive_unknown_subcategories
                            && token.is_emphasized()
                            && !token.text.is_empty()
                        {
                            self.subcategory = derive_subcategory_id(&token.text);
                        }
                    }
                }
                (State::Scanning, Advance::Consume)
            }
            State::CollectingName(mut pending) => {
                if tables.is_boilerplate(&token.text) {
                    return (State::CollectingName(pending), Advance::Consume);
                }
                if tables.is_flags_only(&token.text) {
                    pending.flags.extend(tables.flags_in(&token.text));
                    return (State::CollectingName(pending), Advance::Consume);
                }
                if token.is_plain() {
                    pending.name = token.text.clone();
                    return (State::CollectingNotes(pending), Advance::Consume);
                }
                self.drop_header(pending, IncompleteReason::MissingName);
                (State::Scanning, Advance::Reprocess)
            }
            State::CollectingNotes(mut pending) => {
                if tables.is_boilerplate(&token.text) {
                    return (State::CollectingNotes(pending), Advance::Consume);
                }
                if token.is_emphasized() || self.classifier.ends_notes(&token.text) {
                    self.finish(pending);
                    return (State::Scanning, Advance::Reprocess);
                }
                if !token.text.is_empty() {
                    pending.notes.push(token.text.clone());
                }
                (State::CollectingNotes(pending), Advance::Consume)
            }
        }
    }

    fn accepts_name(&self, name: &str) -> bool {
        name.chars().count() >= self.config.min_name_len
            && name != "?"
            && name != "-"
            && !self.tables().is_flags_only(name)
    }

    fn finish(&mut self, pending: Pending) {
        if !self.accepts_name(&pending.name) {
            let name = pending.name.clone();
            self.drop_header(pending, IncompleteReason::RejectedName(name));
            return;
        }
        let record = FoodRecord::new(
            pending.name,
            pending.level,
            self.category,
            self.subcategory.clone(),
        )
        .with_flags(pending.flags)
        .with_notes(pending.notes.join(" "));

        #[cfg(feature = "tracing")]
        tracing::trace!(name = %record.name, level = %record.histamine_level, "record");

        self.records.push(record);
    }

    fn drop_header(&mut self, pending: Pending, reason: IncompleteReason) {
        #[cfg(feature = "tracing")]
        {
            if self.config.report_incomplete {
                tracing::warn!(header = %pending.header, reason = ?reason, "header produced no record");
            } else {
                tracing::debug!(header = %pending.header, reason = ?reason, "header produced no record");
            }
        }

        self.incomplete.push(IncompleteRecord {
            header: pending.header,
            category: self.category,
            subcategory: self.subcategory.clone(),
            reason,
        });
    }
}

/// Run the record extractor over a token sequence.
pub fn extract_records(
    tokens: &[Token],
    tables: &Tables,
    config: &Config,
) -> Result<Extraction, HistaliError> {
    let extraction = Extractor::new(tables, config)?.run(tokens);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        tokens = tokens.len(),
        records = extraction.records.len(),
        incomplete = extraction.incomplete.len(),
        started = extraction.started,
        "extraction finished"
    );

    Ok(extraction)
}
