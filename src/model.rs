use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal tolerance rating, plus two non-ordinal states.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistamineLevel {
    WellTolerated,
    ModeratelyTolerated,
    PoorlyTolerated,
    VeryPoorlyTolerated,
    #[default]
    InsufficientInfo,
    Variable,
}

impl HistamineLevel {
    pub const ALL: [HistamineLevel; 6] = [
        HistamineLevel::WellTolerated,
        HistamineLevel::ModeratelyTolerated,
        HistamineLevel::PoorlyTolerated,
        HistamineLevel::VeryPoorlyTolerated,
        HistamineLevel::InsufficientInfo,
        HistamineLevel::Variable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistamineLevel::WellTolerated => "WELL_TOLERATED",
            HistamineLevel::ModeratelyTolerated => "MODERATELY_TOLERATED",
            HistamineLevel::PoorlyTolerated => "POORLY_TOLERATED",
            HistamineLevel::VeryPoorlyTolerated => "VERY_POORLY_TOLERATED",
            HistamineLevel::InsufficientInfo => "INSUFFICIENT_INFO",
            HistamineLevel::Variable => "VARIABLE",
        }
    }
}

impl fmt::Display for HistamineLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warning tag orthogonal to the histamine level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flag {
    HighHistamine,
    FastSpoilage,
    OtherBiogenicAmines,
    HistamineLiberator,
    DaoBlocker,
}

impl Flag {
    pub const ALL: [Flag; 5] = [
        Flag::HighHistamine,
        Flag::FastSpoilage,
        Flag::OtherBiogenicAmines,
        Flag::HistamineLiberator,
        Flag::DaoBlocker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::HighHistamine => "HIGH_HISTAMINE",
            Flag::FastSpoilage => "FAST_SPOILAGE",
            Flag::OtherBiogenicAmines => "OTHER_BIOGENIC_AMINES",
            Flag::HistamineLiberator => "HISTAMINE_LIBERATOR",
            Flag::DaoBlocker => "DAO_BLOCKER",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level food category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    AnimalProducts,
    PlantProducts,
    Beverages,
    FoodAdditives,
    DietarySupplements,
    Preparations,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::AnimalProducts,
        Category::PlantProducts,
        Category::Beverages,
        Category::FoodAdditives,
        Category::DietarySupplements,
        Category::Preparations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::AnimalProducts => "ANIMAL_PRODUCTS",
            Category::PlantProducts => "PLANT_PRODUCTS",
            Category::Beverages => "BEVERAGES",
            Category::FoodAdditives => "FOOD_ADDITIVES",
            Category::DietarySupplements => "DIETARY_SUPPLEMENTS",
            Category::Preparations => "PREPARATIONS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subcategory used before any subcategory heading has been seen.
pub const OTHER_SUBCATEGORY: &str = "OTHER";

/// Insertion-ordered set of flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(Vec<Flag>);

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `flag` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, flag: Flag) -> bool {
        if self.0.contains(&flag) {
            return false;
        }
        self.0.push(flag);
        true
    }

    pub fn extend<I: IntoIterator<Item = Flag>>(&mut self, flags: I) {
        for flag in flags {
            self.insert(flag);
        }
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Flag] {
        &self.0
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut set = FlagSet::new();
        set.extend(iter);
        set
    }
}

/// A food item extracted from the source document.
///
/// Field order matches the emitted JSON object (after `id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct FoodRecord {
    pub category: Category,
    pub subcategory: String,
    pub name: String,
    pub histamine_level: HistamineLevel,
    pub flags: FlagSet,
    pub notes: String,
}

impl FoodRecord {
    pub fn new(
        name: impl Into<String>,
        histamine_level: HistamineLevel,
        category: Category,
        subcategory: impl Into<String>,
    ) -> Self {
        Self {
            category,
            subcategory: subcategory.into(),
            name: name.into(),
            histamine_level,
            flags: FlagSet::new(),
            notes: String::new(),
        }
    }

    pub fn with_flags(mut self, flags: FlagSet) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}
