use crate::error::CatalogError;
use serde::{Deserialize, Serialize};

/// Number of entries in a display catalog
pub const CATALOG_SIZE: usize = 16;

/// Standard display table, grouped by category
const DEFAULT_TEXTS: [&str; CATALOG_SIZE] = [
    "1", "2", "3", "4", //
    "01", "02", "03", "04", //
    "I", "II", "III", "IV", //
    "ONE", "TWO", "THREE", "FOUR",
];

/// Class of a displayed symbol, derived from its catalog index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Digit,
    TwoDigit,
    Numeral,
    Word,
}

impl Category {
    /// Category of the entry at `index` (`index / 4`)
    pub fn from_index(index: u8) -> Self {
        match (index / 4) % 4 {
            0 => Category::Digit,
            1 => Category::TwoDigit,
            2 => Category::Numeral,
            _ => Category::Word,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Digit => write!(f, "digit"),
            Category::TwoDigit => write!(f, "two-digit number"),
            Category::Numeral => write!(f, "numeral"),
            Category::Word => write!(f, "word"),
        }
    }
}

/// Value (1..=4) of the entry at `index` (`index % 4 + 1`)
pub fn value_of(index: u8) -> u8 {
    index % 4 + 1
}

/// Category and value of a display index.
pub fn classify(index: u8) -> (Category, u8) {
    (Category::from_index(index), value_of(index))
}

/// One entry of the display table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    index: u8,
    text: String,
}

impl DisplayEntry {
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> Category {
        Category::from_index(self.index)
    }

    pub fn value(&self) -> u8 {
        value_of(self.index)
    }

    /// Character count of the text
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// The sixteen strings the display can show.
///
/// Only the text is configurable; category and value always follow the
/// index, so a catalog with the words in the wrong slots still classifies
/// by slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Catalog {
    entries: Vec<DisplayEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TEXTS
                .iter()
                .enumerate()
                .map(|(index, text)| DisplayEntry {
                    index: index as u8,
                    text: (*text).to_string(),
                })
                .collect(),
        }
    }
}

impl Catalog {
    /// Build a catalog from exactly 16 non-empty strings
    pub fn from_texts<I, S>(texts: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        if texts.len() != CATALOG_SIZE {
            return Err(CatalogError::WrongEntryCount { found: texts.len() });
        }
        if let Some(index) = texts.iter().position(|t| t.is_empty()) {
            return Err(CatalogError::EmptyText { index });
        }

        Ok(Self {
            entries: texts
                .into_iter()
                .enumerate()
                .map(|(index, text)| DisplayEntry {
                    index: index as u8,
                    text,
                })
                .collect(),
        })
    }

    /// Entry at `index`; indices wrap modulo 16
    pub fn entry(&self, index: u8) -> &DisplayEntry {
        &self.entries[index as usize % CATALOG_SIZE]
    }

    pub fn text(&self, index: u8) -> &str {
        self.entry(index).text()
    }

    pub fn text_len(&self, index: u8) -> usize {
        self.entry(index).text_len()
    }

    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }
}

impl TryFrom<Vec<String>> for Catalog {
    type Error = CatalogError;

    fn try_from(texts: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_texts(texts)
    }
}

impl From<Catalog> for Vec<String> {
    fn from(catalog: Catalog) -> Self {
        catalog.entries.into_iter().map(|e| e.text).collect()
    }
}
