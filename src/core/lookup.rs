/// Locale lookup services: id → display name, big-number abbreviation,
/// and list joining.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::schema::action::{AttributeId, TypeId};

const BUNDLED_JA: &str = include_str!("../../locale_data/ja/lookup.ron");

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Which id space a failed lookup belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupTable {
    Attribute,
    Type,
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute => f.write_str("attribute"),
            Self::Type => f.write_str("type"),
        }
    }
}

/// Capability interface the renderer uses for everything locale-specific
/// that is not sentence structure.
///
/// Name lookups return `None` for unknown ids; the renderer turns that into
/// a `MissingLookupEntry` error.
pub trait LookupProvider {
    fn attribute_name(&self, id: AttributeId) -> Option<&str>;

    fn type_name(&self, id: TypeId) -> Option<&str>;

    /// Abbreviate a large integer (`1500000` → `150万`).
    fn big_number(&self, n: u64) -> String;

    /// Join items so the last pair is linked by `conjunction`
    /// (`火、水と木`).
    fn join_list(&self, items: &[String], conjunction: &str) -> String;
}

/// A lookup table loaded from RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableLookup {
    pub attributes: FxHashMap<AttributeId, String>,
    pub types: FxHashMap<TypeId, String>,
    /// Separator between all but the last two list items.
    pub list_separator: String,
    /// `(value, suffix)` pairs, largest first.
    #[serde(default)]
    pub number_units: Vec<(u64, String)>,
}

impl TableLookup {
    /// The bundled Japanese table.
    pub fn ja() -> Result<TableLookup, LookupError> {
        Self::parse_ron(BUNDLED_JA)
    }

    /// Load a lookup table from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<TableLookup, LookupError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a lookup table from a RON string.
    pub fn parse_ron(input: &str) -> Result<TableLookup, LookupError> {
        let mut table: TableLookup = ron::from_str(input)?;
        table.number_units.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(table)
    }
}

impl LookupProvider for TableLookup {
    fn attribute_name(&self, id: AttributeId) -> Option<&str> {
        self.attributes.get(&id).map(String::as_str)
    }

    fn type_name(&self, id: TypeId) -> Option<&str> {
        self.types.get(&id).map(String::as_str)
    }

    fn big_number(&self, n: u64) -> String {
        let mut rest = n;
        let mut out = String::new();
        for (value, suffix) in &self.number_units {
            if *value == 0 {
                continue;
            }
            let count = rest / value;
            if count > 0 {
                out.push_str(&count.to_string());
                out.push_str(suffix);
                rest %= value;
            }
        }
        if rest > 0 || out.is_empty() {
            out.push_str(&rest.to_string());
        }
        out
    }

    fn join_list(&self, items: &[String], conjunction: &str) -> String {
        match items {
            [] => String::new(),
            [only] => only.clone(),
            [head @ .., last] => {
                let mut text = head.join(&self.list_separator);
                text.push_str(conjunction);
                text.push_str(last);
                text
            }
        }
    }
}
