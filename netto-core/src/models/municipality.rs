use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Per-municipality tax rates, stored as fractions (e.g. `0.2339`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub name: String,
    pub kommuneskat: Decimal,
    pub kirkeskat: Decimal,
}

/// Immutable lookup table over all municipalities, keyed by exact name.
///
/// Built once at startup from the rate dataset and shared read-only. An
/// unknown name is a hard input error, never a silent default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MunicipalityTable {
    entries: BTreeMap<String, Municipality>,
}

impl MunicipalityTable {
    pub fn new(entries: impl IntoIterator<Item = Municipality>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|m| (m.name.clone(), m))
                .collect(),
        }
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Result<&Municipality, ValidationError> {
        self.entries
            .get(name)
            .ok_or_else(|| ValidationError::UnknownMunicipality(name.to_string()))
    }

    /// All municipalities in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = &Municipality> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
