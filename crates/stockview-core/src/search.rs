//! Case-insensitive instrument search.

use crate::{Instrument, SelectableInstrument};

/// Lowercased search needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// True when the needle is a substring of the name, industry, sector or
    /// currency code.
    pub fn matches(&self, instrument: &Instrument) -> bool {
        [
            &instrument.name,
            &instrument.industry,
            &instrument.sector,
            &instrument.currency_code,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// Recompute the projection from the full `base` list, keeping base order.
pub fn filter_instruments(
    base: &[SelectableInstrument],
    term: &SearchTerm,
) -> Vec<SelectableInstrument> {
    base.iter()
        .filter(|entry| term.matches(&entry.instrument))
        .cloned()
        .collect()
}
