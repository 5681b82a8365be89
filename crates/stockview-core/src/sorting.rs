//! Sort criteria and ordering functions for instruments and value records.
//!
//! The functions here are pure: they return a freshly ordered vector and
//! leave the input untouched. Sorts are stable.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::{SelectableInstrument, ValidationError, ValueRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ValidationError::InvalidSortOrder {
                value: input.to_owned(),
            }),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which instrument list a sort reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortTarget {
    /// The filtered projection currently on display.
    Projection,
    /// The unfiltered base list; the projection keeps its order until the
    /// next search recompute.
    Base,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentSortCriteria {
    Stock,
    Industry,
    Sector,
    CurrencyCode,
}

impl InstrumentSortCriteria {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Industry => "industry",
            Self::Sector => "sector",
            Self::CurrencyCode => "currency-code",
        }
    }

    /// Sector sorts reorder the base list rather than the projection.
    pub const fn target(self) -> SortTarget {
        match self {
            Self::Sector => SortTarget::Base,
            Self::Stock | Self::Industry | Self::CurrencyCode => SortTarget::Projection,
        }
    }

    fn key(self, entry: &SelectableInstrument) -> &str {
        let instrument = &entry.instrument;
        match self {
            Self::Stock => &instrument.name,
            Self::Industry => &instrument.industry,
            Self::Sector => &instrument.sector,
            Self::CurrencyCode => &instrument.currency_code,
        }
    }
}

impl FromStr for InstrumentSortCriteria {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "stock" | "name" => Ok(Self::Stock),
            "industry" => Ok(Self::Industry),
            "sector" => Ok(Self::Sector),
            "currency-code" | "currency_code" | "currency code" | "currency" => {
                Ok(Self::CurrencyCode)
            }
            _ => Err(ValidationError::InvalidInstrumentCriteria {
                value: input.to_owned(),
            }),
        }
    }
}

impl Display for InstrumentSortCriteria {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSortCriteria {
    Date,
    Value,
}

impl ValueSortCriteria {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Value => "value",
        }
    }
}

impl FromStr for ValueSortCriteria {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "value" => Ok(Self::Value),
            _ => Err(ValidationError::InvalidValueCriteria {
                value: input.to_owned(),
            }),
        }
    }
}

impl Display for ValueSortCriteria {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collation-style string comparison in three passes, like a root-locale
/// collator: base letters compared case-insensitively with accents removed,
/// then unaccented before accented, then lowercase before uppercase. Code
/// points break any remaining tie.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    base_letters(left)
        .cmp(base_letters(right))
        .then_with(|| folded(left).cmp(folded(right)))
        .then_with(|| {
            base_chars(left)
                .zip(base_chars(right))
                .map(|(l, r)| case_rank(l).cmp(&case_rank(r)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| left.cmp(right))
}

fn base_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().filter(|ch| !is_combining_mark(*ch))
}

fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    base_chars(text).flat_map(char::to_lowercase)
}

fn folded(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().flat_map(char::to_lowercase)
}

fn case_rank(ch: char) -> u8 {
    u8::from(ch.is_uppercase())
}

pub fn sort_instruments(
    entries: &[SelectableInstrument],
    criteria: InstrumentSortCriteria,
    order: SortOrder,
) -> Vec<SelectableInstrument> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| order.apply(locale_compare(criteria.key(a), criteria.key(b))));
    sorted
}

pub fn sort_value_records(
    records: &[ValueRecord],
    criteria: ValueSortCriteria,
    order: SortOrder,
) -> Vec<ValueRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match criteria {
            ValueSortCriteria::Date => a.date.cmp_chronological(&b.date),
            ValueSortCriteria::Value => a.value.total_cmp(&b.value),
        };
        order.apply(ordering)
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Instrument, ValueDate};

    fn named(names: &[&str]) -> Vec<SelectableInstrument> {
        names
            .iter()
            .zip(1_i64..)
            .map(|(name, id)| Instrument::new(id, *name, "i", "s", "USD").into())
            .collect()
    }

    fn names(entries: &[SelectableInstrument]) -> Vec<&str> {
        entries.iter().map(|e| e.instrument.name.as_str()).collect()
    }

    fn record(date: &str, value: f64) -> ValueRecord {
        ValueRecord::new(1, ValueDate::lenient(date), value).expect("valid record")
    }

    #[test]
    fn sorts_by_stock_in_both_directions() {
        let entries = named(&["B", "A"]);

        let asc = sort_instruments(&entries, InstrumentSortCriteria::Stock, SortOrder::Asc);
        assert_eq!(names(&asc), vec!["A", "B"]);

        let desc = sort_instruments(&entries, InstrumentSortCriteria::Stock, SortOrder::Desc);
        assert_eq!(names(&desc), vec!["B", "A"]);

        assert_eq!(names(&entries), vec!["B", "A"], "input must be untouched");
    }

    #[test]
    fn locale_compare_ignores_case_before_code_points() {
        let entries = named(&["banana", "Apple", "apple", "Cherry"]);
        let asc = sort_instruments(&entries, InstrumentSortCriteria::Stock, SortOrder::Asc);
        assert_eq!(names(&asc), vec!["apple", "Apple", "banana", "Cherry"]);
    }

    #[test]
    fn accented_letters_sort_with_their_base_letter() {
        assert_eq!(locale_compare("é", "f"), Ordering::Less);
        assert_eq!(locale_compare("Électricité", "Zinc"), Ordering::Less);
        assert_eq!(locale_compare("e", "é"), Ordering::Less);

        let entries = named(&["Zurich Insurance", "Société Générale", "Nestlé", "Siemens"]);
        let asc = sort_instruments(&entries, InstrumentSortCriteria::Stock, SortOrder::Asc);
        assert_eq!(
            names(&asc),
            vec!["Nestlé", "Siemens", "Société Générale", "Zurich Insurance"]
        );
    }

    #[test]
    fn sorts_value_records_by_date() {
        let records = vec![record("2023-01-02", 5.0), record("2023-01-01", 10.0)];

        let asc = sort_value_records(&records, ValueSortCriteria::Date, SortOrder::Asc);
        assert_eq!(asc[0].date.as_str(), "2023-01-01");

        let desc = sort_value_records(&records, ValueSortCriteria::Date, SortOrder::Desc);
        assert_eq!(desc[0].date.as_str(), "2023-01-02");
    }

    #[test]
    fn sorts_value_records_numerically() {
        let records = vec![
            record("2023-01-01", 10.0),
            record("2023-01-02", 9.5),
            record("2023-01-03", 100.0),
        ];

        let asc = sort_value_records(&records, ValueSortCriteria::Value, SortOrder::Asc);
        let values: Vec<f64> = asc.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![9.5, 10.0, 100.0]);
    }

    #[test]
    fn sector_is_the_only_base_list_sort() {
        assert_eq!(InstrumentSortCriteria::Sector.target(), SortTarget::Base);
        assert_eq!(InstrumentSortCriteria::Stock.target(), SortTarget::Projection);
        assert_eq!(InstrumentSortCriteria::Industry.target(), SortTarget::Projection);
        assert_eq!(InstrumentSortCriteria::CurrencyCode.target(), SortTarget::Projection);
    }

    #[test]
    fn parses_criteria_names() {
        assert_eq!(
            "Currency Code".parse::<InstrumentSortCriteria>(),
            Ok(InstrumentSortCriteria::CurrencyCode)
        );
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!("value".parse::<ValueSortCriteria>(), Ok(ValueSortCriteria::Value));
        assert!(matches!(
            "volume".parse::<ValueSortCriteria>(),
            Err(ValidationError::InvalidValueCriteria { .. })
        ));
    }
}
