use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::ValidationError;

/// Observation date of a value record.
///
/// The backend string is kept verbatim so exports reproduce exactly what was
/// fetched; the parsed instant drives chronological ordering. Offset-less
/// inputs are read as UTC.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueDate {
    raw: String,
    instant: Option<OffsetDateTime>,
}

impl ValueDate {
    /// Parse a date, rejecting input that is not a recognised format.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let instant = parse_instant(input).ok_or_else(|| ValidationError::InvalidDate {
            value: input.to_owned(),
        })?;

        Ok(Self {
            raw: input.to_owned(),
            instant: Some(instant),
        })
    }

    /// Keep any input; unparseable dates carry no instant.
    pub fn lenient(input: impl Into<String>) -> Self {
        let raw = input.into();
        let instant = parse_instant(&raw);
        Self { raw, instant }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> Option<OffsetDateTime> {
        self.instant
    }

    /// Milliseconds since the Unix epoch.
    pub fn unix_millis(&self) -> Option<i128> {
        self.instant
            .map(|instant| instant.unix_timestamp_nanos() / 1_000_000)
    }

    /// Earlier instants first; dates without an instant sort after all others.
    pub fn cmp_chronological(&self, other: &Self) -> Ordering {
        match (self.instant, other.instant) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

fn parse_instant(input: &str) -> Option<OffsetDateTime> {
    let trimmed = input.trim();

    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(parsed.to_offset(UtcOffset::UTC));
    }

    let date_time = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, &date_time) {
        return Some(parsed.assume_utc());
    }

    let date_time_fraction =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, &date_time_fraction) {
        return Some(parsed.assume_utc());
    }

    let date_only = format_description!("[year]-[month]-[day]");
    Date::parse(trimmed, &date_only)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

impl Display for ValueDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ValueDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ValueDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::lenient(value))
    }
}
