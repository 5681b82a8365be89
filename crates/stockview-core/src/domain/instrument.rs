use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Backend identity of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(i64);

impl InstrumentId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for InstrumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstrumentId {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        input
            .trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidInstrumentId {
                value: input.to_owned(),
            })
    }
}

impl From<i64> for InstrumentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Instrument metadata as served by `GET /stocks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    #[serde(rename = "stock")]
    pub name: String,
    pub industry: String,
    pub sector: String,
    pub currency_code: String,
}

impl Instrument {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        industry: impl Into<String>,
        sector: impl Into<String>,
        currency_code: impl Into<String>,
    ) -> Self {
        Self {
            id: InstrumentId(id),
            name: name.into(),
            industry: industry.into(),
            sector: sector.into(),
            currency_code: currency_code.into(),
        }
    }
}

/// Instrument decorated with its selection checkbox state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectableInstrument {
    #[serde(flatten)]
    pub instrument: Instrument,
    pub selected: bool,
}

impl SelectableInstrument {
    pub fn id(&self) -> InstrumentId {
        self.instrument.id
    }
}

impl From<Instrument> for SelectableInstrument {
    fn from(instrument: Instrument) -> Self {
        Self {
            instrument,
            selected: false,
        }
    }
}
