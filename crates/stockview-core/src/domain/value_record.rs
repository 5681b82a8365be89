use serde::{Deserialize, Serialize, Serializer};

use crate::{InstrumentId, ValidationError, ValueDate};

/// Dated value observation as served by `GET /stockvalues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub stock_id: InstrumentId,
    pub date: ValueDate,
    #[serde(serialize_with = "serialize_json_number")]
    pub value: f64,
}

impl ValueRecord {
    pub fn new(
        stock_id: i64,
        date: ValueDate,
        value: f64,
    ) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "value" });
        }

        Ok(Self {
            stock_id: InstrumentId::new(stock_id),
            date,
            value,
        })
    }
}

// Integral values are written without a fraction (`5`, not `5.0`), matching
// the number formatting the backend uses.
fn serialize_json_number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if value.fract() == 0.0 && value.abs() <= SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_integral_values_without_fraction() {
        let record =
            ValueRecord::new(1, ValueDate::lenient("2023-01-01"), 5.0).expect("valid record");
        let json = serde_json::to_string(&record).expect("must serialize");
        assert_eq!(json, r#"{"stock_id":1,"date":"2023-01-01","value":5}"#);
    }

    #[test]
    fn keeps_fractional_values() {
        let record =
            ValueRecord::new(1, ValueDate::lenient("2023-01-01"), 5.25).expect("valid record");
        let json = serde_json::to_string(&record).expect("must serialize");
        assert_eq!(json, r#"{"stock_id":1,"date":"2023-01-01","value":5.25}"#);
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = ValueRecord::new(1, ValueDate::lenient("2023-01-01"), f64::NAN)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { field: "value" }));
    }
}
