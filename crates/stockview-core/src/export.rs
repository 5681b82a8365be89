//! JSON export of the selected instrument's value records as a `data:` URI.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{CoreError, ValueRecord};

pub const EXPORT_URI_PREFIX: &str = "data:text/json;charset=UTF-8,";

/// A URI produced internally from fetched records.
///
/// Only this module can construct one, so holders may hand it straight to a
/// download or navigation target without further escaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustedUri(String);

impl TrustedUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The JSON text carried by the URI.
    pub fn payload(&self) -> Result<String, CoreError> {
        decode_payload(&self.0)
    }
}

impl Display for TrustedUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TrustedUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Serialize `records` to JSON and wrap them as a percent-encoded data URI.
pub fn generate_export_uri(records: &[ValueRecord]) -> Result<TrustedUri, CoreError> {
    let json = serde_json::to_string(records)?;
    Ok(TrustedUri(format!(
        "{EXPORT_URI_PREFIX}{}",
        encode_uri_component(&json)
    )))
}

/// Decode the records carried by an export URI.
pub fn decode_export_uri(uri: &str) -> Result<Vec<ValueRecord>, CoreError> {
    let payload = decode_payload(uri)?;
    Ok(serde_json::from_str(&payload)?)
}

fn decode_payload(uri: &str) -> Result<String, CoreError> {
    let encoded = uri
        .strip_prefix(EXPORT_URI_PREFIX)
        .ok_or(CoreError::NotExportUri {
            expected: EXPORT_URI_PREFIX,
        })?;
    Ok(urlencoding::decode(encoded)?.into_owned())
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
fn encode_uri_component(input: &str) -> String {
    // urlencoding leaves only `-_.~` and alphanumerics bare.
    urlencoding::encode(input)
        .replace("%21", "!")
        .replace("%2A", "*")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
}
