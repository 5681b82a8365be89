use thiserror::Error;

/// Validation errors raised while parsing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date must be RFC3339, ISO-8601 date-time or YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("invalid sort order '{value}', expected one of asc, desc")]
    InvalidSortOrder { value: String },
    #[error("invalid instrument sort criteria '{value}', expected one of stock, industry, sector, currency-code")]
    InvalidInstrumentCriteria { value: String },
    #[error("invalid value sort criteria '{value}', expected one of date, value")]
    InvalidValueCriteria { value: String },

    #[error("instrument id must be an integer: '{value}'")]
    InvalidInstrumentId { value: String },
}

/// Configuration errors raised while building [`crate::StockviewConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("backend url '{value}' is not a valid URL: {reason}")]
    InvalidBackendUrl { value: String, reason: String },
    #[error("backend url must use http or https: '{value}'")]
    UnsupportedScheme { value: String },
    #[error("setting '{name}' must be a non-negative integer: '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("invalid selection scope '{value}', expected one of projection, all")]
    InvalidSelectionScope { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("not an export uri: expected prefix '{expected}'")]
    NotExportUri { expected: &'static str },

    #[error("export payload is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),
}
