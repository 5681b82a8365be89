//! Data source contract and implementations.
//!
//! | Collection | Endpoint | Record |
//! |------------|----------|--------|
//! | Instruments | `GET {base}/stocks` | [`Instrument`] |
//! | Value records | `GET {base}/stockvalues` | [`ValueRecord`] |
//!
//! [`BackendSource`] talks to the HTTP backend; [`StaticSource`] serves
//! in-memory collections (the bundled sample dataset, or test fixtures).

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{Instrument, InstrumentId, RetryPolicy, StockviewConfig, ValueDate, ValueRecord};

/// The two collections served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Instruments,
    ValueRecords,
}

impl Collection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instruments => "instruments",
            Self::ValueRecords => "value_records",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Instruments => "stocks",
            Self::ValueRecords => "stockvalues",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure or non-success status.
    Network,
    /// The payload was not the expected JSON array.
    Decode,
}

/// Fetch failure for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn network(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind: SourceErrorKind::Network,
            message: message.into(),
            retryable,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Decode,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Network => "source.network",
            SourceErrorKind::Decode => "source.decode",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<Vec<T>, SourceError>> + Send + 'a>>;

/// Source of the two backend collections.
///
/// Each method performs exactly one logical fetch; there is no caching.
pub trait DataSource: Send + Sync {
    fn fetch_instruments(&self) -> SourceFuture<'_, Instrument>;

    fn fetch_value_records(&self) -> SourceFuture<'_, ValueRecord>;
}

/// HTTP-backed source.
#[derive(Clone)]
pub struct BackendSource {
    http_client: Arc<dyn HttpClient>,
    instruments_url: String,
    value_records_url: String,
    timeout_ms: u64,
    retry: RetryPolicy,
}

impl BackendSource {
    pub fn new(config: &StockviewConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::default()))
    }

    pub fn with_http_client(config: &StockviewConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            instruments_url: config.endpoint(Collection::Instruments.path()),
            value_records_url: config.endpoint(Collection::ValueRecords.path()),
            timeout_ms: config.timeout_ms,
            retry: config.retry.clone(),
        }
    }

    fn url(&self, collection: Collection) -> &str {
        match collection {
            Collection::Instruments => &self.instruments_url,
            Collection::ValueRecords => &self.value_records_url,
        }
    }

    async fn fetch_collection<T>(&self, collection: Collection) -> Result<Vec<T>, SourceError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(collection);
        info!(collection = collection.as_str(), url, "starting fetch");

        let mut attempt = 0;
        let body = loop {
            match self.fetch_body(collection, url).await {
                Ok(body) => break body,
                Err(error) if error.retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        collection = collection.as_str(),
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        };

        let records: Vec<T> = serde_json::from_str(&body).map_err(|error| {
            SourceError::decode(format!("malformed {collection} payload: {error}"))
        })?;

        info!(collection = collection.as_str(), count = records.len(), "fetched");
        Ok(records)
    }

    async fn fetch_body(&self, collection: Collection, url: &str) -> Result<String, SourceError> {
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);
        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::network(
                format!("{collection} transport error: {}", error.message()),
                true,
            )
        })?;

        if !response.is_success() {
            return Err(SourceError::network(
                format!("{collection} upstream returned status {}", response.status),
                self.retry.should_retry_status(response.status),
            ));
        }

        Ok(response.body)
    }
}

impl DataSource for BackendSource {
    fn fetch_instruments(&self) -> SourceFuture<'_, Instrument> {
        Box::pin(self.fetch_collection(Collection::Instruments))
    }

    fn fetch_value_records(&self) -> SourceFuture<'_, ValueRecord> {
        Box::pin(self.fetch_collection(Collection::ValueRecords))
    }
}

/// In-memory source. Either collection can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    instruments: Vec<Instrument>,
    value_records: Vec<ValueRecord>,
    instruments_error: Option<SourceError>,
    value_records_error: Option<SourceError>,
}

impl StaticSource {
    pub fn new(instruments: Vec<Instrument>, value_records: Vec<ValueRecord>) -> Self {
        Self {
            instruments,
            value_records,
            ..Self::default()
        }
    }

    /// Small offline dataset used by `--mock`.
    pub fn sample() -> Self {
        let instruments = vec![
            Instrument::new(1, "Northwind Traders", "Food Distribution", "Consumer Staples", "USD"),
            Instrument::new(2, "Contoso Pharma", "Pharmaceuticals", "Health Care", "EUR"),
            Instrument::new(3, "Fabrikam Motors", "Automobiles", "Consumer Discretionary", "JPY"),
            Instrument::new(4, "Litware Systems", "Software", "Information Technology", "USD"),
            Instrument::new(5, "Tailspin Air", "Airlines", "Industrials", "GBP"),
        ];

        let value_records = instruments
            .iter()
            .flat_map(|instrument| {
                let id = instrument.id;
                let base = 40.0 + id.get() as f64 * 12.5;
                (1..=5).map(move |day| sample_record(id, day, base))
            })
            .collect();

        Self::new(instruments, value_records)
    }

    pub fn with_instruments_error(mut self, error: SourceError) -> Self {
        self.instruments_error = Some(error);
        self
    }

    pub fn with_value_records_error(mut self, error: SourceError) -> Self {
        self.value_records_error = Some(error);
        self
    }
}

fn sample_record(id: InstrumentId, day: u8, base: f64) -> ValueRecord {
    let swing = f64::from((day * 7 + 3) % 11) - 5.0;
    ValueRecord {
        stock_id: id,
        date: ValueDate::lenient(format!("2024-03-{day:02}")),
        value: base + swing * 0.75,
    }
}

impl DataSource for StaticSource {
    fn fetch_instruments(&self) -> SourceFuture<'_, Instrument> {
        Box::pin(async move {
            match &self.instruments_error {
                Some(error) => Err(error.clone()),
                None => Ok(self.instruments.clone()),
            }
        })
    }

    fn fetch_value_records(&self) -> SourceFuture<'_, ValueRecord> {
        Box::pin(async move {
            match &self.value_records_error {
                Some(error) => Err(error.clone()),
                None => Ok(self.value_records.clone()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collections_map_to_backend_paths() {
        assert_eq!(Collection::Instruments.path(), "stocks");
        assert_eq!(Collection::ValueRecords.path(), "stockvalues");
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SourceError::network("down", true).code(), "source.network");
        assert_eq!(SourceError::decode("bad").code(), "source.decode");
        assert!(!SourceError::decode("bad").retryable());
    }

    #[tokio::test]
    async fn sample_dataset_references_known_instruments() {
        let source = StaticSource::sample();
        let instruments = source.fetch_instruments().await.expect("sample instruments");
        let values = source.fetch_value_records().await.expect("sample values");

        assert_eq!(instruments.len(), 5);
        assert_eq!(values.len(), 25);
        assert!(values
            .iter()
            .all(|record| instruments.iter().any(|i| i.id == record.stock_id)));
        assert!(values.iter().all(|record| record.date.instant().is_some()));
    }

    #[tokio::test]
    async fn static_source_reports_injected_failures() {
        let source = StaticSource::sample()
            .with_value_records_error(SourceError::decode("truncated body"));

        assert!(source.fetch_instruments().await.is_ok());
        let err = source.fetch_value_records().await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::Decode);
    }
}
