//! # Stockview Core
//!
//! Data access and view state for browsing stocks and their value history
//! served by a stocks backend.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Backend URL and tunables from defaults and environment |
//! | [`data_source`] | Data source trait, HTTP backend and in-memory source |
//! | [`debounce`] | Latest-value debounce cell and async search debouncer |
//! | [`domain`] | Instruments, value records and dates |
//! | [`error`] | Core error types |
//! | [`export`] | `data:` URI export of value records |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`retry`] | Retry and backoff policy |
//! | [`search`] | Case-insensitive instrument search |
//! | [`sorting`] | Sort criteria and ordering functions |
//! | [`view_state`] | Projections, selection and export state |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockview_core::{BackendSource, InstrumentId, StockviewConfig, ViewState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StockviewConfig::from_env()?;
//!     let source = BackendSource::new(&config);
//!     let mut view = ViewState::load(&source, config.selection_scope).await?;
//!
//!     view.apply_search_term("bank");
//!     view.toggle_selection(InstrumentId::new(1), true)?;
//!     if let Some(uri) = view.export_uri() {
//!         println!("{uri}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  CLI / browse   │────▶│ Search Debouncer │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │ settled term
//!          ▼                       ▼
//! ┌──────────────────────────────────────────┐
//! │ ViewState (search / sort / select /      │
//! │            export)                       │
//! └────────┬─────────────────────────────────┘
//!          │ load once
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Data Source     │────▶│ HTTP Client      │
//! │ (trait)         │     │ (reqwest + retry)│
//! └─────────────────┘     └──────────────────┘
//! ```

pub mod config;
pub mod data_source;
pub mod debounce;
pub mod domain;
pub mod error;
pub mod export;
pub mod http_client;
pub mod retry;
pub mod search;
pub mod sorting;
pub mod view_state;

// Configuration
pub use config::StockviewConfig;

// Data source trait and implementations
pub use data_source::{
    BackendSource, Collection, DataSource, SourceError, SourceErrorKind, StaticSource,
};

// Debouncing
pub use debounce::{DebounceCell, SearchDebouncer};

// Domain models
pub use domain::{Instrument, InstrumentId, SelectableInstrument, ValueDate, ValueRecord};

// Error types
pub use error::{ConfigError, CoreError, ValidationError};

// Export
pub use export::{decode_export_uri, generate_export_uri, TrustedUri, EXPORT_URI_PREFIX};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Retry logic
pub use retry::{Backoff, RetryPolicy};

// Projections
pub use search::{filter_instruments, SearchTerm};
pub use sorting::{
    locale_compare, sort_instruments, sort_value_records, InstrumentSortCriteria, SortOrder,
    SortTarget, ValueSortCriteria,
};

// View state
pub use view_state::{LoadOutcome, LoadReport, SelectionScope, SelectionState, ViewState};
