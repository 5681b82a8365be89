//! CLI argument definitions for stockview.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `stocks` | List instruments, optionally searched and sorted |
//! | `values` | Show the value records of one instrument |
//! | `export` | Produce the JSON export of one instrument's values |
//! | `browse` | Interactive session over stdin |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--backend-url` | `STOCKVIEW_BACKEND_URL` or `http://localhost:8080` | Backend base URL |
//! | `--timeout-ms` | `STOCKVIEW_TIMEOUT_MS` or `3000` | Request timeout |
//! | `--mock` | `false` | Use the bundled sample dataset |

use clap::{Args, Parser, Subcommand, ValueEnum};
use stockview_core::{InstrumentSortCriteria, SortOrder, ValueSortCriteria};

/// Browse stocks and their value history from a stocks backend.
#[derive(Debug, Parser)]
#[command(
    name = "stockview",
    author,
    version,
    about = "Browse stocks and their value history",
    long_about = "stockview loads the instrument list and value records from a stocks backend \
once, then searches, sorts, selects and exports them locally.\n\
\n\
Use 'stockview <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Backend base URL (overrides STOCKVIEW_BACKEND_URL).
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Request timeout in milliseconds (overrides STOCKVIEW_TIMEOUT_MS).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Serve the bundled sample dataset instead of calling the backend.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Column-aligned text.
    Table,
    /// Single JSON object.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InstrumentSortArg {
    Stock,
    Industry,
    Sector,
    CurrencyCode,
}

impl From<InstrumentSortArg> for InstrumentSortCriteria {
    fn from(value: InstrumentSortArg) -> Self {
        match value {
            InstrumentSortArg::Stock => Self::Stock,
            InstrumentSortArg::Industry => Self::Industry,
            InstrumentSortArg::Sector => Self::Sector,
            InstrumentSortArg::CurrencyCode => Self::CurrencyCode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueSortArg {
    Date,
    Value,
}

impl From<ValueSortArg> for ValueSortCriteria {
    fn from(value: ValueSortArg) -> Self {
        match value {
            ValueSortArg::Date => Self::Date,
            ValueSortArg::Value => Self::Value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Asc => Self::Asc,
            OrderArg::Desc => Self::Desc,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List instruments.
    ///
    /// # Examples
    ///
    ///   stockview stocks
    ///   stockview stocks --search bank --sort stock --order desc
    Stocks(StocksArgs),

    /// Show the value records of one instrument.
    ///
    /// # Examples
    ///
    ///   stockview values 3
    ///   stockview values 3 --sort date --order desc
    Values(ValuesArgs),

    /// Export one instrument's value records.
    ///
    /// Prints the `data:` URI, or writes the JSON payload to `--output`.
    ///
    /// # Examples
    ///
    ///   stockview export 3
    ///   stockview export 3 --output values.json
    Export(ExportArgs),

    /// Interactive session reading commands from stdin.
    ///
    /// Plain lines update the (debounced) search term. Commands:
    /// `:select ID`, `:unselect ID`, `:sort CRITERIA [asc|desc]`,
    /// `:sort-values CRITERIA [asc|desc]`, `:export`, `:show`, `:quit`.
    /// Start a line with `::` to search for text beginning with a colon.
    /// A search typed just before end of input is still applied.
    ///
    /// # Examples
    ///
    ///   printf 'bank\n:select 3\n' | stockview --mock browse
    Browse,
}

#[derive(Debug, Args)]
pub struct StocksArgs {
    /// Case-insensitive search over stock, industry, sector and currency code.
    #[arg(long)]
    pub search: Option<String>,

    /// Sort criteria. A sector sort reorders the full list, not the search result.
    #[arg(long, value_enum)]
    pub sort: Option<InstrumentSortArg>,

    #[arg(long, value_enum, default_value_t = OrderArg::Asc)]
    pub order: OrderArg,
}

#[derive(Debug, Args)]
pub struct ValuesArgs {
    /// Instrument id.
    pub stock_id: i64,

    #[arg(long, value_enum)]
    pub sort: Option<ValueSortArg>,

    #[arg(long, value_enum, default_value_t = OrderArg::Asc)]
    pub order: OrderArg,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Instrument id.
    pub stock_id: i64,

    /// Write the decoded JSON payload to this file instead of printing the URI.
    #[arg(long)]
    pub output: Option<String>,
}
