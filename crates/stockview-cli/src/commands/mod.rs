mod browse;
mod export;
mod stocks;
mod values;

use serde_json::{json, Value};
use stockview_core::{
    BackendSource, DataSource, InstrumentId, SelectionState, StaticSource, StockviewConfig,
    ViewState,
};
use tracing::warn;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub load_failed: bool,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            load_failed: false,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_load_failed(mut self, load_failed: bool) -> Self {
        self.load_failed = load_failed;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let config = resolve_config(cli)?;
    let source: Box<dyn DataSource> = if cli.mock {
        Box::new(StaticSource::sample())
    } else {
        Box::new(BackendSource::new(&config))
    };

    execute(cli, &config, source.as_ref()).await
}

async fn execute(
    cli: &Cli,
    config: &StockviewConfig,
    source: &dyn DataSource,
) -> Result<CommandResult, CliError> {
    let mut view = ViewState::load(source, config.selection_scope).await?;
    let report = view.load_report();
    let load_failed = report.has_failures();
    let warnings = report
        .failures()
        .into_iter()
        .map(|(collection, error)| format!("failed to load {collection}: {error}"))
        .collect::<Vec<_>>();

    let dispatched = match &cli.command {
        Command::Stocks(args) => stocks::run(args, &mut view),
        Command::Values(args) => values::run(args, &mut view),
        Command::Export(args) => export::run(args, &mut view),
        Command::Browse => browse::run(&mut view, config.search_debounce).await,
    };

    let result = match dispatched {
        Ok(result) => result,
        // A lookup miss after a failed load is a consequence of the load failure.
        Err(CliError::Command(message)) if load_failed => {
            warn!(%message, "command could not complete after load failure");
            CommandResult::ok(json!({ "error": message }))
        }
        Err(error) => return Err(error),
    };

    Ok(result
        .with_warnings(warnings)
        .with_load_failed(load_failed))
}

fn resolve_config(cli: &Cli) -> Result<StockviewConfig, CliError> {
    let mut config = StockviewConfig::from_env()?;
    if let Some(url) = &cli.backend_url {
        config = config.with_backend_url(url)?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    Ok(config)
}

/// Select `id`, failing when it is not part of the current projection.
fn select_instrument(view: &mut ViewState, id: InstrumentId) -> Result<(), CliError> {
    match view.toggle_selection(id, true)? {
        SelectionState::OneSelected(_) => Ok(()),
        SelectionState::NoSelection => Err(CliError::Command(format!(
            "instrument {id} is not in the loaded list"
        ))),
    }
}
