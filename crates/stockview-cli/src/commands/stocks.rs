use serde::Serialize;
use stockview_core::{SelectableInstrument, ViewState};

use crate::cli::StocksArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct StocksResponseData<'a> {
    search: &'a str,
    count: usize,
    instruments: &'a [SelectableInstrument],
}

pub fn run(args: &StocksArgs, view: &mut ViewState) -> Result<CommandResult, CliError> {
    if let Some(term) = &args.search {
        view.apply_search_term(term);
    }

    if let Some(sort) = args.sort {
        view.sort_instruments(sort.into(), args.order.into());
    }

    let instruments = view.filtered_instruments();
    let data = serde_json::to_value(StocksResponseData {
        search: view.search_term(),
        count: instruments.len(),
        instruments,
    })?;

    Ok(CommandResult::ok(data))
}
