use serde::Serialize;
use stockview_core::{Instrument, InstrumentId, ValueRecord, ViewState};

use crate::cli::ValuesArgs;
use crate::error::CliError;

use super::{select_instrument, CommandResult};

#[derive(Debug, Serialize)]
struct ValuesResponseData<'a> {
    instrument: Option<&'a Instrument>,
    count: usize,
    values: &'a [ValueRecord],
}

pub fn run(args: &ValuesArgs, view: &mut ViewState) -> Result<CommandResult, CliError> {
    select_instrument(view, InstrumentId::new(args.stock_id))?;

    if let Some(sort) = args.sort {
        view.sort_value_records(sort.into(), args.order.into())?;
    }

    let values = view.filtered_value_records();
    let data = serde_json::to_value(ValuesResponseData {
        instrument: view.selected_instrument(),
        count: values.len(),
        values,
    })?;

    Ok(CommandResult::ok(data))
}
