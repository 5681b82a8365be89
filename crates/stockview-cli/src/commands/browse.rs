//! Interactive session over stdin.
//!
//! Every plain line is a new search term and goes through the debouncer, so
//! only the last line of a quick burst recomputes the list. Lines starting
//! with `:` are commands and act immediately; `::` escapes a search term that
//! itself starts with a colon. Each reaction is written to stdout as one JSON
//! event per line. A term still waiting out the quiet period when input ends
//! is applied before the session closes.

use std::io::Write;
use std::time::Duration;

use serde_json::{json, Value};
use stockview_core::{InstrumentId, SearchDebouncer, SelectionState, SortOrder, ViewState};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Search(String),
    Select(InstrumentId),
    Unselect(InstrumentId),
    Sort { criteria: String, order: SortOrder },
    SortValues { criteria: String, order: SortOrder },
    Export,
    Show,
    Quit,
}

impl BrowseCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let Some(command) = line.trim_start().strip_prefix(':') else {
            return Ok(Self::Search(line.trim_end_matches(['\r', '\n']).to_owned()));
        };
        if command.starts_with(':') {
            return Ok(Self::Search(command.trim_end_matches(['\r', '\n']).to_owned()));
        }

        let mut tokens = command.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let rest: Vec<&str> = tokens.collect();

        match name {
            "select" => Ok(Self::Select(parse_id(&rest)?)),
            "unselect" => Ok(Self::Unselect(parse_id(&rest)?)),
            "sort" => {
                let (criteria, order) = parse_sort(&rest)?;
                Ok(Self::Sort { criteria, order })
            }
            "sort-values" => {
                let (criteria, order) = parse_sort(&rest)?;
                Ok(Self::SortValues { criteria, order })
            }
            "export" => Ok(Self::Export),
            "show" => Ok(Self::Show),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command ':{other}'")),
        }
    }
}

fn parse_id(tokens: &[&str]) -> Result<InstrumentId, String> {
    match tokens {
        [id] => id.parse::<InstrumentId>().map_err(|error| error.to_string()),
        _ => Err(String::from("expected exactly one instrument id")),
    }
}

/// `CRITERIA... [asc|desc]`; criteria may span several words.
fn parse_sort(tokens: &[&str]) -> Result<(String, SortOrder), String> {
    match tokens.split_last() {
        None => Err(String::from("expected sort criteria")),
        Some((last, criteria)) if !criteria.is_empty() => match last.parse::<SortOrder>() {
            Ok(order) => Ok((criteria.join(" "), order)),
            Err(_) => Ok((tokens.join(" "), SortOrder::Asc)),
        },
        Some(_) => Ok((tokens.join(" "), SortOrder::Asc)),
    }
}

pub async fn run(view: &mut ViewState, debounce: Duration) -> Result<CommandResult, CliError> {
    let input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    session(view, debounce, input, &mut out).await?;
    Ok(CommandResult::ok(snapshot(view)))
}

async fn session<R, W>(
    view: &mut ViewState,
    debounce: Duration,
    input: R,
    out: &mut W,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (debouncer, mut settled) = SearchDebouncer::spawn(debounce);
    let mut lines = input.lines();
    // Last term pushed that has not come back settled yet.
    let mut pending: Option<String> = None;

    emit(out, "ready", snapshot(view))?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    if let Some(term) = pending.take() {
                        view.apply_search_term(&term);
                        emit(out, "projection", projection(view))?;
                    }
                    break;
                };
                match BrowseCommand::parse(&line) {
                    Ok(BrowseCommand::Quit) => break,
                    Ok(BrowseCommand::Search(term)) => {
                        pending = Some(term.clone());
                        if !debouncer.push(term) {
                            break;
                        }
                    }
                    Ok(command) => handle(view, command, out)?,
                    Err(message) => emit(out, "error", json!({ "message": message }))?,
                }
            }
            Some(term) = settled.recv() => {
                if pending.as_deref() == Some(term.as_str()) {
                    pending = None;
                }
                view.apply_search_term(&term);
                emit(out, "projection", projection(view))?;
            }
        }
    }

    drop(debouncer);
    debug!("browse session closed");
    Ok(())
}

fn handle<W: Write>(view: &mut ViewState, command: BrowseCommand, out: &mut W) -> Result<(), CliError> {
    match command {
        BrowseCommand::Select(id) => {
            let state = view.toggle_selection(id, true)?;
            emit(out, "selection", selection(view, state))
        }
        BrowseCommand::Unselect(id) => {
            let state = view.toggle_selection(id, false)?;
            emit(out, "selection", selection(view, state))
        }
        BrowseCommand::Sort { criteria, order } => {
            if view.sort_instruments_by_name(&criteria, order) {
                emit(out, "projection", projection(view))
            } else {
                emit(out, "ignored", json!({ "sort": criteria }))
            }
        }
        BrowseCommand::SortValues { criteria, order } => {
            if view.sort_value_records_by_name(&criteria, order)? {
                emit(out, "values", json!({ "values": view.filtered_value_records() }))
            } else {
                emit(out, "ignored", json!({ "sort-values": criteria }))
            }
        }
        BrowseCommand::Export => {
            let uri = view.export_uri().map(|uri| uri.as_str());
            emit(out, "export", json!({ "uri": uri }))
        }
        BrowseCommand::Show => emit(out, "state", snapshot(view)),
        // Handled by the session loop.
        BrowseCommand::Search(_) | BrowseCommand::Quit => Ok(()),
    }
}

fn projection(view: &ViewState) -> Value {
    json!({
        "search": view.search_term(),
        "count": view.filtered_instruments().len(),
        "instruments": view.filtered_instruments(),
    })
}

fn selection(view: &ViewState, state: SelectionState) -> Value {
    let selected = match state {
        SelectionState::OneSelected(id) => Some(id),
        SelectionState::NoSelection => None,
    };
    json!({
        "selected": selected,
        "instrument": view.selected_instrument(),
        "values": view.filtered_value_records(),
    })
}

fn snapshot(view: &ViewState) -> Value {
    json!({
        "search": view.search_term(),
        "instruments": view.instruments().len(),
        "shown": view.filtered_instruments().len(),
        "value_records": view.value_records().len(),
        "selected": view.selected_instrument().map(|instrument| instrument.id),
    })
}

fn emit<W: Write>(out: &mut W, event: &str, data: Value) -> Result<(), CliError> {
    let line = serde_json::to_string(&json!({ "event": event, "data": data }))?;
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}
