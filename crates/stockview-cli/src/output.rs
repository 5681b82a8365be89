use std::io::{self, Write};

use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => render_json(&mut out, result, pretty),
        OutputFormat::Table => render_table(&mut out, result),
    }
}

fn render_json<W: Write>(out: &mut W, result: &CommandResult, pretty: bool) -> Result<(), CliError> {
    let document = json!({
        "data": result.data,
        "warnings": result.warnings,
    });
    let payload = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    writeln!(out, "{payload}")?;
    Ok(())
}

fn render_table<W: Write>(out: &mut W, result: &CommandResult) -> Result<(), CliError> {
    if !result.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &result.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    if let Some(rows) = result.data.get("instruments").and_then(Value::as_array) {
        let columns = ["id", "stock", "industry", "sector", "currency_code", "selected"];
        write_rows(out, &columns, rows)?;
    } else if let Some(rows) = result.data.get("values").and_then(Value::as_array) {
        let columns = ["stock_id", "date", "value"];
        write_rows(out, &columns, rows)?;
    } else {
        for line in serde_json::to_string_pretty(&result.data)?.lines() {
            writeln!(out, "{line}")?;
        }
    }

    Ok(())
}

fn write_rows<W: Write>(out: &mut W, columns: &[&str], rows: &[Value]) -> Result<(), CliError> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|column| cell(row.get(*column))).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{column:<width$}"))
        .collect();
    writeln!(out, "{}", header.join("  ").trim_end())?;

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }

    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
