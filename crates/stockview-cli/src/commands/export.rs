//! Export one instrument's value records as a data URI or a JSON file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::json;
use stockview_core::{InstrumentId, TrustedUri, ViewState};

use crate::cli::ExportArgs;
use crate::error::CliError;

use super::{select_instrument, CommandResult};

pub fn run(args: &ExportArgs, view: &mut ViewState) -> Result<CommandResult, CliError> {
    let id = InstrumentId::new(args.stock_id);
    select_instrument(view, id)?;

    let records = view.filtered_value_records().len();
    let uri = view
        .export_uri()
        .ok_or_else(|| CliError::Command(String::from("export uri was not generated")))?;

    let data = match &args.output {
        Some(output) => {
            write_payload(uri, Path::new(output))?;
            json!({
                "stock_id": id,
                "records": records,
                "output": output,
                "exported": true,
            })
        }
        None => json!({
            "stock_id": id,
            "records": records,
            "uri": uri,
        }),
    };

    Ok(CommandResult::ok(data))
}

fn write_payload(uri: &TrustedUri, output_path: &Path) -> Result<(), CliError> {
    let payload = uri.payload()?;
    let mut writer = BufWriter::new(File::create(output_path)?);
    writer.write_all(payload.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
