use demandlab_core::PanelRow;
use serde::Serialize;

use crate::cli::PreviewArgs;
use crate::error::CliError;

use super::{CommandResult, Panel};

#[derive(Debug, Serialize)]
struct PreviewResponseData<'a> {
    rows: &'a [PanelRow],
    total_rows: usize,
}

pub fn run(args: &PreviewArgs, panel: &Panel) -> Result<CommandResult, CliError> {
    let shown = args.limit.min(panel.rows.len());
    let data = serde_json::to_value(PreviewResponseData {
        rows: &panel.rows[..shown],
        total_rows: panel.rows.len(),
    })?;

    Ok(CommandResult::ok(data))
}
