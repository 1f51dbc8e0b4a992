use demandlab_core::{
    validate_non_negative, AnalysisConfig, CatalogName, ElasticityEngine, OwnPriceAnalysis,
};
use serde::Serialize;

use crate::cli::OwnArgs;
use crate::error::CliError;

use super::{CommandResult, Panel, ResultSummary};

#[derive(Debug, Serialize)]
struct OwnPriceResponseData {
    summary: ResultSummary,
    analysis: OwnPriceAnalysis,
}

pub fn run(args: &OwnArgs, panel: &Panel, config: &AnalysisConfig) -> Result<CommandResult, CliError> {
    let brand = CatalogName::parse("brand", &args.product.brand)?;
    let container = CatalogName::parse("container", &args.product.container)?;
    validate_non_negative("price", args.price)?;

    let engine = ElasticityEngine::new(&panel.store, config);
    let analysis = match engine.own_price(&brand, &container, args.price) {
        Ok(analysis) => analysis,
        Err(error) => return Ok(CommandResult::failed(&error)),
    };

    let data = serde_json::to_value(OwnPriceResponseData {
        summary: ResultSummary::from(&analysis.result),
        analysis,
    })?;
    Ok(CommandResult::ok(data))
}
