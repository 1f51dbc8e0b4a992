use demandlab_core::{
    validate_non_negative, AnalysisConfig, CatalogName, CrossPriceAnalysis, ElasticityEngine,
};
use serde::Serialize;

use crate::cli::CrossArgs;
use crate::error::CliError;

use super::{CommandResult, Panel, ResultSummary};

#[derive(Debug, Serialize)]
struct CrossPriceResponseData {
    summary: ResultSummary,
    analysis: CrossPriceAnalysis,
}

pub fn run(
    args: &CrossArgs,
    panel: &Panel,
    config: &AnalysisConfig,
) -> Result<CommandResult, CliError> {
    let brand_a = CatalogName::parse("brand", &args.brand_a)?;
    let container_a = CatalogName::parse("container", &args.container_a)?;
    let brand_b = CatalogName::parse("brand", &args.brand_b)?;
    let container_b = CatalogName::parse("container", &args.container_b)?;
    validate_non_negative("price", args.price)?;

    let engine = ElasticityEngine::new(&panel.store, config);
    let analysis =
        match engine.cross_price((&brand_a, &container_a), (&brand_b, &container_b), args.price) {
            Ok(analysis) => analysis,
            Err(error) => return Ok(CommandResult::failed(&error)),
        };

    let mut result = CommandResult::ok(serde_json::to_value(CrossPriceResponseData {
        summary: ResultSummary::from(&analysis.result),
        analysis,
    })?);
    if brand_a == brand_b && container_a == container_b {
        result = result.with_warning("products A and B are the same selection");
    }
    Ok(result)
}
