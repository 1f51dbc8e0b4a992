use demandlab_core::{range_for_key, AnalysisConfig, PanelKey, SliderRange};
use serde::Serialize;
use tracing::warn;

use crate::cli::ProductArgs;
use crate::error::CliError;

use super::{CommandResult, Panel};

#[derive(Debug, Serialize)]
struct RangeResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<PanelKey>,
    range: SliderRange,
}

/// Slider range for a selection. A selection that cannot name a product is
/// treated like an unknown one and gets the fallback range.
pub fn run(
    args: &ProductArgs,
    panel: &Panel,
    config: &AnalysisConfig,
) -> Result<CommandResult, CliError> {
    let (key, range, warning) =
        match PanelKey::parse(&config.city, &args.brand, &args.container) {
            Ok(key) => {
                let range = range_for_key(&panel.store, &key, config);
                let warning = range
                    .fallback
                    .then(|| format!("no usable prices for {key}; serving fallback range"));
                (Some(key), range, warning)
            }
            Err(error) => {
                warn!(%error, "invalid selection; serving fallback slider range");
                let warning = format!("invalid selection ({error}); serving fallback range");
                (None, SliderRange::fallback(config), Some(warning))
            }
        };

    let data = serde_json::to_value(RangeResponseData { key, range })?;
    let result = CommandResult::ok(data);
    Ok(match warning {
        Some(warning) => result.with_warning(warning),
        None => result,
    })
}
