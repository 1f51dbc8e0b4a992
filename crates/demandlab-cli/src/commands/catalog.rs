use demandlab_core::{AnalysisConfig, CatalogName, PanelKey};
use serde::Serialize;

use crate::error::CliError;

use super::{CommandResult, Panel};

#[derive(Debug, Serialize)]
struct ProductEntry<'a> {
    #[serde(flatten)]
    key: &'a PanelKey,
    label: String,
}

#[derive(Debug, Serialize)]
struct CatalogResponseData<'a> {
    city: &'a str,
    cities: Vec<&'a CatalogName>,
    brands: Vec<&'a CatalogName>,
    containers: Vec<&'a CatalogName>,
    products: Vec<ProductEntry<'a>>,
    row_count: usize,
    group_count: usize,
}

pub fn run(panel: &Panel, config: &AnalysisConfig) -> Result<CommandResult, CliError> {
    let store = &panel.store;
    let cities = store.cities();
    let known_city = cities.iter().any(|city| city.as_str() == config.city);

    let products = store
        .catalog()
        .into_iter()
        .map(|key| ProductEntry {
            label: key.product_label(),
            key,
        })
        .collect();

    let data = serde_json::to_value(CatalogResponseData {
        city: &config.city,
        brands: store.brands(),
        containers: store.containers(),
        cities,
        products,
        row_count: store.row_count(),
        group_count: store.group_count(),
    })?;

    let result = CommandResult::ok(data);
    if known_city {
        Ok(result)
    } else {
        Ok(result.with_warning(format!(
            "city '{}' has no observations in this panel",
            config.city
        )))
    }
}
