mod catalog;
mod cross_price;
mod own_price;
mod preview;
pub mod quiz;
mod range;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use demandlab_core::{
    resolve_panel_path, AnalysisConfig, AnalysisError, Envelope, EnvelopeError, EnvelopeMeta,
    ElasticityResult, GroupedPanelStore, PanelRow,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

const SCHEMA_VERSION: &str = "v1.0.0";

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// A computation that failed inside the engine. The session carries on;
    /// the failure is reported in the envelope.
    pub fn failed(error: &AnalysisError) -> Self {
        Self {
            data: Value::Null,
            warnings: Vec::new(),
            errors: vec![EnvelopeError::from(error)],
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Raw rows and their grouped store, loaded once per invocation.
pub struct Panel {
    pub path: PathBuf,
    pub rows: Vec<PanelRow>,
    pub store: GroupedPanelStore,
}

impl Panel {
    pub fn load(path: PathBuf) -> Result<Self, CliError> {
        let json = fs::read_to_string(&path).map_err(|error| {
            CliError::Command(format!(
                "cannot read panel file {}: {error}",
                path.display()
            ))
        })?;

        let rows = demandlab_core::parse_panel_rows(&json).map_err(|source| CliError::Panel {
            path: path.clone(),
            source,
        })?;
        let store = GroupedPanelStore::from_rows(rows.iter().cloned()).map_err(|error| {
            CliError::Panel {
                path: path.clone(),
                source: error.into(),
            }
        })?;

        debug!(path = %path.display(), rows = rows.len(), "loaded panel");
        Ok(Self { path, rows, store })
    }
}

/// Display-ready rendering of an [`ElasticityResult`].
#[derive(Debug, Serialize)]
struct ResultSummary {
    elasticity: String,
    regime: &'static str,
    predicted_quantity: String,
    analysis_price: String,
    interpretation: &'static str,
}

impl From<&ElasticityResult> for ResultSummary {
    fn from(result: &ElasticityResult) -> Self {
        Self {
            elasticity: result.elasticity_display(),
            regime: result.regime.label(),
            predicted_quantity: result.predicted_quantity_display(),
            analysis_price: result.analysis_price_display(),
            interpretation: result.interpretation(),
        }
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let panel = Panel::load(cli.panel.clone().unwrap_or_else(resolve_panel_path))?;
    let config = AnalysisConfig::default().with_city(&cli.city);

    let command_result = match &cli.command {
        Command::Catalog => catalog::run(&panel, &config)?,
        Command::Preview(args) => preview::run(args, &panel)?,
        Command::Range(args) => range::run(args, &panel, &config)?,
        Command::Own(args) => own_price::run(args, &panel, &config)?,
        Command::Cross(args) => cross_price::run(args, &panel, &config)?,
        Command::Quiz => {
            return Err(CliError::Command(String::from(
                "quiz runs as an interactive session",
            )))
        }
    };

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), SCHEMA_VERSION, latency_ms)?
        .with_dataset(panel.path.display().to_string());

    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    /// Athens panel: "cola/plastic" follows Q = 40 - 10p exactly, "soda/glass"
    /// shares its dates, "flat/can" never changes price.
    fn write_panel() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("panel.json");

        let mut rows = Vec::new();
        for (month, (price, soda_price)) in [(1.0, 2.0), (2.0, 1.0), (3.0, 3.0), (4.0, 2.5)]
            .into_iter()
            .enumerate()
        {
            let date = format!("2019-0{}-28", month + 1);
            rows.push(serde_json::json!({
                "date": date, "city": "Athens", "brand": "cola", "container": "plastic",
                "price": price, "quantity": 40.0 - 10.0 * price,
            }));
            rows.push(serde_json::json!({
                "date": date, "city": "Athens", "brand": "soda", "container": "glass",
                "price": soda_price, "quantity": 12.0,
            }));
            rows.push(serde_json::json!({
                "date": date, "city": "Athens", "brand": "flat", "container": "can",
                "price": 1.5, "quantity": 7.0 + month as f64,
            }));
        }

        fs::write(&path, serde_json::to_string(&rows).expect("json")).expect("write panel");
        (dir, path)
    }

    fn run_args(path: &std::path::Path, args: &[&str]) -> Envelope<Value> {
        let mut argv = vec!["demandlab", "--panel", path.to_str().expect("utf8 path")];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).expect("args parse");
        run(&cli).expect("command runs")
    }

    #[test]
    fn catalog_lists_distinct_selections() {
        let (_dir, path) = write_panel();
        let envelope = run_args(&path, &["catalog"]);

        assert_eq!(envelope.data["brands"], serde_json::json!(["cola", "flat", "soda"]));
        assert_eq!(envelope.data["group_count"], 3);
        assert_eq!(envelope.data["row_count"], 12);
        assert!(envelope.meta.dataset.is_some());
    }

    #[test]
    fn preview_honours_limit() {
        let (_dir, path) = write_panel();
        let envelope = run_args(&path, &["preview", "--limit", "2"]);

        assert_eq!(envelope.data["rows"].as_array().map(Vec::len), Some(2));
        assert_eq!(envelope.data["total_rows"], 12);
    }

    #[test]
    fn own_price_reports_inelastic_point() {
        let (_dir, path) = write_panel();
        let envelope = run_args(
            &path,
            &["own", "--brand", "cola", "--container", "plastic", "--price", "1.5"],
        );

        assert!(envelope.errors.is_empty());
        assert_eq!(envelope.data["summary"]["elasticity"], "-0.600");
        assert_eq!(envelope.data["summary"]["predicted_quantity"], "25");
        assert_eq!(envelope.data["analysis"]["result"]["regime"], "inelastic");
    }

    #[test]
    fn constant_price_is_reported_not_raised() {
        let (_dir, path) = write_panel();
        let envelope = run_args(
            &path,
            &["own", "--brand", "flat", "--container", "can", "--price", "1.5"],
        );

        assert_eq!(envelope.data, Value::Null);
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].code, "fit.degenerate");
        assert!(envelope.errors[0].message.contains("insufficient variation"));
    }

    #[test]
    fn unknown_product_range_falls_back_with_warning() {
        let (_dir, path) = write_panel();
        let envelope = run_args(
            &path,
            &["range", "--brand", "gazoza", "--container", "glass"],
        );

        assert_eq!(envelope.data["range"]["fallback"], true);
        assert_eq!(envelope.data["range"]["min"], 0.5);
        assert_eq!(envelope.meta.warnings.len(), 1);
    }

    #[test]
    fn blank_brand_range_falls_back_instead_of_failing() {
        let (_dir, path) = write_panel();
        let envelope = run_args(&path, &["range", "--brand", " ", "--container", "glass"]);

        assert!(envelope.errors.is_empty());
        assert_eq!(envelope.data["range"]["fallback"], true);
        assert_eq!(envelope.data["range"]["max"], 5.0);
        assert!(envelope.data.get("key").is_none());
        assert_eq!(envelope.meta.warnings.len(), 1);
    }

    #[test]
    fn cross_price_runs_over_shared_dates() {
        let (_dir, path) = write_panel();
        let envelope = run_args(
            &path,
            &[
                "cross",
                "--brand-a",
                "cola",
                "--container-a",
                "plastic",
                "--brand-b",
                "soda",
                "--container-b",
                "glass",
                "--price",
                "2",
            ],
        );

        assert!(envelope.errors.is_empty(), "{:?}", envelope.errors);
        assert_eq!(envelope.data["analysis"]["n_obs"], 4);
        assert_eq!(envelope.data["analysis"]["mean_price_a"], 2.5);
    }

    #[test]
    fn missing_panel_file_is_a_command_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");
        let cli = Cli::try_parse_from([
            "demandlab",
            "--panel",
            path.to_str().expect("utf8 path"),
            "catalog",
        ])
        .expect("args parse");

        let err = run(&cli).err().expect("must fail");
        assert!(matches!(err, CliError::Command(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn negative_analysis_price_is_a_validation_error() {
        let (_dir, path) = write_panel();
        let cli = Cli::try_parse_from([
            "demandlab",
            "--panel",
            path.to_str().expect("utf8 path"),
            "own",
            "--brand",
            "cola",
            "--container",
            "plastic",
            "--price=-1",
        ])
        .expect("args parse");

        let err = run(&cli).err().expect("must fail");
        assert!(matches!(err, CliError::Validation(_)));
    }
}
