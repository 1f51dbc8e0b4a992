//! CLI argument definitions for demandlab.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `catalog` | List known cities, brands and containers |
//! | `preview` | Show the first raw panel rows |
//! | `range` | Analysis-price slider range for a product |
//! | `own` | Own-price elasticity at an analysis price |
//! | `cross` | Cross-price elasticity of one product against another |
//! | `quiz` | Interactive investment-demand self-test over stdin |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--panel` | resolved | Panel rows file (JSON array) |
//! | `--city` | `Athens` | City every selection is scoped to |
//! | `--verbose` | `false` | Debug logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! demandlab --panel demos/panel.json catalog --pretty
//! demandlab own --brand adult-cola --container plastic --price 2.0
//! demandlab cross --brand-a adult-cola --container-a plastic \
//!     --brand-b orange-power --container-b glass --price 1.5
//! printf 'answer decrease\nnext\nsummary\nquit\n' | demandlab quiz
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Price-elasticity teaching lab
///
/// Estimate own-price and cross-price elasticities from a grouped
/// (price, quantity) panel, or take the investment-demand self-test.
#[derive(Debug, Parser)]
#[command(
    name = "demandlab",
    author,
    version,
    about = "Price-elasticity teaching lab",
    long_about = "demandlab fits ordinary least squares demand models over a \
grouped price/quantity panel and explains the resulting elasticities.\n\
\n\
Use 'demandlab <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Panel rows file.
    ///
    /// Falls back to DEMANDLAB_PANEL, then $DEMANDLAB_HOME/panel.json,
    /// then ~/.demandlab/panel.json.
    #[arg(long, global = true)]
    pub panel: Option<PathBuf>,

    /// City every product selection is scoped to.
    #[arg(long, global = true, default_value = "Athens")]
    pub city: String,

    /// Log debug diagnostics to stderr (RUST_LOG overrides).
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON envelope.
    Json,
    /// Plain key/value listing for terminals.
    Table,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the known cities, brands, containers and products.
    Catalog,

    /// Show the first raw panel rows.
    ///
    /// # Examples
    ///
    ///   demandlab preview
    ///   demandlab preview --limit 3 --format table
    Preview(PreviewArgs),

    /// Analysis-price slider range for a product.
    ///
    /// Unknown products get the fixed fallback range and a warning.
    Range(ProductArgs),

    /// Own-price elasticity at an analysis price.
    ///
    /// # Examples
    ///
    ///   demandlab own --brand gazoza --container glass --price 1.2
    Own(OwnArgs),

    /// Cross-price elasticity of product A against the price of product B.
    ///
    /// A's price is held at its mean observed value.
    Cross(CrossArgs),

    /// Interactive self-test on the factors of investment demand.
    ///
    /// Reads one command per line from stdin and writes one NDJSON
    /// event per line to stdout. Commands: show, next, prev,
    /// answer <value>, hint, progress, summary, reset, quit.
    Quiz,
}

/// Arguments for the `preview` command.
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Number of rows to show.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

/// A brand/container selection.
#[derive(Debug, Args)]
pub struct ProductArgs {
    /// Product brand (e.g., gazoza).
    #[arg(long)]
    pub brand: String,

    /// Product container (e.g., glass, plastic, can).
    #[arg(long)]
    pub container: String,
}

/// Arguments for the `own` command.
#[derive(Debug, Args)]
pub struct OwnArgs {
    #[command(flatten)]
    pub product: ProductArgs,

    /// Price at which the elasticity is evaluated.
    #[arg(long)]
    pub price: f64,
}

/// Arguments for the `cross` command.
#[derive(Debug, Args)]
pub struct CrossArgs {
    /// Brand of the product whose quantity is modelled.
    #[arg(long)]
    pub brand_a: String,

    #[arg(long)]
    pub container_a: String,

    /// Brand of the product whose price varies.
    #[arg(long)]
    pub brand_b: String,

    #[arg(long)]
    pub container_b: String,

    /// Price of product B at which the elasticity is evaluated.
    #[arg(long)]
    pub price: f64,
}
