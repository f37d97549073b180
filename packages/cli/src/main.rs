#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the county atlas dashboard.
//!
//! Loads county boundaries (a `GeoJSON` file, a URL, or generated sample
//! boundaries), synthesizes statistics, and prints map or trend views for a
//! selection. Boundaries and statistics can also be exported to disk.

mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use county_atlas_dashboard::{DashboardConfig, DashboardController, DirectorySink};
use county_atlas_dashboard_models::view::DashboardView;
use county_atlas_dashboard_models::{RawSelection, Scope, ViewMode};
use county_atlas_geography::{BoundarySource, fetch, sample};

#[derive(Parser)]
#[command(name = "county_atlas", about = "US county statistics dashboard")]
struct Cli {
    /// Dashboard config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Boundary `GeoJSON` file or http(s) URL; overrides the config
    #[arg(long, global = true)]
    boundaries: Option<String>,

    /// Number of generated sample counties when no boundaries are given
    #[arg(long, global = true, default_value_t = sample::US_COUNTY_COUNT)]
    sample_counties: usize,

    /// Generator seed; overrides the config
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print what was loaded
    Summary,
    /// Render a choropleth snapshot
    Map {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Snapshot period index (defaults to the latest)
        #[arg(long)]
        time_index: Option<usize>,

        /// Number of top counties to list
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Write the styled map as `GeoJSON` to this file
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// Render time series
    Trend {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the chart as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write statistics CSV and boundaries `GeoJSON` to a directory
    Export {
        /// Output directory
        #[arg(long, default_value = "data/export")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct SelectionArgs {
    /// State name, or "all"
    #[arg(long, default_value = Scope::ALL_STATES_LABEL)]
    state: String,

    /// County name, or "all"
    #[arg(long, default_value = Scope::ALL_COUNTIES_LABEL)]
    county: String,

    /// Metric: `population`, `gdp_millions`, `unemployment_rate`, or `median_income`
    #[arg(long, default_value = "population")]
    metric: String,
}

impl SelectionArgs {
    fn raw(&self, time_index: usize) -> RawSelection {
        RawSelection {
            state: self.state.clone(),
            county: self.county.clone(),
            metric: self.metric.clone(),
            time_index,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    let seed = cli.seed.unwrap_or(config.statistics.seed);
    let source = resolve_source(&cli, &config).await?;

    let mut controller = DashboardController::new(config);
    controller.load(&source, seed)?;

    match cli.command {
        Commands::Summary => output::print_summary(&controller)?,
        Commands::Map {
            selection,
            time_index,
            top,
            geojson,
        } => {
            let latest = controller.statistics()?.dates().len().saturating_sub(1);
            let view = controller.apply_raw(&selection.raw(time_index.unwrap_or(latest)))?;
            match view {
                DashboardView::Map(map) => {
                    output::print_map(map, top);
                    if let Some(path) = geojson {
                        std::fs::write(&path, serde_json::to_string(&map.to_geojson())?)?;
                        log::info!("Wrote styled map to {}", path.display());
                    }
                }
                other => output::print_view(other),
            }
        }
        Commands::Trend { selection, json } => {
            controller.set_view_mode(ViewMode::Trends)?;
            let latest = controller.statistics()?.dates().len().saturating_sub(1);
            let view = controller.apply_raw(&selection.raw(latest))?;
            match view {
                DashboardView::Trend(chart) if json => {
                    println!("{}", serde_json::to_string_pretty(chart)?);
                }
                other => output::print_view(other),
            }
        }
        Commands::Export { out } => {
            let mut sink = DirectorySink::new(&out);
            controller.shutdown(Some(&mut sink))?;
            println!("Exported to {}", out.display());
            return Ok(());
        }
    }

    controller.shutdown(None)?;
    Ok(())
}

/// Picks the boundary source: the `--boundaries` flag, then the config,
/// then generated sample boundaries.
async fn resolve_source(
    cli: &Cli,
    config: &DashboardConfig,
) -> Result<BoundarySource, Box<dyn std::error::Error>> {
    let url = match &cli.boundaries {
        Some(arg) if is_url(arg) => Some(arg.clone()),
        Some(path) => return Ok(BoundarySource::File(PathBuf::from(path))),
        None => config.boundaries.url.clone(),
    };

    if let Some(url) = url {
        let client = fetch::build_client()?;
        let text = fetch::fetch_geojson(&client, &url).await?;
        return Ok(BoundarySource::Text(text));
    }

    if let Some(path) = &config.boundaries.path {
        return Ok(BoundarySource::File(path.clone()));
    }

    log::info!(
        "No boundaries configured, generating {} sample counties",
        cli.sample_counties
    );
    Ok(BoundarySource::Text(
        sample::sample_feature_collection(cli.sample_counties).to_string(),
    ))
}

fn is_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
