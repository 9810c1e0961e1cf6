//! RateLab CLI — generate and inspect the competitive rate series.
//!
//! Commands:
//! - `series` — generate the daily multi-channel series for a window and
//!   print it as a table or JSON
//! - `analyze` — generate the series, then report the competitive position
//!   of the direct channel for one date

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ratelab_core::{
    analyze, generate, ChannelCatalog, ChannelId, DateRange, GeneratorProfile,
    MarketComparison, PricePoint, SeriesSeed, VisibilitySelection,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ratelab",
    about = "RateLab CLI — synthetic competitive rate series and positioning"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the rate series for a date window.
    Series {
        /// Window start (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Window end (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Master seed; the same seed and window replay the same series.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Channel catalog TOML file. Defaults to the built-in sample catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Emit the full series as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyze the direct channel's position for one date in the window.
    Analyze {
        /// Window start (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Window end (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Date to analyze (YYYY-MM-DD). Defaults to the window end.
        #[arg(long)]
        date: Option<String>,

        /// Master seed; the same seed and window replay the same series.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Channel catalog TOML file. Defaults to the built-in sample catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Hide a competitor channel id (repeatable).
        #[arg(long)]
        hide: Vec<String>,

        /// Show only these competitor channel ids (repeatable).
        #[arg(long, conflicts_with = "hide")]
        only: Vec<String>,

        /// Emit the snapshot as JSON instead of a report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Series {
            start,
            end,
            seed,
            catalog,
            json,
        } => run_series(start, end, seed, catalog, json),
        Commands::Analyze {
            start,
            end,
            date,
            seed,
            catalog,
            hide,
            only,
            json,
        } => run_analyze(start, end, date, seed, catalog, hide, only, json),
    }
}

fn run_series(
    start: Option<String>,
    end: Option<String>,
    seed: u64,
    catalog_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let range = parse_range(start, end)?;
    let catalog = load_catalog(catalog_path)?;
    let series = generate(&range, &catalog, &GeneratorProfile::default(), SeriesSeed::new(seed));

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    print_series_table(&series, &catalog);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_analyze(
    start: Option<String>,
    end: Option<String>,
    date: Option<String>,
    seed: u64,
    catalog_path: Option<PathBuf>,
    hide: Vec<String>,
    only: Vec<String>,
    json: bool,
) -> Result<()> {
    let range = parse_range(start, end)?;
    let catalog = load_catalog(catalog_path)?;
    let target = match date {
        Some(ref raw) => parse_date(raw)?,
        None => range.end(),
    };

    let series = generate(&range, &catalog, &GeneratorProfile::default(), SeriesSeed::new(seed));
    let point = series
        .iter()
        .find(|p| p.date == target)
        .with_context(|| format!("{target} is outside the window {}..{}", range.start(), range.end()))?;

    let selection = build_selection(&catalog, &hide, &only)?;
    let snapshot = analyze(point, &selection, &catalog)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let self_channel = catalog.self_channel();
    let self_price = point
        .price(&self_channel.id)
        .expect("generated point prices every catalog channel");

    println!("Positioning for {} on {}", self_channel.display_name, snapshot.date);
    if !point.events.is_empty() {
        println!("  events:     {}", point.events.join(", "));
    }
    println!("  price:      {self_price}");
    println!(
        "  rank:       {} of {} visible channels",
        snapshot.rank, snapshot.total_visible
    );
    println!("  band:       {}", snapshot.percentile_band);
    println!("  tag:        {}", snapshot.classification);
    match snapshot.comparison {
        MarketComparison::Relative {
            market_average,
            price_delta,
            price_delta_percent,
        } => {
            println!("  market avg: {market_average:.2}");
            println!("  delta:      {price_delta:+.2} ({price_delta_percent:+.1}%)");
        }
        MarketComparison::NotApplicable => {
            println!("  market avg: n/a (no competitors visible)");
        }
    }
    if snapshot.threats.is_empty() {
        println!("  threats:    none");
    } else {
        println!("  threats:");
        for threat in &snapshot.threats {
            println!(
                "    {} at {} (undercuts by {})",
                threat.display_name, threat.price, threat.undercut
            );
        }
    }
    Ok(())
}

/// Both bounds are required; a missing one is the dashboard's loading state,
/// so the CLI refuses to generate rather than inventing a default window.
fn parse_range(start: Option<String>, end: Option<String>) -> Result<DateRange> {
    let start = start.as_deref().map(parse_date).transpose()?;
    let end = end.as_deref().map(parse_date).transpose()?;
    DateRange::from_bounds(start, end).map_err(Into::into)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

fn load_catalog(path: Option<PathBuf>) -> Result<ChannelCatalog> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading catalog file {}", path.display()))?;
            ChannelCatalog::from_toml_str(&raw)
                .with_context(|| format!("parsing catalog file {}", path.display()))
        }
        None => Ok(ChannelCatalog::sample()),
    }
}

fn build_selection(
    catalog: &ChannelCatalog,
    hide: &[String],
    only: &[String],
) -> Result<VisibilitySelection> {
    if !only.is_empty() {
        let mut selection = VisibilitySelection::none(catalog);
        for raw in only {
            let id = known_competitor(catalog, raw)?;
            selection.toggle(&id);
        }
        return Ok(selection);
    }

    let mut selection = VisibilitySelection::from_catalog(catalog);
    for raw in hide {
        let id = known_competitor(catalog, raw)?;
        if selection.is_visible(&id) {
            selection.toggle(&id);
        }
    }
    Ok(selection)
}

/// The selector itself treats unknown ids as no-ops; at the CLI boundary a
/// typo should fail loudly instead of silently analyzing the wrong set.
fn known_competitor(catalog: &ChannelCatalog, raw: &str) -> Result<ChannelId> {
    let id = ChannelId::new(raw);
    if !catalog.is_competitor(&id) {
        bail!(
            "unknown competitor id '{raw}' (known: {})",
            catalog
                .competitors()
                .iter()
                .map(|c| c.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(id)
}

fn print_series_table(series: &[PricePoint], catalog: &ChannelCatalog) {
    let ids: Vec<_> = catalog.channels().map(|c| c.id.clone()).collect();

    print!("{:<12} {:>4}", "date", "occ%");
    for id in &ids {
        print!(" {:>10}", id.as_str());
    }
    println!(" events");

    for point in series {
        print!("{:<12} {:>4}", point.date.to_string(), point.occupancy_estimate);
        for id in &ids {
            match point.price(id) {
                Some(price) => print!(" {price:>10}"),
                None => print!(" {:>10}", "-"),
            }
        }
        println!(" {}", point.events.join(", "));
    }
}
