//! # Wave Card Application Entry Point
//!
//! Fetches the zone forecast and the buoy feed, extracts the structured
//! values and prints the wave card as text (default) or JSON (`--json`).
//! Documents can be read from disk with `--forecast-file` / `--buoy-file`,
//! which is how the card is reproduced offline.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wave_card_lib::buoy::BuoyParser;
use wave_card_lib::card::WaveCard;
use wave_card_lib::config::Config;
use wave_card_lib::fetch::{read_document, FetchError, Fetcher};
use wave_card_lib::forecast::ForecastParser;
use wave_card_lib::{BuoyObservation, ForecastLine};

/// Marine wave forecast and buoy snapshot card
#[derive(Parser, Debug)]
#[command(name = "wave-card", version, about)]
struct Args {
    /// Configuration file [default: wave-config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read the forecast document from a file instead of fetching it
    #[arg(long)]
    forecast_file: Option<PathBuf>,

    /// Read the buoy document from a file instead of fetching it
    #[arg(long)]
    buoy_file: Option<PathBuf>,

    /// Print the card as JSON
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Set up structured logging on stderr; `RUST_LOG` overrides the flags.
fn setup_logging(args: &Args) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("wave_card={level},wave_card_lib={level}"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Read `file` when given, otherwise GET `url`.
async fn obtain(fetcher: &Fetcher, url: &str, file: Option<&Path>) -> Result<String, FetchError> {
    match file {
        Some(path) => read_document(path),
        None => fetcher.fetch(url).await,
    }
}

/// Forecast lines for the card. Any failure leaves the list empty so the
/// card shows its fallback line.
fn forecast_lines(config: &Config, document: Result<String, FetchError>) -> Vec<ForecastLine> {
    let document = match document {
        Ok(document) => document,
        Err(error) => {
            warn!("Forecast unavailable: {}", error);
            return Vec::new();
        }
    };

    let lines = ForecastParser::from_config(&config.forecast)
        .and_then(|parser| parser.parse_document(&document))
        .unwrap_or_else(|error| {
            warn!("Forecast not extracted: {}", error);
            Vec::new()
        });

    if lines.is_empty() {
        info!("No forecast periods recognized, using fallback text");
    }
    lines
}

/// Buoy observation for the card; all fields missing when unavailable.
fn buoy_observation(config: &Config, document: Result<String, FetchError>) -> BuoyObservation {
    match document {
        Ok(document) => BuoyParser::from_config(&config.buoy).parse(&document),
        Err(error) => {
            warn!("Buoy data unavailable: {}", error);
            BuoyObservation::missing()
        }
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(&args);

    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let fetcher = Fetcher::new(&config.fetch).context("building HTTP client")?;

    // Create Tokio runtime for the two independent fetches
    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    let (forecast_doc, buoy_doc) = rt.block_on(async {
        tokio::join!(
            obtain(&fetcher, &config.forecast.url, args.forecast_file.as_deref()),
            obtain(&fetcher, &config.buoy.url, args.buoy_file.as_deref()),
        )
    });

    let forecast = forecast_lines(&config, forecast_doc);
    let buoy = buoy_observation(&config, buoy_doc);
    let card = WaveCard::new(&config, forecast, buoy, chrono::Local::now().date_naive());

    if args.json {
        println!("{}", card.to_json().context("serializing card")?);
    } else {
        print!("{}", card.render_text());
    }
    Ok(())
}
