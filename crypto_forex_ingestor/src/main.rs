use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use secrecy::SecretString;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crypto_forex_ingestor::cli::commands::{Cli, Commands};
use crypto_forex_ingestor::errors::Error;
use crypto_forex_ingestor::fetch::fleet::{FleetParams, Pacing, run_fleet};
use crypto_forex_ingestor::io::influx::{InfluxConfig, InfluxSink};
use crypto_forex_ingestor::io::load::{BATCH_SIZE, load_records};
use crypto_forex_ingestor::io::{artifact, normalize};
use crypto_forex_ingestor::models::catalog::InstrumentCatalog;
use crypto_forex_ingestor::models::instrument::Market;
use crypto_forex_ingestor::models::timespan::Timespan;
use crypto_forex_ingestor::providers::polygon_rest::PolygonProvider;
use crypto_forex_ingestor::utils::env::env_var_opt;

fn parse_date(value: &str) -> Result<NaiveDate, Error> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("invalid date {value:?}, expected yyyy-mm-dd")))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch {
            start,
            end,
            multiplier,
            unit,
            catalog,
            out_dir,
            pacing_secs,
        } => {
            let params = FleetParams {
                start: parse_date(&start)?,
                end: parse_date(&end)?,
                multiplier,
                timespan: unit.parse::<Timespan>()?,
                adjusted: true,
            };
            let catalog = match catalog {
                Some(path) => InstrumentCatalog::from_toml_file(Path::new(&path))?,
                None => InstrumentCatalog::default(),
            };
            let provider = PolygonProvider::new()?;
            let pacing = Pacing::new(Duration::from_secs(pacing_secs));

            let report = run_fleet(&provider, &catalog, &params, Path::new(&out_dir), &pacing).await;
            if !report.failed.is_empty() {
                warn!(failed = ?report.failed, "some instruments failed");
            }
        }

        Commands::GroupedDaily {
            market,
            date,
            out_dir,
        } => {
            let market = market.parse::<Market>().map_err(|e| Error::Config(e.to_string()))?;
            let date = parse_date(&date)?;
            let provider = PolygonProvider::new()?;
            let snapshot = provider.fetch_grouped_daily(market, date, true).await?;
            let path = artifact::write_snapshot(Path::new(&out_dir), market, date, &snapshot)?;
            info!(path = %path.display(), "grouped daily snapshot saved");
        }

        Commands::Normalize { input, out_dir } => {
            let input = Path::new(&input);
            let out_dir = Path::new(&out_dir);
            if input.is_dir() {
                let converted = normalize::convert_dir(input, out_dir)?;
                info!(files = converted, "normalization finished");
            } else {
                let (path, records) = normalize::convert_artifact(input, out_dir)?;
                info!(path = %path.display(), records, "normalization finished");
            }
        }

        Commands::Load {
            input,
            host,
            port,
            database,
        } => {
            let reader = BufReader::new(File::open(&input)?);
            let sink = InfluxSink::new(InfluxConfig {
                host,
                port,
                database,
                username: env_var_opt("INFLUX_USERNAME"),
                password: env_var_opt("INFLUX_PASSWORD").map(|p| SecretString::new(p.into())),
            });
            let written = load_records(reader, &sink, BATCH_SIZE).await?;
            info!(written, file = %input, "load finished");
        }
    }
    Ok(())
}
