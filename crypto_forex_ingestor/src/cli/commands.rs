use clap::{Parser, Subcommand};

/// Historical crypto and forex bar acquisition into InfluxDB.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the full instrument catalog over a date span
    Fetch {
        /// Start date in yyyy-mm-dd (inclusive)
        #[arg(long)]
        start: String,

        /// End date in yyyy-mm-dd (exclusive)
        #[arg(long)]
        end: String,

        /// Bar size multiplier
        #[arg(long, default_value_t = 1)]
        multiplier: u32,

        /// Bar size unit: minute, hour, day, week, month, quarter, year
        #[arg(long, default_value = "minute")]
        unit: String,

        /// Catalog TOML overriding the built-in instrument lists
        #[arg(long)]
        catalog: Option<String>,

        /// Directory for fetch artifacts
        #[arg(long, default_value = "crypto_forex_data")]
        out_dir: String,

        /// Seconds between successive instrument requests
        #[arg(long, default_value_t = 30)]
        pacing_secs: u64,
    },

    /// Fetch one whole-market daily OHLC snapshot
    GroupedDaily {
        /// Market: "crypto" or "fx"
        #[arg(long)]
        market: String,

        /// Snapshot date in yyyy-mm-dd
        #[arg(long)]
        date: String,

        /// Directory for the snapshot file
        #[arg(long, default_value = "crypto_forex_data")]
        out_dir: String,
    },

    /// Convert fetch artifacts to line-delimited records
    Normalize {
        /// Artifact file, or a directory of artifacts
        #[arg(long)]
        input: String,

        /// Directory for line-delimited output
        #[arg(long, default_value = "line_separated")]
        out_dir: String,
    },

    /// Bulk-load line-delimited records into InfluxDB
    Load {
        /// Line-delimited record file
        #[arg(long)]
        input: String,

        /// InfluxDB host
        #[arg(long, default_value = "localhost")]
        host: String,

        /// InfluxDB port
        #[arg(long, default_value_t = 8086)]
        port: u16,

        /// Target database; must already exist
        #[arg(long, default_value = "crypto_forex")]
        database: String,
    },
}
