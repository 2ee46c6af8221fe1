use std::path::PathBuf;

use btc_price_range::config::{PacingConfig, PacingStrategy};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "btc-price")]
#[command(about = "Fetch historical Bitcoin prices and load the tweet sentiment dataset")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional JSON config overriding the builtin defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Request pacing strategy for range fetches
    #[arg(long, global = true, value_enum)]
    pub pacing: Option<PacingArg>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch daily prices for a short date range (prompts for missing dates)
    Range {
        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,
    },

    /// Look up the price on a single day
    Price {
        /// Date as YYYY-MM-DD
        date: Option<String>,
    },

    /// Load the sentiment dataset from the local mirror and preview it
    Dataset {
        /// Dataset handle as owner/slug
        #[arg(short, long)]
        dataset: Option<String>,

        #[arg(short, long)]
        file: Option<String>,

        /// Number of records to print
        #[arg(short, long)]
        rows: Option<usize>,

        /// Read at most this many records
        #[arg(long)]
        limit: Option<usize>,

        /// Write the loaded records to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PacingArg {
    Block,
    Quota,
}

impl From<PacingArg> for PacingStrategy {
    fn from(arg: PacingArg) -> Self {
        match arg {
            PacingArg::Block => PacingStrategy::Block,
            PacingArg::Quota => PacingStrategy::Quota,
        }
    }
}

pub fn show_banner(pacing: &PacingConfig) {
    println!("# ------------------------------------------------------------------------ #");
    println!("# Bitcoin Historical Price Fetcher");
    println!("# Data: CoinGecko /coins/bitcoin/history");
    println!("#");
    println!(
        "# Executing date: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    );
    println!("#");
    println!(
        "# Ranges cover at most {} days; requests go out in blocks of {} every {:.0}s.",
        pacing.max_span_days.saturating_add(1),
        pacing.block_size,
        pacing.pause.as_secs_f64()
    );
    println!("# ------------------------------------------------------------------------ #");
    println!();
}
