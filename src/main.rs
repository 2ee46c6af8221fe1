mod cli;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;

use btc_price_range::app;
use btc_price_range::config::{load_config, Config};
use btc_price_range::fetch::CoinGeckoOracle;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Range { start, end } => run_range(&config, start, end).await?,
        Commands::Price { date } => run_price(&config, date).await?,
        Commands::Dataset {
            dataset,
            file,
            rows,
            limit,
            export,
        } => run_dataset(&config, dataset, file, rows, limit, export.as_deref())?,
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::builtin(),
    };

    if let Some(pacing) = cli.pacing {
        config.pacing.strategy = pacing.into();
    }

    Ok(config)
}

fn read_or_prompt<R: BufRead, W: Write>(
    value: Option<String>,
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(app::prompt(input, output, label)?),
    }
}

async fn run_range(config: &Config, start: Option<String>, end: Option<String>) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    if start.is_none() || end.is_none() {
        cli::show_banner(&config.pacing);
    }

    let start = read_or_prompt(start, &mut input, &mut output, "Start date (YYYY-MM-DD): ")?;
    let end = read_or_prompt(end, &mut input, &mut output, "End date (YYYY-MM-DD): ")?;

    let outcome = app::fetch_btc_range(config, &start, &end)
        .await
        .context("Failed to prepare price fetch")?;

    println!("{}", app::render_range_report(&start, &end, &outcome)?);
    Ok(())
}

async fn run_price(config: &Config, date: Option<String>) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let date = read_or_prompt(
        date,
        &mut input,
        &mut output,
        "Date to look up the Bitcoin price for (YYYY-MM-DD): ",
    )?;

    let oracle = CoinGeckoOracle::connect(&config.oracle)?;
    let outcome = app::lookup_price(&oracle, &date).await;

    println!("{}", app::render_price_report(&date, &outcome));
    Ok(())
}

fn run_dataset(
    config: &Config,
    dataset: Option<String>,
    file: Option<String>,
    rows: Option<usize>,
    limit: Option<usize>,
    export: Option<&std::path::Path>,
) -> Result<()> {
    let handle = dataset.unwrap_or_else(|| config.dataset.dataset.clone());
    let file = file.unwrap_or_else(|| config.dataset.file.clone());
    let rows = rows.unwrap_or(config.dataset.preview_rows);

    let table = app::load_dataset(config, &handle, &file, limit)
        .with_context(|| format!("Failed to load dataset {handle}"))?;

    if let Some(path) = export {
        table.write_csv(path)?;
        println!("Saved {} records to {}", table.len(), path.display());
    }

    println!("{}", app::render_table_preview(&table, rows));
    Ok(())
}
