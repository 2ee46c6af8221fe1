//! Boundary layer between the terminal and the fetch pipeline.

use std::io::{BufRead, Write};

use log::warn;

use crate::config::Config;
use crate::dataset::{DatasetProvider, DatasetRef, LocalDatasetStore, Table};
use crate::domain::{DateKey, PriceMap, PriceQuote};
use crate::error::{Context, RangeError, Result};
use crate::fetch::{CoinGeckoOracle, PriceOracle, RangePriceFetcher};

/// Print `label` and read one trimmed line of input.
pub fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read user input")?;
    Ok(line.trim().to_string())
}

/// Connect one oracle session and price every day in `start..=end`.
///
/// The session lives for exactly this call and is released when it returns.
pub async fn fetch_btc_range(
    config: &Config,
    start: &str,
    end: &str,
) -> Result<std::result::Result<PriceMap, RangeError>> {
    let oracle = CoinGeckoOracle::connect(&config.oracle)?;
    let fetcher = RangePriceFetcher::new(oracle, config.pacing.clone());
    Ok(fetcher.fetch_range(start, end).await)
}

/// Text shown to the user for the outcome of a range call.
pub fn render_range_report(
    start: &str,
    end: &str,
    outcome: &std::result::Result<PriceMap, RangeError>,
) -> Result<String> {
    match outcome {
        Ok(prices) if prices.is_empty() => Ok(format!(
            "Could not fetch any Bitcoin prices between {start} and {end}."
        )),
        Ok(prices) => Ok(serde_json::to_string_pretty(prices)?),
        Err(err) => Ok(format!("Failed to fetch Bitcoin prices: {err}")),
    }
}

/// Price a single day. Per-day upstream failures are logged and reported as `None`.
pub async fn lookup_price<O: PriceOracle + ?Sized>(
    oracle: &O,
    date: &str,
) -> std::result::Result<Option<PriceQuote>, RangeError> {
    let day = DateKey::parse(date)?;
    match oracle.price_on(day).await {
        Ok(price) => Ok(Some(price)),
        Err(failure) => {
            warn!("could not price {}: {}", day, failure);
            Ok(None)
        }
    }
}

pub fn render_price_report(
    date: &str,
    outcome: &std::result::Result<Option<PriceQuote>, RangeError>,
) -> String {
    match outcome {
        Ok(Some(price)) => format!("Bitcoin price on {date} was: ${price} USD"),
        Ok(None) => format!("Could not fetch the Bitcoin price for {date}."),
        Err(err) => format!("Failed to fetch the Bitcoin price: {err}"),
    }
}

/// Load the configured sentiment dataset from the local mirror.
pub fn load_dataset(
    config: &Config,
    handle: &str,
    file: &str,
    row_limit: Option<usize>,
) -> Result<Table> {
    let dataset = DatasetRef::parse(handle, file)?;
    let store = LocalDatasetStore::new(&config.dataset.root);
    store.load(&dataset, row_limit)
}

pub fn render_table_preview(table: &Table, rows: usize) -> String {
    let mut out = format!("First {} records:\n", table.head(rows).len());
    out.push_str(&table.headers.join(" | "));
    for row in table.head(rows) {
        out.push('\n');
        out.push_str(&row.join(" | "));
    }
    out
}
