use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod loader;
pub mod validator;

pub use loader::load_config;

pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const SENTIMENT_DATASET: &str = "gauravduttakiit/bitcoin-tweets-16m-tweets-with-sentiment-tagged";
pub const SENTIMENT_FILE: &str = "mbsa.csv";

/// Where daily prices come from and how the HTTP session is built.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub base_url: String,
    pub coin_id: String,
    pub vs_currency: String,
    pub timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacingStrategy {
    /// Fixed blocks of queries separated by a pause.
    #[default]
    Block,
    /// Token bucket refilled at `block_size` queries per `pause`.
    Quota,
}

/// Request pacing and the cap on how far apart range bounds may be.
#[derive(Debug, Clone)]
pub struct PacingConfig {
    pub strategy: PacingStrategy,
    pub block_size: usize,
    pub pause: Duration,
    /// Maximum `end - start` in days. 4 means at most five days inclusive.
    pub max_span_days: i64,
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub root: PathBuf,
    pub dataset: String,
    pub file: String,
    pub preview_rows: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub oracle: OracleConfig,
    pub pacing: PacingConfig,
    pub dataset: DatasetConfig,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_BASE_URL.to_string(),
            coin_id: "bitcoin".to_string(),
            vs_currency: "usd".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: concat!("btc-price-range/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            strategy: PacingStrategy::Block,
            block_size: 5,
            pause: Duration::from_secs(5),
            max_span_days: 4,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("datasets"),
            dataset: SENTIMENT_DATASET.to_string(),
            file: SENTIMENT_FILE.to_string(),
            preview_rows: 5,
        }
    }
}

impl Config {
    pub fn builtin() -> Self {
        Config {
            oracle: OracleConfig::default(),
            pacing: PacingConfig::default(),
            dataset: DatasetConfig::default(),
        }
    }
}
