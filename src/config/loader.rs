use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Context, Result};

use super::{validator, Config, DatasetConfig, OracleConfig, PacingConfig, PacingStrategy};

/// Load a JSON config file, filling anything it leaves out from [`Config::builtin`].
pub fn load_config(path: &Path) -> Result<Config> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config JSON at {}", path.display()))?;

    let raw: RawConfig = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse config JSON at {}", path.display()))?;

    let config = raw.apply(Config::builtin());
    validator::validate_config(&config)?;
    Ok(config)
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    oracle: RawOracleConfig,
    #[serde(default)]
    pacing: RawPacingConfig,
    #[serde(default)]
    dataset: RawDatasetConfig,
}

impl RawConfig {
    fn apply(self, base: Config) -> Config {
        Config {
            oracle: self.oracle.apply(base.oracle),
            pacing: self.pacing.apply(base.pacing),
            dataset: self.dataset.apply(base.dataset),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawOracleConfig {
    base_url: Option<String>,
    coin_id: Option<String>,
    vs_currency: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl RawOracleConfig {
    fn apply(self, base: OracleConfig) -> OracleConfig {
        OracleConfig {
            base_url: self
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(base.base_url),
            coin_id: self.coin_id.unwrap_or(base.coin_id),
            vs_currency: self
                .vs_currency
                .map(|currency| currency.to_lowercase())
                .unwrap_or(base.vs_currency),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(base.timeout),
            user_agent: self.user_agent.unwrap_or(base.user_agent),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawPacingConfig {
    strategy: Option<PacingStrategy>,
    block_size: Option<usize>,
    pause_ms: Option<u64>,
    max_span_days: Option<i64>,
}

impl RawPacingConfig {
    fn apply(self, base: PacingConfig) -> PacingConfig {
        PacingConfig {
            strategy: self.strategy.unwrap_or(base.strategy),
            block_size: self.block_size.unwrap_or(base.block_size),
            pause: self
                .pause_ms
                .map(Duration::from_millis)
                .unwrap_or(base.pause),
            max_span_days: self.max_span_days.unwrap_or(base.max_span_days),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawDatasetConfig {
    root: Option<PathBuf>,
    dataset: Option<String>,
    file: Option<String>,
    preview_rows: Option<usize>,
}

impl RawDatasetConfig {
    fn apply(self, base: DatasetConfig) -> DatasetConfig {
        DatasetConfig {
            root: self.root.unwrap_or(base.root),
            dataset: self.dataset.unwrap_or(base.dataset),
            file: self.file.unwrap_or(base.file),
            preview_rows: self.preview_rows.unwrap_or(base.preview_rows),
        }
    }
}
