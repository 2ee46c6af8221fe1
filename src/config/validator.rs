use crate::error::{AppError, Result};

use super::{Config, DatasetConfig, OracleConfig, PacingConfig};

/// Upper bound on `pacing.max_span_days`, roughly a century.
pub const MAX_SPAN_DAYS_LIMIT: i64 = 36_500;

/// Validate a merged config and surface every problem at once.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut issues = Vec::new();

    validate_oracle(&config.oracle, &mut issues);
    validate_pacing(&config.pacing, &mut issues);
    validate_dataset(&config.dataset, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_oracle(oracle: &OracleConfig, issues: &mut Vec<String>) {
    if oracle.base_url.trim().is_empty() {
        issues.push("oracle.base_url must not be empty".to_string());
    } else if !(oracle.base_url.starts_with("http://") || oracle.base_url.starts_with("https://"))
    {
        issues.push(format!(
            "oracle.base_url must be an http(s) URL, found `{}`",
            oracle.base_url
        ));
    }

    if oracle.coin_id.trim().is_empty() {
        issues.push("oracle.coin_id must not be empty".to_string());
    }

    if oracle.vs_currency.trim().is_empty() {
        issues.push("oracle.vs_currency must not be empty".to_string());
    }

    if oracle.timeout.is_zero() {
        issues.push("oracle.timeout_secs must be greater than zero".to_string());
    }
}

fn validate_pacing(pacing: &PacingConfig, issues: &mut Vec<String>) {
    if pacing.block_size == 0 {
        issues.push("pacing.block_size must be at least 1".to_string());
    }

    if !(0..=MAX_SPAN_DAYS_LIMIT).contains(&pacing.max_span_days) {
        issues.push(format!(
            "pacing.max_span_days must be between 0 and {}, found {}",
            MAX_SPAN_DAYS_LIMIT, pacing.max_span_days
        ));
    }
}

fn validate_dataset(dataset: &DatasetConfig, issues: &mut Vec<String>) {
    if dataset.dataset.split('/').filter(|part| !part.is_empty()).count() != 2 {
        issues.push(format!(
            "dataset.dataset must look like `owner/slug`, found `{}`",
            dataset.dataset
        ));
    }

    if dataset.file.trim().is_empty() {
        issues.push("dataset.file must not be empty".to_string());
    }
}
