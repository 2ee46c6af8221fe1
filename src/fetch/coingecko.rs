use async_trait::async_trait;
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::Client;

use crate::config::OracleConfig;
use crate::domain::{DateKey, PriceQuote};
use crate::error::{Context, DayFetchFailure, Result};

use super::decode::decode_price;
use super::oracle::PriceOracle;
use super::DayResult;

/// CoinGecko `/coins/{id}/history` client. Holds one HTTP session for its whole lifetime.
pub struct CoinGeckoOracle {
    client: Client,
    history_url: String,
    vs_currency: String,
}

impl CoinGeckoOracle {
    pub fn connect(config: &OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to construct price history HTTP client")?;

        Ok(Self {
            client,
            history_url: history_url(config),
            vs_currency: config.vs_currency.clone(),
        })
    }

    fn price_path(&self) -> [&str; 3] {
        ["market_data", "current_price", self.vs_currency.as_str()]
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoOracle {
    async fn price_on(&self, day: DateKey) -> DayResult<PriceQuote> {
        let date = day.upstream();
        debug!("GET {} date={}", self.history_url, date);

        let response = self
            .client
            .get(&self.history_url)
            .header(ACCEPT, "application/json")
            .query(&[("date", date.as_str()), ("localization", "false")])
            .send()
            .await
            .map_err(DayFetchFailure::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DayFetchFailure::Status(status));
        }

        let body = response.text().await.map_err(DayFetchFailure::Transport)?;
        decode_price(&body, &self.price_path())
    }
}

fn history_url(config: &OracleConfig) -> String {
    format!(
        "{}/coins/{}/history",
        config.base_url.trim_end_matches('/'),
        config.coin_id
    )
}
