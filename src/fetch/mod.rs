use log::{debug, info, warn};

use crate::config::PacingConfig;
use crate::domain::{DateRange, PriceMap};
use crate::error::{DayFetchFailure, RangeError};

pub mod coingecko;
pub mod decode;
pub mod limiter;
pub mod oracle;

pub use coingecko::CoinGeckoOracle;
pub use limiter::{limiter_for, BlockPacer, QuotaLimiter, RateLimiter, Sleeper, TokioSleeper};
pub use oracle::PriceOracle;

/// Outcome of pricing a single day.
pub type DayResult<T> = std::result::Result<T, DayFetchFailure>;

/// Validate `start..=end` and price every day in it, in order, through `oracle`.
///
/// Validation failures return before the limiter or oracle is touched. A day whose
/// lookup fails is logged and left out; it never aborts the walk.
pub async fn fetch_range<O, L>(
    start: &str,
    end: &str,
    max_span_days: i64,
    oracle: &O,
    limiter: &mut L,
) -> Result<PriceMap, RangeError>
where
    O: PriceOracle + ?Sized,
    L: RateLimiter + ?Sized,
{
    let range = DateRange::parse(start, end, max_span_days)?;
    if range.is_reversed() {
        warn!(
            "start {} is after end {}; nothing to fetch",
            range.start(),
            range.end()
        );
    }

    let mut prices = PriceMap::new();
    for day in range.days() {
        limiter.acquire().await;
        debug!("querying price for {}", day);

        match oracle.price_on(day).await {
            Ok(price) => {
                prices.insert(day, price);
            }
            Err(failure) => warn!("skipping {}: {}", day, failure),
        }
    }

    info!(
        "priced {} of {} days in {}..={}",
        prices.len(),
        range.len(),
        range.start(),
        range.end()
    );
    Ok(prices)
}

/// Range fetcher bound to one oracle session and a pacing policy.
pub struct RangePriceFetcher<O> {
    oracle: O,
    pacing: PacingConfig,
}

impl<O: PriceOracle> RangePriceFetcher<O> {
    pub fn new(oracle: O, pacing: PacingConfig) -> Self {
        Self { oracle, pacing }
    }

    /// Fetch with a fresh limiter built from the configured strategy.
    pub async fn fetch_range(&self, start: &str, end: &str) -> Result<PriceMap, RangeError> {
        let mut limiter = limiter_for(&self.pacing);
        self.fetch_range_with(start, end, limiter.as_mut()).await
    }

    pub async fn fetch_range_with<L>(
        &self,
        start: &str,
        end: &str,
        limiter: &mut L,
    ) -> Result<PriceMap, RangeError>
    where
        L: RateLimiter + ?Sized,
    {
        fetch_range(start, end, self.pacing.max_span_days, &self.oracle, limiter).await
    }
}

#[cfg(test)]
mod tests {
    use super::limiter::tests::RecordingSleeper;
    use super::*;
    use crate::config::PacingStrategy;
    use crate::domain::{DateKey, PriceQuote};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves fixed prices per day and records every query it receives.
    #[derive(Default)]
    struct StubOracle {
        prices: HashMap<String, f64>,
        failing: Vec<String>,
        queried: Mutex<Vec<String>>,
    }

    impl StubOracle {
        fn with_prices(prices: &[(&str, f64)]) -> Self {
            Self {
                prices: prices
                    .iter()
                    .map(|(day, price)| (day.to_string(), *price))
                    .collect(),
                ..Self::default()
            }
        }

        fn failing_on(mut self, day: &str) -> Self {
            self.failing.push(day.to_string());
            self
        }

        fn queried(&self) -> Vec<String> {
            self.queried.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PriceOracle for StubOracle {
        async fn price_on(&self, day: DateKey) -> DayResult<PriceQuote> {
            let key = day.to_string();
            self.queried.lock().unwrap().push(key.clone());

            if self.failing.contains(&key) {
                return Err(DayFetchFailure::Status(StatusCode::SERVICE_UNAVAILABLE));
            }
            match self.prices.get(&key) {
                Some(price) => Ok(PriceQuote::new(*price).unwrap()),
                None => Err(DayFetchFailure::MissingPrice {
                    path: "market_data.current_price.usd".to_string(),
                }),
            }
        }
    }

    fn recording_pacer(block_size: usize) -> (BlockPacer<RecordingSleeper>, RecordingSleeper) {
        let sleeper = RecordingSleeper::default();
        let pacer = BlockPacer::with_sleeper(block_size, Duration::from_secs(5), sleeper.clone());
        (pacer, sleeper)
    }

    fn fetcher(oracle: StubOracle) -> RangePriceFetcher<StubOracle> {
        RangePriceFetcher::new(oracle, PacingConfig::default())
    }

    #[tokio::test]
    async fn three_day_range_returns_every_price_without_pausing() {
        let fetcher = fetcher(StubOracle::with_prices(&[
            ("2024-01-01", 100.0),
            ("2024-01-02", 101.5),
            ("2024-01-03", 99.0),
        ]));
        let (mut pacer, sleeper) = recording_pacer(5);

        let prices = fetcher
            .fetch_range_with("2024-01-01", "2024-01-03", &mut pacer)
            .await
            .expect("valid range");

        assert_eq!(
            serde_json::to_value(&prices).unwrap(),
            serde_json::json!({
                "2024-01-01": 100.0,
                "2024-01-02": 101.5,
                "2024-01-03": 99.0
            })
        );
        assert_eq!(sleeper.count(), 0);
        assert_eq!(pacer.issued(), 3);
    }

    #[tokio::test]
    async fn queries_each_day_once_in_chronological_order() {
        let fetcher = fetcher(StubOracle::default());
        let (mut pacer, _) = recording_pacer(5);

        fetcher
            .fetch_range_with("2024-02-27", "2024-03-02", &mut pacer)
            .await
            .expect("valid range");

        assert_eq!(
            fetcher.oracle.queried(),
            vec![
                "2024-02-27",
                "2024-02-28",
                "2024-02-29",
                "2024-03-01",
                "2024-03-02"
            ]
        );
    }

    #[tokio::test]
    async fn oversized_range_fails_without_queries() {
        let fetcher = fetcher(StubOracle::default());
        let (mut pacer, sleeper) = recording_pacer(5);

        let err = fetcher
            .fetch_range_with("2024-01-01", "2024-01-10", &mut pacer)
            .await
            .expect_err("ten days exceeds the cap");

        assert!(matches!(err, RangeError::RangeTooLarge { days: 10, .. }));
        assert!(fetcher.oracle.queried().is_empty());
        assert_eq!(pacer.issued(), 0);
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn six_day_range_is_one_past_the_cap() {
        let fetcher = fetcher(StubOracle::default());
        let (mut pacer, _) = recording_pacer(5);

        let err = fetcher
            .fetch_range_with("2024-01-01", "2024-01-06", &mut pacer)
            .await
            .expect_err("six days exceeds the cap");
        assert!(matches!(err, RangeError::RangeTooLarge { .. }));
    }

    #[tokio::test]
    async fn malformed_dates_fail_without_queries() {
        let fetcher = fetcher(StubOracle::default());

        for (start, end) in [
            ("2024-13-40", "2024-01-02"),
            ("2024-01-01", "not-a-date"),
            ("01-01-2024", "03-01-2024"),
        ] {
            let (mut pacer, _) = recording_pacer(5);
            let err = fetcher
                .fetch_range_with(start, end, &mut pacer)
                .await
                .expect_err("malformed input");
            assert!(
                matches!(err, RangeError::InvalidDateFormat { .. }),
                "unexpected error for {start}..{end}: {err:?}"
            );
            assert_eq!(pacer.issued(), 0);
        }
        assert!(fetcher.oracle.queried().is_empty());
    }

    #[tokio::test]
    async fn reversed_range_returns_empty_map() {
        let fetcher = fetcher(StubOracle::default());
        let (mut pacer, _) = recording_pacer(5);

        let prices = fetcher
            .fetch_range_with("2024-03-05", "2024-03-01", &mut pacer)
            .await
            .expect("reversed range is not an error");

        assert!(prices.is_empty());
        assert!(fetcher.oracle.queried().is_empty());
    }

    #[tokio::test]
    async fn failed_day_is_omitted_and_walk_continues() {
        let fetcher = fetcher(
            StubOracle::with_prices(&[
                ("2024-01-01", 100.0),
                ("2024-01-02", 101.5),
                ("2024-01-03", 99.0),
                ("2024-01-04", 98.25),
            ])
            .failing_on("2024-01-02"),
        );
        let (mut pacer, _) = recording_pacer(5);

        let prices = fetcher
            .fetch_range_with("2024-01-01", "2024-01-04", &mut pacer)
            .await
            .expect("per-day failures do not fail the range");

        let day = |s: &str| DateKey::parse(s).unwrap();
        assert_eq!(prices.len(), 3);
        assert!(!prices.contains(&day("2024-01-02")));
        assert_eq!(prices.get(&day("2024-01-04")).map(|p| p.value()), Some(98.25));
        assert_eq!(fetcher.oracle.queried().len(), 4);
    }

    #[tokio::test]
    async fn all_days_failing_yields_empty_success() {
        let fetcher = fetcher(StubOracle::default());
        let (mut pacer, _) = recording_pacer(5);

        let prices = fetcher
            .fetch_range_with("2024-01-01", "2024-01-05", &mut pacer)
            .await
            .expect("empty result is still a success");

        assert!(prices.is_empty());
        assert_eq!(fetcher.oracle.queried().len(), 5);
    }

    #[tokio::test]
    async fn full_five_day_block_does_not_pause() {
        let fetcher = fetcher(StubOracle::default());
        let (mut pacer, sleeper) = recording_pacer(5);

        fetcher
            .fetch_range_with("2024-01-01", "2024-01-05", &mut pacer)
            .await
            .unwrap();

        assert_eq!(pacer.issued(), 5);
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn smaller_blocks_pause_between_runs() {
        let fetcher = fetcher(StubOracle::default());
        let (mut pacer, sleeper) = recording_pacer(2);

        fetcher
            .fetch_range_with("2024-01-01", "2024-01-05", &mut pacer)
            .await
            .unwrap();

        // 5 queries in blocks of 2: pause before the 3rd and 5th.
        assert_eq!(sleeper.count(), 2);
    }

    #[tokio::test]
    async fn configured_limiter_drives_full_walk() {
        for strategy in [PacingStrategy::Block, PacingStrategy::Quota] {
            let pacing = PacingConfig {
                strategy,
                block_size: 2,
                pause: Duration::ZERO,
                ..PacingConfig::default()
            };
            let fetcher = RangePriceFetcher::new(
                StubOracle::with_prices(&[("2024-01-01", 100.0), ("2024-01-03", 99.0)]),
                pacing,
            );

            let prices = fetcher
                .fetch_range("2024-01-01", "2024-01-05")
                .await
                .expect("valid range");

            assert_eq!(prices.len(), 2, "strategy {strategy:?}");
            assert_eq!(fetcher.oracle.queried().len(), 5, "strategy {strategy:?}");
        }
    }

    #[tokio::test]
    async fn configured_limiter_is_skipped_on_validation_failure() {
        let fetcher = fetcher(StubOracle::default());

        let err = fetcher
            .fetch_range("2024-01-01", "2024-01-31")
            .await
            .expect_err("month exceeds the cap");

        assert!(matches!(err, RangeError::RangeTooLarge { days: 31, .. }));
        assert!(fetcher.oracle.queried().is_empty());
    }

    #[tokio::test]
    async fn wider_cap_allows_longer_walks() {
        let pacing = PacingConfig {
            max_span_days: 10,
            ..PacingConfig::default()
        };
        let fetcher = RangePriceFetcher::new(StubOracle::default(), pacing);
        let (mut pacer, sleeper) = recording_pacer(5);

        fetcher
            .fetch_range_with("2024-01-01", "2024-01-11", &mut pacer)
            .await
            .unwrap();

        assert_eq!(fetcher.oracle.queried().len(), 11);
        assert_eq!(sleeper.count(), 2);
    }
}
