use async_trait::async_trait;

use crate::domain::{DateKey, PriceQuote};

use super::DayResult;

/// Historical price-by-date lookup.
///
/// One value represents one connection context: the range fetcher reuses it for
/// every day of a call and drops it when the call returns.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn price_on(&self, day: DateKey) -> DayResult<PriceQuote>;
}
