use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter as GovernorLimiter};
use log::info;

use crate::config::{PacingConfig, PacingStrategy};

/// Grants permission to issue one upstream query, suspending as long as needed.
#[async_trait]
pub trait RateLimiter: Send {
    async fn acquire(&mut self);
}

/// Source of delays. Swapped out in tests so pacing can be observed without waiting.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Fixed-rate throttle: after every `block_size` queries, wait `pause` before the next one.
///
/// The wait happens on the acquire that opens a new block, so the last query of a
/// walk is never followed by a pause. `N` queries cost `(N - 1) / block_size` pauses.
pub struct BlockPacer<S = TokioSleeper> {
    block_size: usize,
    pause: Duration,
    issued: usize,
    pauses: usize,
    sleeper: S,
}

impl BlockPacer<TokioSleeper> {
    pub fn new(block_size: usize, pause: Duration) -> Self {
        Self::with_sleeper(block_size, pause, TokioSleeper)
    }
}

impl<S: Sleeper> BlockPacer<S> {
    pub fn with_sleeper(block_size: usize, pause: Duration, sleeper: S) -> Self {
        Self {
            block_size: block_size.max(1),
            pause,
            issued: 0,
            pauses: 0,
            sleeper,
        }
    }

    pub fn issued(&self) -> usize {
        self.issued
    }

    pub fn pauses(&self) -> usize {
        self.pauses
    }
}

#[async_trait]
impl<S: Sleeper> RateLimiter for BlockPacer<S> {
    async fn acquire(&mut self) {
        if self.issued > 0 && self.issued % self.block_size == 0 {
            info!(
                "{} queries issued, pausing {:.1}s before the next block",
                self.issued,
                self.pause.as_secs_f64()
            );
            self.sleeper.sleep(self.pause).await;
            self.pauses += 1;
        }
        self.issued += 1;
    }
}

type DirectRateLimiter = GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Token bucket allowing a burst of `block_size` and refilling `block_size` cells per `pause`.
pub struct QuotaLimiter {
    limiter: DirectRateLimiter,
}

impl QuotaLimiter {
    pub fn new(block_size: usize, window: Duration) -> Self {
        Self {
            limiter: GovernorLimiter::direct(quota_from_window(window, block_size)),
        }
    }
}

#[async_trait]
impl RateLimiter for QuotaLimiter {
    async fn acquire(&mut self) {
        self.limiter.until_ready().await;
    }
}

fn quota_from_window(window: Duration, block_size: usize) -> Quota {
    let limit = u32::try_from(block_size).unwrap_or(u32::MAX).max(1);
    let burst = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);

    let seconds_per_cell = (window.as_secs_f64() / f64::from(limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}

/// Build the limiter configured for one range call.
pub fn limiter_for(pacing: &PacingConfig) -> Box<dyn RateLimiter> {
    match pacing.strategy {
        PacingStrategy::Block => Box::new(BlockPacer::new(pacing.block_size, pacing.pause)),
        PacingStrategy::Quota => Box::new(QuotaLimiter::new(pacing.block_size, pacing.pause)),
    }
}
