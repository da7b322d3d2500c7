//! Runtime configuration for the WooCommerce sync.
//!
//! Everything is read once at the binary seam and handed to the sync core as
//! plain structs; the core itself never touches process env.
use std::time::Duration;

use crate::util::env;

/// Additive amount applied to the source price to produce the listed price.
pub const DEFAULT_PRICE_MARKUP: f64 = 1200.0;
/// Recent-scope cutoff window, in hours.
pub const DEFAULT_RECENT_WINDOW_HOURS: f64 = 15.5;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BATCH_SIZE: usize = 50;
const DEFAULT_INTER_BATCH_DELAY_MS: u64 = 500;

/// Connection settings for the remote catalog.
#[derive(Debug, Clone)]
pub struct WooConfig {
    /// Site base URL, without the `/wp-json` suffix.
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub timeout_secs: u64,
    pub price_markup: f64,
}

impl WooConfig {
    /// Read `WP_URL`, `WP_CONSUMER_KEY` and `WP_CONSUMER_SECRET` (required)
    /// plus optional tuning overrides.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            base_url: env::env_req("WP_URL")?.trim_end_matches('/').to_string(),
            consumer_key: env::env_req("WP_CONSUMER_KEY")?,
            consumer_secret: env::env_req("WP_CONSUMER_SECRET")?,
            timeout_secs: env::env_parse("WOOSYNC_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            price_markup: env::env_parse("WOOSYNC_PRICE_MARKUP", DEFAULT_PRICE_MARKUP),
        })
    }
}

/// Batch tuning for one sync invocation.
#[derive(Debug, Clone, Copy)]
pub struct SyncParams {
    /// Products dispatched concurrently per batch.
    pub batch_size: usize,
    /// Fixed pause between batches; the sole rate limiter toward the remote.
    pub inter_batch_delay: Duration,
}

impl Default for SyncParams {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            inter_batch_delay: Duration::from_millis(DEFAULT_INTER_BATCH_DELAY_MS),
        }
    }
}

impl SyncParams {
    pub fn new(batch_size: Option<usize>, delay_ms: Option<u64>) -> Self {
        let defaults = Self::default();
        Self {
            batch_size: batch_size.unwrap_or(defaults.batch_size).max(1),
            inter_batch_delay: delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.inter_batch_delay),
        }
    }
}
