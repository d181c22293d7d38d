//! Helpers shared by the profile behaviors

use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::debug;

use stampede_api::ApiResult;
use stampede_config::PriceRange;

/// Search terms the browse and mining scenarios cycle through.
pub(crate) const SEARCH_TERMS: &[&str] = &["phone", "computer", "clothes", "electronics"];

/// In-behavior pause between dependent requests, in seconds.
pub(crate) async fn pause(secs: f64) {
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}

/// Draw one id from a sample pool, widened for the client APIs. An
/// empty pool falls back to id 1.
pub(crate) fn sample_id(rng: &mut StdRng, pool: &[u32]) -> u64 {
    pool.choose(rng).copied().map(u64::from).unwrap_or(1)
}

/// Draw one price filter window. An empty table falls back to the
/// cheapest default window.
pub(crate) fn sample_range(rng: &mut StdRng, ranges: &[PriceRange]) -> PriceRange {
    ranges.choose(rng).copied().unwrap_or(PriceRange { min: 0, max: 50 })
}

/// Millisecond timestamp used to keep generated payload titles unique.
pub(crate) fn unique_suffix() -> i64 {
    Utc::now().timestamp_millis()
}

/// Log-and-continue handling for scenarios that tolerate individual
/// request failures instead of aborting the iteration.
pub(crate) fn log_failure<T>(label: &'static str, result: ApiResult<T>) {
    if let Err(err) = result {
        debug!(label, error = %err, "request failed, continuing");
    }
}
