//! Trending prayer requests: the newest requests posted inside a trailing
//! window of days.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::metrics::TRENDING_QUERY_DURATION_SECONDS;
use crate::models::PrayerRequest;
use crate::services::clock::Clock;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_LIMIT: u32 = 5;

/// Read access to recently posted prayer requests.
#[async_trait]
pub trait RecentPrayerRequests: Send + Sync {
    /// Requests with `date_posted >= since`, newest first, at most `limit`.
    async fn posted_since(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<PrayerRequest>>;
}

/// Validated trending inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendingParams {
    window_days: u32,
    limit: u32,
}

impl TrendingParams {
    pub fn new(window_days: u32, limit: u32) -> Result<Self> {
        if window_days == 0 {
            return Err(AppError::Validation(
                "window_days must be a positive number of days".to_string(),
            ));
        }
        if limit == 0 {
            return Err(AppError::Validation("limit must be positive".to_string()));
        }
        Ok(Self { window_days, limit })
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for TrendingParams {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            limit: DEFAULT_LIMIT,
        }
    }
}

pub struct TrendingFeedQuery {
    store: Arc<dyn RecentPrayerRequests>,
    clock: Arc<dyn Clock>,
}

impl TrendingFeedQuery {
    pub fn new(store: Arc<dyn RecentPrayerRequests>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// At most `limit` requests posted within the last `window_days` days,
    /// newest first. An empty list just means nothing recent.
    ///
    /// The window filter, ordering and limit are re-applied here so the
    /// result holds whatever the store returns. Requests posted at the same
    /// instant keep the store's relative order.
    pub async fn get(&self, params: TrendingParams) -> Result<Vec<PrayerRequest>> {
        let started = Instant::now();
        let since = window_start(self.clock.now(), params.window_days);
        let limit = params.limit as usize;

        let mut requests = self.store.posted_since(since, i64::from(params.limit)).await?;
        requests.retain(|r| r.date_posted >= since);
        requests.sort_by(|a, b| b.date_posted.cmp(&a.date_posted));
        requests.truncate(limit);

        TRENDING_QUERY_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());
        debug!(
            window_days = params.window_days,
            limit = params.limit,
            returned = requests.len(),
            "trending query"
        );
        Ok(requests)
    }
}

/// Start of a trailing window of `days` ending at `now`. Windows reaching
/// past the Unix epoch start at the epoch; nothing is posted before it.
fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    Duration::try_days(i64::from(days))
        .and_then(|window| now.checked_sub_signed(window))
        .map_or(epoch, |since| since.max(epoch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_inputs_are_rejected() {
        assert!(matches!(
            TrendingParams::new(0, 5),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            TrendingParams::new(7, 0),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn defaults_are_a_week_and_five() {
        let params = TrendingParams::default();
        assert_eq!(params.window_days(), 7);
        assert_eq!(params.limit(), 5);
        assert_eq!(TrendingParams::new(7, 5).unwrap(), params);
    }

    #[test]
    fn huge_windows_start_at_the_epoch() {
        let now = DateTime::parse_from_rfc3339("2025-05-20T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(window_start(now, u32::MAX), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(window_start(now, 1_000_000), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(window_start(now, 7), now - Duration::days(7));
    }
}
