use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{ContentFetchError, DailyVerse, DailyVerseCache, VerseCatalog, VerseSource};
use crate::metrics::DAILY_VERSE_CACHE_EVENTS;
use crate::services::clock::Clock;

/// Serves the verse of the day, fetching it at most once per date.
pub struct DailyVerseProvider {
    catalog: VerseCatalog,
    source: Arc<dyn VerseSource>,
    cache: Arc<DailyVerseCache>,
    clock: Arc<dyn Clock>,
    /// Serialises fetches so concurrent first requests of a day share one
    /// lookup.
    refresh_lock: Mutex<()>,
}

impl DailyVerseProvider {
    pub fn new(
        catalog: VerseCatalog,
        source: Arc<dyn VerseSource>,
        cache: Arc<DailyVerseCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            source,
            cache,
            clock,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &Arc<DailyVerseCache> {
        &self.cache
    }

    pub fn catalog(&self) -> &VerseCatalog {
        &self.catalog
    }

    /// Today's verse formatted as `"{text} - {reference}"`.
    ///
    /// A failed fetch is returned to the caller and leaves the cache as it
    /// was; yesterday's verse is never served in its place.
    pub async fn get_today(&self) -> Result<String, ContentFetchError> {
        let today = self.clock.today();

        if let Some(verse) = self.cache.get_for(today) {
            DAILY_VERSE_CACHE_EVENTS.with_label_values(&["hit"]).inc();
            debug!(date = %today, reference = %verse.reference, "daily verse cache hit");
            return Ok(verse.formatted());
        }

        let _guard = self.refresh_lock.lock().await;

        // Another request may have filled the cache while we waited.
        if let Some(verse) = self.cache.get_for(today) {
            DAILY_VERSE_CACHE_EVENTS.with_label_values(&["hit"]).inc();
            return Ok(verse.formatted());
        }

        DAILY_VERSE_CACHE_EVENTS.with_label_values(&["miss"]).inc();
        let verse = self.fetch_and_store(today).await?;
        Ok(verse.formatted())
    }

    /// Fetch the verse for `date` and replace the cache, even if it already
    /// holds a value for that date.
    pub async fn refresh(&self, date: NaiveDate) -> Result<DailyVerse, ContentFetchError> {
        let _guard = self.refresh_lock.lock().await;
        self.fetch_and_store(date).await
    }

    async fn fetch_and_store(&self, date: NaiveDate) -> Result<DailyVerse, ContentFetchError> {
        let reference = self.catalog.select(date);

        let payload = match self.source.fetch(reference).await {
            Ok(payload) => payload,
            Err(e) => {
                DAILY_VERSE_CACHE_EVENTS
                    .with_label_values(&["fetch_error"])
                    .inc();
                warn!(date = %date, reference, error = %e, "daily verse fetch failed");
                return Err(e);
            }
        };

        let verse = DailyVerse {
            text: payload.text,
            reference: payload.reference,
            cached_for: date,
        };
        self.cache.store(verse.clone());

        info!(date = %date, reference = %verse.reference, "daily verse refreshed");
        Ok(verse)
    }
}
