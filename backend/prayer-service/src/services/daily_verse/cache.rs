use chrono::NaiveDate;
use std::sync::{PoisonError, RwLock};

use super::DailyVerse;

/// Holds at most one resolved verse, tagged with the date it belongs to.
///
/// Shared by reference with the provider so callers (and tests) can inspect
/// or reset it.
#[derive(Debug, Default)]
pub struct DailyVerseCache {
    slot: RwLock<Option<DailyVerse>>,
}

impl DailyVerseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached verse if it was computed for `date`. A value from any other
    /// day is treated as absent.
    pub fn get_for(&self, date: NaiveDate) -> Option<DailyVerse> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|verse| verse.cached_for == date)
            .cloned()
    }

    /// Whatever is cached, regardless of date.
    pub fn peek(&self) -> Option<DailyVerse> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn store(&self, verse: DailyVerse) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(verse);
    }

    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse_on(date: NaiveDate) -> DailyVerse {
        DailyVerse {
            text: "For God so loved the world".to_string(),
            reference: "John 3:16".to_string(),
            cached_for: date,
        }
    }

    #[test]
    fn value_is_only_returned_for_its_own_date() {
        let cache = DailyVerseCache::new();
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let tomorrow = today.succ_opt().unwrap();

        assert!(cache.get_for(today).is_none());
        cache.store(verse_on(today));

        assert_eq!(cache.get_for(today), Some(verse_on(today)));
        assert!(cache.get_for(tomorrow).is_none());
        // The stale value is still there, just not served.
        assert_eq!(cache.peek(), Some(verse_on(today)));
    }

    #[test]
    fn clear_empties_the_slot() {
        let cache = DailyVerseCache::new();
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        cache.store(verse_on(today));
        cache.clear();
        assert!(cache.peek().is_none());
    }
}
