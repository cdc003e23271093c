/// Business logic layer for the prayer service
///
/// - Daily verse: date-selected scripture quotation with a per-day cache
/// - Trending: most recent prayer requests inside a trailing window
/// - Email: password reset mail over SMTP
/// - Profile images: thumbnailing and upload of profile pictures
pub mod clock;
pub mod daily_verse;
pub mod email;
pub mod profile_images;
pub mod trending;

pub use clock::{Clock, ManualClock, SystemClock};
pub use daily_verse::{
    BibleApiClient, ContentFetchError, DailyVerse, DailyVerseCache, DailyVerseProvider,
    VerseCatalog, VersePayload, VerseSource,
};
pub use email::EmailService;
pub use profile_images::{ImageFormat, ProfileImageStore, S3ProfileImageStore};
pub use trending::{RecentPrayerRequests, TrendingFeedQuery, TrendingParams};
