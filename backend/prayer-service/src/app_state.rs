//! Shared application state handed to every handler as `web::Data<AppState>`.

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::security::TokenIssuer;
use crate::services::{
    BibleApiClient, Clock, DailyVerseCache, DailyVerseProvider, EmailService, ProfileImageStore,
    RecentPrayerRequests, TrendingFeedQuery, VerseCatalog, VerseSource,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenIssuer>,
    pub daily_verse: Arc<DailyVerseProvider>,
    pub trending: Arc<TrendingFeedQuery>,
    pub email: EmailService,
    pub profile_images: Arc<dyn ProfileImageStore>,
}

/// Swappable collaborators. Production wires the HTTP verse client, the
/// Postgres trending store and S3; tests substitute in-memory versions.
pub struct Collaborators {
    pub verse_source: Arc<dyn VerseSource>,
    pub verse_cache: Arc<DailyVerseCache>,
    pub trending_store: Arc<dyn RecentPrayerRequests>,
    pub profile_images: Arc<dyn ProfileImageStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: Config, db: PgPool, parts: Collaborators) -> Result<Self> {
        let email = EmailService::new(&config.email, &config.app.public_base_url)?;
        let tokens = TokenIssuer::new(&config.security);

        let daily_verse = DailyVerseProvider::new(
            VerseCatalog::default(),
            parts.verse_source,
            parts.verse_cache,
            parts.clock.clone(),
        );
        let trending = TrendingFeedQuery::new(parts.trending_store, parts.clock);

        Ok(Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            daily_verse: Arc::new(daily_verse),
            trending: Arc::new(trending),
            email,
            profile_images: parts.profile_images,
        })
    }
}

/// HTTP client for the configured verse service
pub fn verse_client(config: &Config) -> Result<BibleApiClient> {
    Ok(BibleApiClient::new(
        config.daily_verse.api_base_url.clone(),
        Duration::from_secs(config.daily_verse.timeout_secs),
    )?)
}
