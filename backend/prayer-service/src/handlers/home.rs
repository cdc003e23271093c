/// Landing page assembly and the feed endpoints it is built from
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::app_state::AppState;
use crate::db::prayer_request_repo;
use crate::error::Result;
use crate::models::{Page, PageWindow, PrayerRequest};
use crate::services::{DailyVerseProvider, TrendingParams};

pub const ALL_CATEGORIES: &str = "all";
pub const MAX_TRENDING_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub page: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub requests: Page<PrayerRequest>,
    pub category: String,
    pub trending: Vec<PrayerRequest>,
    /// `None` when the verse service is unavailable
    pub daily_verse: Option<String>,
}

/// `GET /api/v1/home`
pub async fn home(
    state: web::Data<AppState>,
    query: web::Query<HomeQuery>,
) -> Result<HttpResponse> {
    let category = query
        .category
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());
    let filter = (category != ALL_CATEGORIES).then_some(category.as_str());

    let total = prayer_request_repo::count(&state.db, filter).await?;
    let window = PageWindow::resolve(
        PageWindow::parse_page(query.page.as_deref()),
        state.config.feed.home_page_size,
        total,
    )?;
    let items =
        prayer_request_repo::list_recent(&state.db, filter, window.limit(), window.offset())
            .await?;

    let trending = state.trending.get(default_trending(&state)?).await?;

    let daily_verse = daily_verse_or_none(&state.daily_verse).await;

    Ok(HttpResponse::Ok().json(HomeResponse {
        requests: window.into_page(items),
        category,
        trending,
        daily_verse,
    }))
}

/// `GET /api/v1/daily-verse`
pub async fn daily_verse(state: web::Data<AppState>) -> Result<HttpResponse> {
    let verse = state.daily_verse.get_today().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "daily_verse": verse })))
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub window_days: Option<u32>,
    pub limit: Option<u32>,
}

/// `GET /api/v1/trending`
pub async fn trending(
    state: web::Data<AppState>,
    query: web::Query<TrendingQuery>,
) -> Result<HttpResponse> {
    let feed = &state.config.feed;
    let params = TrendingParams::new(
        query.window_days.unwrap_or(feed.trending_window_days),
        query
            .limit
            .unwrap_or(feed.trending_limit)
            .min(MAX_TRENDING_LIMIT),
    )?;

    let requests = state.trending.get(params).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "window_days": params.window_days(),
        "limit": params.limit(),
        "requests": requests,
    })))
}

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// The home page renders without a verse when the verse service fails.
pub async fn daily_verse_or_none(provider: &DailyVerseProvider) -> Option<String> {
    match provider.get_today().await {
        Ok(verse) => Some(verse),
        Err(e) => {
            warn!(error = %e, "daily verse unavailable; rendering home without it");
            None
        }
    }
}

fn default_trending(state: &AppState) -> Result<TrendingParams> {
    TrendingParams::new(
        state.config.feed.trending_window_days,
        state.config.feed.trending_limit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        ContentFetchError, DailyVerseCache, ManualClock, VerseCatalog, VersePayload, VerseSource,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct FixedSource(std::result::Result<VersePayload, ContentFetchError>);

    #[async_trait]
    impl VerseSource for FixedSource {
        async fn fetch(
            &self,
            _reference: &str,
        ) -> std::result::Result<VersePayload, ContentFetchError> {
            self.0.clone()
        }
    }

    fn provider(source: FixedSource) -> DailyVerseProvider {
        let today = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        DailyVerseProvider::new(
            VerseCatalog::default(),
            Arc::new(source),
            Arc::new(DailyVerseCache::new()),
            Arc::new(ManualClock::on_date(today)),
        )
    }

    #[tokio::test]
    async fn failed_verse_degrades_to_none() {
        let provider = provider(FixedSource(Err(ContentFetchError::Status(503))));

        assert_eq!(daily_verse_or_none(&provider).await, None);
        assert!(provider.cache().peek().is_none());
    }

    #[tokio::test]
    async fn available_verse_is_included() {
        let provider = provider(FixedSource(Ok(VersePayload {
            text: "Rejoice always".to_string(),
            reference: "1 Thessalonians 5:16".to_string(),
        })));

        assert_eq!(
            daily_verse_or_none(&provider).await.as_deref(),
            Some("Rejoice always - 1 Thessalonians 5:16")
        );
    }
}
