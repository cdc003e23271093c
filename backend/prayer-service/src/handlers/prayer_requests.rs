/// Prayer requests, prayer offers and the user search behind "offer prayers"
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{prayer_offer_repo, prayer_request_repo, user_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{Category, PageWindow, PrayerOffer, PrayerRequest};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePrayerRequest {
    #[validate(length(min = 1, max = 100, message = "Title is required (at most 100 characters)"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub category: Category,
}

#[derive(Debug, Deserialize)]
pub struct OfferPrayerRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct PrayerRequestDetail {
    pub request: PrayerRequest,
    pub offers: Vec<PrayerOffer>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// A user found by the search, with all of their requests
#[derive(Debug, Serialize)]
pub struct UserRequests {
    pub user_id: Uuid,
    pub username: String,
    pub profile_image_url: String,
    pub requests: Vec<PrayerRequest>,
}

async fn find_request(state: &AppState, id: i64) -> Result<PrayerRequest> {
    prayer_request_repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Prayer request not found".to_string()))
}

/// `POST /api/v1/prayer-requests`
pub async fn create(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: web::Json<CreatePrayerRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    if payload.title.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and content are required".to_string(),
        ));
    }

    let request = prayer_request_repo::create(
        &state.db,
        user_id.0,
        &payload.title,
        &payload.content,
        payload.category,
    )
    .await?;

    info!(request_id = request.id, user_id = %user_id.0, category = %payload.category, "prayer request shared");
    Ok(HttpResponse::Created().json(request))
}

/// `GET /api/v1/prayer-requests/{id}`
pub async fn get(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    let request = find_request(&state, *id).await?;
    let offers = prayer_offer_repo::list_for_request(&state.db, request.id).await?;

    Ok(HttpResponse::Ok().json(PrayerRequestDetail { request, offers }))
}

/// `DELETE /api/v1/prayer-requests/{id}`; only the author may delete.
pub async fn delete(
    state: web::Data<AppState>,
    user_id: UserId,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let request = find_request(&state, *id).await?;
    if request.user_id != user_id.0 {
        return Err(AppError::Forbidden(
            "You can only delete your own prayer requests".to_string(),
        ));
    }

    prayer_request_repo::delete(&state.db, request.id).await?;
    info!(request_id = request.id, user_id = %user_id.0, "prayer request deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// `POST /api/v1/prayer-requests/{id}/offers`
pub async fn offer_prayer(
    state: web::Data<AppState>,
    user_id: UserId,
    id: web::Path<i64>,
    payload: web::Json<OfferPrayerRequest>,
) -> Result<HttpResponse> {
    let request = find_request(&state, *id).await?;
    let offer =
        prayer_offer_repo::create(&state.db, request.id, user_id.0, &payload.content).await?;

    info!(request_id = request.id, offer_id = offer.id, "prayer offered");
    Ok(HttpResponse::Created().json(offer))
}

/// `GET /api/v1/users/{username}/prayer-requests`; a user may only list
/// their own.
pub async fn user_requests(
    state: web::Data<AppState>,
    user_id: UserId,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let caller = user_repo::find_by_id(&state.db, user_id.0)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
    if caller.username != *username {
        return Err(AppError::Forbidden(
            "You can only view your own prayer requests".to_string(),
        ));
    }

    let user = user_repo::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let total = prayer_request_repo::count_by_user(&state.db, user.id).await?;
    let window = PageWindow::resolve(
        PageWindow::parse_page(query.page.as_deref()),
        state.config.feed.user_page_size,
        total,
    )?;
    let items =
        prayer_request_repo::list_by_user(&state.db, user.id, window.limit(), window.offset())
            .await?;

    Ok(HttpResponse::Ok().json(window.into_page(items)))
}

/// `GET /api/v1/offer-prayers?q=`
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let q = query.q.trim();
    if q.is_empty() {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "query": q, "users": [] })));
    }

    let users = user_repo::search_by_username(&state.db, q).await?;
    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();

    let mut by_user: HashMap<Uuid, Vec<PrayerRequest>> = HashMap::new();
    for request in prayer_request_repo::list_for_users(&state.db, &ids).await? {
        by_user.entry(request.user_id).or_default().push(request);
    }

    let default_image = &state.config.media.default_profile_image_url;
    let results: Vec<UserRequests> = users
        .into_iter()
        .map(|user| UserRequests {
            user_id: user.id,
            profile_image_url: user.profile_image_url(default_image),
            requests: by_user.remove(&user.id).unwrap_or_default(),
            username: user.username,
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "query": q, "users": results })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_defaults_to_general() {
        let req: CreatePrayerRequest =
            serde_json::from_str(r#"{"title": "Surgery", "content": "Tomorrow at 9"}"#).unwrap();
        assert_eq!(req.category, Category::General);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn unknown_category_fails_to_parse() {
        let parsed = serde_json::from_str::<CreatePrayerRequest>(
            r#"{"title": "t", "content": "c", "category": "Sports"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn long_title_is_rejected() {
        let req = CreatePrayerRequest {
            title: "x".repeat(101),
            content: "c".to_string(),
            category: Category::Healing,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn offer_content_is_optional() {
        let offer: OfferPrayerRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(offer.content, "");
    }
}
