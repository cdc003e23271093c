use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, PrayerRequest};
use crate::services::trending::RecentPrayerRequests;

/// Prayer request columns joined with the author's name and picture
const SELECT_WITH_AUTHOR: &str = r#"
    SELECT pr.id, pr.title, pr.content, pr.category, pr.user_id, pr.date_posted,
           u.username AS author_username, u.image_file AS author_image
    FROM prayer_requests pr
    JOIN users u ON u.id = pr.user_id
"#;

/// Create a prayer request and return it with its author
pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    content: &str,
    category: Category,
) -> Result<PrayerRequest> {
    let request = sqlx::query_as::<_, PrayerRequest>(
        r#"
        WITH inserted AS (
            INSERT INTO prayer_requests (title, content, category, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, category, user_id, date_posted
        )
        SELECT i.id, i.title, i.content, i.category, i.user_id, i.date_posted,
               u.username AS author_username, u.image_file AS author_image
        FROM inserted i
        JOIN users u ON u.id = i.user_id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(category.as_str())
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(request)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<PrayerRequest>> {
    let request = sqlx::query_as::<_, PrayerRequest>(&format!(
        "{} WHERE pr.id = $1",
        SELECT_WITH_AUTHOR
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(request)
}

/// Delete a prayer request and, by cascade, its offers
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM prayer_requests WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Newest requests, optionally restricted to one category
pub async fn list_recent(
    pool: &PgPool,
    category: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<PrayerRequest>> {
    let requests = sqlx::query_as::<_, PrayerRequest>(&format!(
        r#"{}
        WHERE ($1::text IS NULL OR pr.category = $1)
        ORDER BY pr.date_posted DESC, pr.id DESC
        LIMIT $2 OFFSET $3"#,
        SELECT_WITH_AUTHOR
    ))
    .bind(category)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

pub async fn count(pool: &PgPool, category: Option<&str>) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM prayer_requests WHERE ($1::text IS NULL OR category = $1)",
    )
    .bind(category)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// One page of a user's requests, newest first
pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PrayerRequest>> {
    let requests = sqlx::query_as::<_, PrayerRequest>(&format!(
        r#"{}
        WHERE pr.user_id = $1
        ORDER BY pr.date_posted DESC, pr.id DESC
        LIMIT $2 OFFSET $3"#,
        SELECT_WITH_AUTHOR
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

pub async fn count_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM prayer_requests WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// Every request of each listed user, newest first
pub async fn list_for_users(pool: &PgPool, user_ids: &[Uuid]) -> Result<Vec<PrayerRequest>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let requests = sqlx::query_as::<_, PrayerRequest>(&format!(
        r#"{}
        WHERE pr.user_id = ANY($1)
        ORDER BY pr.date_posted DESC, pr.id DESC"#,
        SELECT_WITH_AUTHOR
    ))
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// Requests posted at or after `since`, newest first
pub async fn posted_since(
    pool: &PgPool,
    since: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<PrayerRequest>> {
    let requests = sqlx::query_as::<_, PrayerRequest>(&format!(
        r#"{}
        WHERE pr.date_posted >= $1
        ORDER BY pr.date_posted DESC
        LIMIT $2"#,
        SELECT_WITH_AUTHOR
    ))
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// Postgres-backed store for the trending query
#[derive(Clone)]
pub struct PgRecentPrayerRequests {
    pool: PgPool,
}

impl PgRecentPrayerRequests {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecentPrayerRequests for PgRecentPrayerRequests {
    async fn posted_since(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<PrayerRequest>> {
        posted_since(&self.pool, since, limit).await
    }
}
