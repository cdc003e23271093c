use crate::error::Result;
use crate::models::PrayerOffer;
use sqlx::PgPool;
use uuid::Uuid;

/// Record a prayer offered on a request
pub async fn create(
    pool: &PgPool,
    prayer_request_id: i64,
    user_id: Uuid,
    content: &str,
) -> Result<PrayerOffer> {
    let offer = sqlx::query_as::<_, PrayerOffer>(
        r#"
        WITH inserted AS (
            INSERT INTO prayer_offers (content, user_id, prayer_request_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, user_id, prayer_request_id, date_posted
        )
        SELECT i.id, i.content, i.user_id, i.prayer_request_id, i.date_posted,
               u.username AS author_username
        FROM inserted i
        JOIN users u ON u.id = i.user_id
        "#,
    )
    .bind(content)
    .bind(user_id)
    .bind(prayer_request_id)
    .fetch_one(pool)
    .await?;

    Ok(offer)
}

/// Offers on a request, oldest first
pub async fn list_for_request(pool: &PgPool, prayer_request_id: i64) -> Result<Vec<PrayerOffer>> {
    let offers = sqlx::query_as::<_, PrayerOffer>(
        r#"
        SELECT po.id, po.content, po.user_id, po.prayer_request_id, po.date_posted,
               u.username AS author_username
        FROM prayer_offers po
        JOIN users u ON u.id = po.user_id
        WHERE po.prayer_request_id = $1
        ORDER BY po.date_posted ASC, po.id ASC
        "#,
    )
    .bind(prayer_request_id)
    .fetch_all(pool)
    .await?;

    Ok(offers)
}
