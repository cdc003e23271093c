use crate::error::{AppError, Result};
use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, image_file, created_at";

/// Create a new user
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation)
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE id = $1",
        USER_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = $1",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Whether another account already uses `username`. `except` excludes the
/// caller's own row when editing a profile.
pub async fn username_taken(pool: &PgPool, username: &str, except: Option<Uuid>) -> Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(username)
    .bind(except)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

pub async fn email_taken(pool: &PgPool, email: &str, except: Option<Uuid>) -> Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(except)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

/// Update username and email. Returns `None` if the user no longer exists.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    username: &str,
    email: &str,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET username = $1, email = $2 WHERE id = $3 RETURNING {}",
        USER_COLUMNS
    ))
    .bind(username)
    .bind(email)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(map_unique_violation)
}

pub async fn update_image(pool: &PgPool, user_id: Uuid, image_url: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET image_file = $1 WHERE id = $2 RETURNING {}",
        USER_COLUMNS
    ))
    .bind(image_url)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn update_password(pool: &PgPool, user_id: Uuid, password_hash: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a user. Their prayer requests and offers go with them.
pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Case-insensitive substring match on username
pub async fn search_by_username(pool: &PgPool, query: &str) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username ILIKE $1 ORDER BY username",
        USER_COLUMNS
    ))
    .bind(format!("%{}%", query))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = match db_err.constraint() {
                Some(c) if c.contains("username") => {
                    "That username is taken. Please choose a different one."
                }
                _ => "That email is taken. Please choose a different one.",
            };
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::from(err)
}
