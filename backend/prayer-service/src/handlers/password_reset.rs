/// Password reset: request a reset email, then redeem the emailed token
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::security::{password, TokenPurpose};

pub const NO_SUCH_ACCOUNT: &str = "There is no account with that email. You must register first.";
pub const INVALID_TOKEN: &str = "That is an invalid or expired token";
pub const RESET_EMAIL_SENT: &str =
    "An email has been sent with instructions to reset your password.";

#[derive(Debug, Deserialize, Validate)]
pub struct ResetRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewPasswordRequest {
    #[validate(length(min = 8, max = 30, message = "Password must be between 8 and 30 characters long"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

async fn send_reset_email(state: &AppState, email: &str) -> Result<HttpResponse> {
    let user = user_repo::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| AppError::BadRequest(NO_SUCH_ACCOUNT.to_string()))?;

    let issued = state.tokens.issue_password_reset(user.id)?;
    state
        .email
        .send_password_reset(&user.email, &issued.token)
        .await?;

    info!(user_id = %user.id, "password reset email sent");
    Ok(HttpResponse::Accepted().json(serde_json::json!({ "message": RESET_EMAIL_SENT })))
}

/// `POST /api/v1/users/password-reset/request` for users who forgot their
/// password.
pub async fn request_reset(
    state: web::Data<AppState>,
    payload: web::Json<ResetRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    send_reset_email(&state, &payload.email).await
}

/// `POST /api/v1/users/me/password-reset`, the "change password" flow of a
/// signed-in user.
pub async fn request_reset_signed_in(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: web::Json<ResetRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    info!(user_id = %user_id.0, "password change requested");
    send_reset_email(&state, &payload.email).await
}

/// `POST /api/v1/users/password-reset/{token}`
pub async fn reset_password(
    state: web::Data<AppState>,
    token: web::Path<String>,
    payload: web::Json<NewPasswordRequest>,
) -> Result<HttpResponse> {
    let user_id = state
        .tokens
        .verify(&token, TokenPurpose::PasswordReset)
        .map_err(|_| AppError::BadRequest(INVALID_TOKEN.to_string()))?;

    payload.validate()?;

    let password_hash = password::hash_password(&payload.password)?;
    if !user_repo::update_password(&state.db, user_id, &password_hash).await? {
        return Err(AppError::BadRequest(INVALID_TOKEN.to_string()));
    }

    info!(%user_id, "password reset");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Your password has been updated! You are now able to log in"
    })))
}
