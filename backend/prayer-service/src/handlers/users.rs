/// Account handlers: registration, login and profile management
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{User, UserProfile};
use crate::security::password;
use crate::services::profile_images::{save_profile_picture, ImageFormat};

pub const LOGIN_FAILED: &str = "Login Unsuccessful. Please check email and password";
pub const USERNAME_TAKEN: &str = "That username is taken. Please choose a different one.";
pub const EMAIL_TAKEN: &str = "That email is taken. Please choose a different one.";
pub const IMAGES_ONLY: &str = "Images only!";

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 20, message = "Username must be between 2 and 20 characters long"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 30, message = "Password must be between 8 and 30 characters long"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 20, message = "Username must be between 2 and 20 characters long"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

fn profile(state: &AppState, user: &User) -> UserProfile {
    user.profile(&state.config.media.default_profile_image_url)
}

async fn current_user(state: &AppState, user_id: UserId) -> Result<User> {
    user_repo::find_by_id(&state.db, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// `POST /api/v1/users/register`
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    if user_repo::username_taken(&state.db, &payload.username, None).await? {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }
    if user_repo::email_taken(&state.db, &payload.email, None).await? {
        return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let password_hash = password::hash_password(&payload.password)?;
    let user =
        user_repo::create_user(&state.db, &payload.username, &payload.email, &password_hash)
            .await?;

    info!(user_id = %user.id, username = %user.username, "account created");
    Ok(HttpResponse::Created().json(profile(&state, &user)))
}

/// `POST /api/v1/users/login`
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let user = user_repo::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(LOGIN_FAILED.to_string()))?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(LOGIN_FAILED.to_string()));
    }

    let issued = state.tokens.issue_session(user.id, payload.remember)?;
    info!(user_id = %user.id, remember = payload.remember, "user logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: issued.token,
        token_type: "Bearer",
        expires_in: issued.expires_in,
        user: profile(&state, &user),
    }))
}

/// `POST /api/v1/users/logout`
///
/// Sessions are stateless bearer tokens; the client drops its copy.
pub async fn logout(user_id: UserId) -> HttpResponse {
    info!(user_id = %user_id.0, "user logged out");
    HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out" }))
}

/// `GET /api/v1/users/me`
pub async fn get_me(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user = current_user(&state, user_id).await?;
    Ok(HttpResponse::Ok().json(profile(&state, &user)))
}

/// `PUT /api/v1/users/me`
pub async fn update_me(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    if user_repo::username_taken(&state.db, &payload.username, Some(user_id.0)).await? {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }
    if user_repo::email_taken(&state.db, &payload.email, Some(user_id.0)).await? {
        return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let user = user_repo::update_profile(&state.db, user_id.0, &payload.username, &payload.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    info!(user_id = %user.id, "profile updated");
    Ok(HttpResponse::Ok().json(profile(&state, &user)))
}

/// `PUT /api/v1/users/me/picture`
///
/// The body is the raw image; `Content-Type` must be JPEG or PNG.
pub async fn update_picture(
    state: web::Data<AppState>,
    user_id: UserId,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let format = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(ImageFormat::from_content_type)
        .ok_or_else(|| AppError::BadRequest(IMAGES_ONLY.to_string()))?;

    if body.is_empty() {
        return Err(AppError::BadRequest(IMAGES_ONLY.to_string()));
    }

    let url = save_profile_picture(
        state.profile_images.as_ref(),
        user_id.0,
        body.to_vec(),
        format,
    )
    .await?;

    let user = user_repo::update_image(&state.db, user_id.0, &url)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(profile(&state, &user)))
}

/// `DELETE /api/v1/users/me`
pub async fn delete_me(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    if !user_repo::delete_user(&state.db, user_id.0).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    info!(user_id = %user_id.0, "account deleted");
    Ok(HttpResponse::NoContent().finish())
}
