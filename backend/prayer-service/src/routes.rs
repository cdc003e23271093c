//! Route table, shared by the binary and the HTTP tests.

use actix_web::{error, web, HttpRequest};

use crate::error::AppError;
use crate::handlers::{home, password_reset, prayer_requests, users};
use crate::metrics::serve_metrics;
use crate::middleware::JwtAuthMiddleware;

/// Largest accepted profile picture upload
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
        .route("/health", web::get().to(home::health))
        .route("/metrics", web::get().to(serve_metrics))
        .service(
            web::scope("/api/v1")
                .route("/home", web::get().to(home::home))
                .route("/daily-verse", web::get().to(home::daily_verse))
                .route("/trending", web::get().to(home::trending))
                .route("/offer-prayers", web::get().to(prayer_requests::search))
                .service(
                    web::scope("/users")
                        .route("/register", web::post().to(users::register))
                        .route("/login", web::post().to(users::login))
                        .route(
                            "/password-reset/request",
                            web::post().to(password_reset::request_reset),
                        )
                        .route(
                            "/password-reset/{token}",
                            web::post().to(password_reset::reset_password),
                        )
                        .service(
                            web::resource("/logout")
                                .wrap(JwtAuthMiddleware)
                                .route(web::post().to(users::logout)),
                        )
                        .service(
                            web::resource("/me")
                                .wrap(JwtAuthMiddleware)
                                .route(web::get().to(users::get_me))
                                .route(web::put().to(users::update_me))
                                .route(web::delete().to(users::delete_me)),
                        )
                        .service(
                            web::resource("/me/picture")
                                .wrap(JwtAuthMiddleware)
                                .route(web::put().to(users::update_picture)),
                        )
                        .service(
                            web::resource("/me/password-reset")
                                .wrap(JwtAuthMiddleware)
                                .route(web::post().to(password_reset::request_reset_signed_in)),
                        )
                        .service(
                            web::resource("/{username}/prayer-requests")
                                .wrap(JwtAuthMiddleware)
                                .route(web::get().to(prayer_requests::user_requests)),
                        ),
                )
                .service(
                    web::scope("/prayer-requests")
                        .service(
                            web::resource("")
                                .wrap(JwtAuthMiddleware)
                                .route(web::post().to(prayer_requests::create)),
                        )
                        // GET is public; DELETE authenticates through the `UserId` extractor.
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(prayer_requests::get))
                                .route(web::delete().to(prayer_requests::delete)),
                        )
                        .service(
                            web::resource("/{id}/offers")
                                .wrap(JwtAuthMiddleware)
                                .route(web::post().to(prayer_requests::offer_prayer)),
                        ),
                ),
        );
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    AppError::BadRequest(format!("Invalid request body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}
