use actix_web::{web, App, HttpServer};
use anyhow::Context;
use db_pool::create_pool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prayer_service::app_state::verse_client;
use prayer_service::db::PgRecentPrayerRequests;
use prayer_service::middleware::MetricsMiddleware;
use prayer_service::services::{DailyVerseCache, S3ProfileImageStore, SystemClock};
use prayer_service::{routes, AppState, Collaborators, Config};

/// PrayNet prayer service
///
/// # Routes
///
/// - `/api/v1/home`, `/api/v1/daily-verse`, `/api/v1/trending` - landing page feed
/// - `/api/v1/users/*` - accounts, profile pictures, password reset
/// - `/api/v1/prayer-requests/*` - requests and prayer offers
/// - `/api/v1/offer-prayers` - search users to pray for
/// - `/health`, `/metrics`
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Container healthcheck: `prayer-service healthcheck`
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        let port = std::env::var("APP_PORT").unwrap_or_else(|_| "8080".to_string());
        let url = format!("http://127.0.0.1:{}/health", port);
        let resp = reqwest::get(&url).await.context("healthcheck request failed")?;
        anyhow::ensure!(
            resp.status().is_success(),
            "healthcheck HTTP status: {}",
            resp.status()
        );
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true),
        )
        .init();

    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to load configuration")?;

    tracing::info!("Starting prayer-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_cfg = config.database.pool_config("prayer-service");
    db_cfg.log_config();

    let pool = create_pool(db_cfg)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let profile_images = S3ProfileImageStore::from_env(
        config.media.s3_bucket.clone(),
        config.media.public_base_url.clone(),
    )
    .await;

    let parts = Collaborators {
        verse_source: Arc::new(verse_client(&config)?),
        verse_cache: Arc::new(DailyVerseCache::new()),
        trending_store: Arc::new(PgRecentPrayerRequests::new(pool.clone())),
        profile_images: Arc::new(profile_images),
        clock: Arc::new(SystemClock),
    };

    let bind = (config.app.host.clone(), config.app.port);
    let state = web::Data::new(AppState::new(config, pool, parts)?);

    tracing::info!(host = %bind.0, port = bind.1, "HTTP server is running");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(MetricsMiddleware)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes::configure)
    })
    .bind(bind)
    .context("failed to bind HTTP listener")?
    .run()
    .await
    .context("HTTP server error")?;

    tracing::info!("prayer-service stopped");
    Ok(())
}
