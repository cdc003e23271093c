/// Configuration management for the prayer service
///
/// Everything is read from environment variables. `main` loads a `.env`
/// file first, so local development can keep them there.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const DEV_SECRET_KEY: &str = "praynet-development-secret-do-not-use-in-production";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub daily_verse: DailyVerseConfig,
    pub feed: FeedConfig,
    pub email: EmailConfig,
    pub media: MediaConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    /// Base URL used when building links that leave the API, e.g. in emails
    pub public_base_url: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

impl DatabaseConfig {
    /// Pool settings for `service_name`. Sizing and timeouts come from the
    /// `DB_*` variables read by `db_pool`.
    pub fn pool_config(&self, service_name: &str) -> db_pool::DbConfig {
        let mut pool = db_pool::DbConfig::for_service(service_name);
        pool.database_url = self.url.clone();
        pool
    }
}

/// Token signing and lifetimes
#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub secret_key: String,
    pub session_ttl_hours: i64,
    /// Session lifetime when the user ticks "remember me"
    pub remember_ttl_days: i64,
    pub reset_token_ttl_secs: i64,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret_key", &"[REDACTED]")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("remember_ttl_days", &self.remember_ttl_days)
            .field("reset_token_ttl_secs", &self.reset_token_ttl_secs)
            .finish()
    }
}

/// External verse lookup service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyVerseConfig {
    pub api_base_url: String,
    pub timeout_secs: u64,
}

/// Home page and trending sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub trending_window_days: u32,
    pub trending_limit: u32,
    pub home_page_size: i64,
    pub user_page_size: i64,
}

/// SMTP settings. An empty `server` puts the mailer in no-op mode.
#[derive(Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub server: String,
    pub port: u16,
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub default_sender: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("default_sender", &self.default_sender)
            .finish()
    }
}

/// Profile image storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub s3_bucket: String,
    /// Public URL prefix objects in the bucket are served from
    pub public_base_url: String,
    pub default_profile_image_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let port: u16 = parse_env_or_default("APP_PORT", 8080)?;

        let app = AppConfig {
            env: app_env,
            host: env_or("APP_HOST", "0.0.0.0"),
            port,
            public_base_url: env_or("PUBLIC_BASE_URL", &format!("http://localhost:{}", port)),
        };

        let secret_key = match std::env::var("SECRET_KEY") {
            Ok(value) if !value.trim().is_empty() => value,
            _ if app.is_production() => {
                return Err("SECRET_KEY must be set in production".to_string())
            }
            _ => {
                tracing::warn!("SECRET_KEY not set; using the development key");
                DEV_SECRET_KEY.to_string()
            }
        };

        let email_user = optional_env("EMAIL_USER");
        let default_sender = optional_env("MAIL_DEFAULT_SENDER")
            .or_else(|| email_user.clone())
            .unwrap_or_else(|| "PrayNet <no-reply@praynet.dev>".to_string());

        Ok(Config {
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", "postgres://localhost/praynet"),
            },
            security: SecurityConfig {
                secret_key,
                session_ttl_hours: parse_env_or_default("SESSION_TTL_HOURS", 24)?,
                remember_ttl_days: parse_env_or_default("REMEMBER_TTL_DAYS", 365)?,
                reset_token_ttl_secs: parse_env_or_default("RESET_TOKEN_TTL_SECS", 1800)?,
            },
            daily_verse: DailyVerseConfig {
                api_base_url: env_or("VERSE_API_BASE_URL", "https://bible-api.com"),
                timeout_secs: parse_env_or_default("VERSE_API_TIMEOUT_SECS", 5)?,
            },
            feed: FeedConfig {
                trending_window_days: parse_env_or_default("TRENDING_WINDOW_DAYS", 7)?,
                trending_limit: parse_env_or_default("TRENDING_LIMIT", 5)?,
                home_page_size: parse_env_or_default("HOME_PAGE_SIZE", 3)?,
                user_page_size: parse_env_or_default("USER_PAGE_SIZE", 5)?,
            },
            email: EmailConfig {
                server: env_or("MAIL_SERVER", ""),
                port: parse_env_or_default("MAIL_PORT", 587)?,
                use_tls: std::env::var("MAIL_USE_TLS")
                    .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                    .unwrap_or(false),
                username: email_user,
                password: optional_env("EMAIL_PASS"),
                default_sender,
            },
            media: MediaConfig {
                s3_bucket: env_or("S3_BUCKET", "praynet-media"),
                public_base_url: env_or(
                    "MEDIA_PUBLIC_BASE_URL",
                    "https://praynet-media.s3.amazonaws.com",
                ),
                default_profile_image_url: env_or(
                    "DEFAULT_PROFILE_IMAGE_URL",
                    "/static/images/profile_pics/default.png",
                ),
            },
            app,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "APP_ENV",
        "APP_PORT",
        "SECRET_KEY",
        "TRENDING_WINDOW_DAYS",
        "TRENDING_LIMIT",
        "HOME_PAGE_SIZE",
        "MAIL_USE_TLS",
        "EMAIL_USER",
        "MAIL_DEFAULT_SENDER",
        "EMAIL_PASS",
        "DATABASE_URL",
        "DB_MAX_CONNECTIONS",
        "DB_MIN_CONNECTIONS",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_environment() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.app.port, 8080);
        assert_eq!(config.feed.trending_window_days, 7);
        assert_eq!(config.feed.trending_limit, 5);
        assert_eq!(config.feed.home_page_size, 3);
        assert_eq!(config.feed.user_page_size, 5);
        assert_eq!(config.security.reset_token_ttl_secs, 1800);
        assert_eq!(config.daily_verse.api_base_url, "https://bible-api.com");
        assert!(!config.email.use_tls);
        assert_eq!(config.security.secret_key, DEV_SECRET_KEY);
    }

    #[test]
    #[serial]
    fn pool_size_comes_from_db_max_connections() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://db.internal/praynet");
        std::env::set_var("DB_MAX_CONNECTIONS", "4");
        std::env::set_var("DB_MIN_CONNECTIONS", "9");

        let config = Config::from_env().unwrap();
        let pool = config.database.pool_config("prayer-service");

        assert_eq!(pool.database_url, "postgres://db.internal/praynet");
        assert_eq!(pool.max_connections, 4);
        assert_eq!(pool.min_connections, 4);
        clear_env();
    }

    #[test]
    #[serial]
    fn production_requires_secret_key() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("SECRET_KEY"));

        std::env::set_var("SECRET_KEY", "s3cret");
        let config = Config::from_env().unwrap();
        assert_eq!(config.security.secret_key, "s3cret");
        clear_env();
    }

    #[test]
    #[serial]
    fn invalid_numbers_are_reported() {
        clear_env();
        std::env::set_var("TRENDING_LIMIT", "five");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("TRENDING_LIMIT"));
        clear_env();
    }

    #[test]
    #[serial]
    fn sender_falls_back_to_email_user() {
        clear_env();
        std::env::set_var("EMAIL_USER", "prayers@example.com");
        std::env::set_var("EMAIL_PASS", "hunter2");
        let config = Config::from_env().unwrap();
        assert_eq!(config.email.default_sender, "prayers@example.com");

        let rendered = format!("{:?}", config.email);
        assert!(!rendered.contains("hunter2"));
        clear_env();
    }
}
