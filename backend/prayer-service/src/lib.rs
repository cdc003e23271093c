//! PrayNet prayer service
//!
//! JSON API for sharing prayer requests, offering prayers in response, and
//! the landing page feed (verse of the day and trending requests).

pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

pub use app_state::{AppState, Collaborators};
pub use config::Config;
pub use error::{AppError, Result};
