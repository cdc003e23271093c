/// Database access layer
///
/// Free functions over `&PgPool`, one module per table.
pub mod prayer_offer_repo;
pub mod prayer_request_repo;
pub mod user_repo;

pub use prayer_request_repo::PgRecentPrayerRequests;
