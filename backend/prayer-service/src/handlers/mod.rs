/// HTTP handlers
///
/// - home: landing page data, daily verse, trending, health
/// - users: registration, login and profile management
/// - password_reset: reset emails and token redemption
/// - prayer_requests: requests, offers and user search
pub mod home;
pub mod password_reset;
pub mod prayer_requests;
pub mod users;
