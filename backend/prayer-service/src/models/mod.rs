/// Data models for the prayer service
pub mod pagination;
pub mod prayer;
pub mod user;

pub use pagination::{Page, PageWindow};
pub use prayer::{Category, PrayerOffer, PrayerRequest};
pub use user::{User, UserProfile};
