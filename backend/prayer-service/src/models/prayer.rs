use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed set of prayer request categories
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    General,
    Healing,
    Guidance,
    Thanksgiving,
    Family,
    Financial,
    Relationships,
    #[serde(rename = "Spiritual Growth")]
    SpiritualGrowth,
    Protection,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::General,
        Category::Healing,
        Category::Guidance,
        Category::Thanksgiving,
        Category::Family,
        Category::Financial,
        Category::Relationships,
        Category::SpiritualGrowth,
        Category::Protection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Healing => "Healing",
            Category::Guidance => "Guidance",
            Category::Thanksgiving => "Thanksgiving",
            Category::Family => "Family",
            Category::Financial => "Financial",
            Category::Relationships => "Relationships",
            Category::SpiritualGrowth => "Spiritual Growth",
            Category::Protection => "Protection",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Not a valid choice: {}", s))
    }
}

/// A prayer request joined with its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct PrayerRequest {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub user_id: Uuid,
    pub date_posted: DateTime<Utc>,
    pub author_username: String,
    pub author_image: Option<String>,
}

/// A prayer offered in response to a request
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PrayerOffer {
    pub id: i64,
    pub content: String,
    pub user_id: Uuid,
    pub prayer_request_id: i64,
    pub date_posted: DateTime<Utc>,
    pub author_username: String,
}
