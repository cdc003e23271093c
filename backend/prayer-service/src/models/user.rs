use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub image_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Uploaded picture, or the site default when none was set.
    pub fn profile_image_url(&self, default_url: &str) -> String {
        self.image_file
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| default_url.to_string())
    }

    pub fn profile(&self, default_image_url: &str) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            profile_image_url: self.profile_image_url(default_image_url),
            created_at: self.created_at,
        }
    }
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_image_url: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(image_file: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "grace".to_string(),
            email: "grace@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            image_file: image_file.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn profile_image_falls_back_to_default() {
        assert_eq!(user(None).profile_image_url("/default.png"), "/default.png");
        assert_eq!(user(Some("")).profile_image_url("/default.png"), "/default.png");
        assert_eq!(
            user(Some("https://cdn/p.png")).profile_image_url("/default.png"),
            "https://cdn/p.png"
        );
    }

    #[test]
    fn profile_omits_password_hash() {
        let json = serde_json::to_value(user(None).profile("/d.png")).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["profile_image_url"], "/d.png");
    }
}
