//! Signed tokens for sessions and password resets.
//!
//! HS256 keyed by `SECRET_KEY`. The `purpose` claim keeps a reset token from
//! being replayed as a session and vice versa.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::error::{AppError, Result};

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    PasswordReset,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub purpose: TokenPurpose,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token and its lifetime in seconds
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: Duration,
    remember_ttl: Duration,
    reset_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &SecurityConfig) -> Self {
        let secret = config.secret_key.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            session_ttl: Duration::hours(config.session_ttl_hours),
            remember_ttl: Duration::days(config.remember_ttl_days),
            reset_ttl: Duration::seconds(config.reset_token_ttl_secs),
        }
    }

    /// Session token; `remember` selects the long-lived variant.
    pub fn issue_session(&self, user_id: Uuid, remember: bool) -> Result<IssuedToken> {
        let ttl = if remember {
            self.remember_ttl
        } else {
            self.session_ttl
        };
        self.issue(user_id, TokenPurpose::Session, ttl)
    }

    pub fn issue_password_reset(&self, user_id: Uuid) -> Result<IssuedToken> {
        self.issue(user_id, TokenPurpose::PasswordReset, self.reset_ttl)
    }

    /// Validate signature, expiry and purpose and return the user ID.
    pub fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<Uuid> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        if data.claims.purpose != purpose {
            return Err(AppError::Unauthorized("Invalid or expired token".to_string()));
        }

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
    }

    fn issue(&self, user_id: Uuid, purpose: TokenPurpose, ttl: Duration) -> Result<IssuedToken> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            purpose,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_in: ttl.num_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> SecurityConfig {
        SecurityConfig {
            secret_key: secret.to_string(),
            session_ttl_hours: 24,
            remember_ttl_days: 365,
            reset_token_ttl_secs: 1800,
        }
    }

    #[test]
    fn session_token_round_trip() {
        let issuer = TokenIssuer::new(&config("secret"));
        let user_id = Uuid::new_v4();

        let issued = issuer.issue_session(user_id, false).unwrap();
        assert_eq!(issued.expires_in, 24 * 3600);
        assert_eq!(
            issuer.verify(&issued.token, TokenPurpose::Session).unwrap(),
            user_id
        );

        let remembered = issuer.issue_session(user_id, true).unwrap();
        assert_eq!(remembered.expires_in, 365 * 24 * 3600);
    }

    #[test]
    fn reset_token_cannot_be_used_as_session() {
        let issuer = TokenIssuer::new(&config("secret"));
        let reset = issuer.issue_password_reset(Uuid::new_v4()).unwrap();
        assert_eq!(reset.expires_in, 1800);

        assert!(issuer.verify(&reset.token, TokenPurpose::Session).is_err());
        assert!(issuer
            .verify(&reset.token, TokenPurpose::PasswordReset)
            .is_ok());
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let ours = TokenIssuer::new(&config("secret"));
        let theirs = TokenIssuer::new(&config("other-secret"));
        let issued = theirs.issue_session(Uuid::new_v4(), false).unwrap();
        assert!(matches!(
            ours.verify(&issued.token, TokenPurpose::Session),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_reset_token_is_rejected() {
        let issuer = TokenIssuer::new(&config("secret"));
        let past = Utc::now() - Duration::hours(1);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            purpose: TokenPurpose::PasswordReset,
            iat: (past - Duration::seconds(1800)).timestamp(),
            exp: past.timestamp(),
        };
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(issuer.verify(&token, TokenPurpose::PasswordReset).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let issuer = TokenIssuer::new(&config("secret"));
        assert!(issuer.verify("not.a.token", TokenPurpose::Session).is_err());
    }
}
