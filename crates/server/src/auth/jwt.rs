use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::session_settings;

/// Discriminates access from refresh tokens so one cannot stand in for the other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by both token types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub typ: TokenType,
}

/// Identity needed to mint a token pair.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: i64,
    pub email: &'a str,
    pub role: &'a str,
}

impl<'a> From<&'a Claims> for TokenSubject<'a> {
    fn from(claims: &'a Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: &claims.email,
            role: &claims.role,
        }
    }
}

/// Hex SHA-256 of a raw token. Only this hash is stored server-side.
pub fn hash_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").expect("JWT_SECRET must be set")
}

fn sign(subject: TokenSubject<'_>, typ: TokenType, lifetime: Duration) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + lifetime;
    let claims = Claims {
        sub: subject.user_id,
        email: subject.email.to_string(),
        role: subject.role.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
        typ,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )?;
    Ok((token, expires_at))
}

pub fn create_access_token(subject: TokenSubject<'_>) -> Result<String, jsonwebtoken::errors::Error> {
    let minutes = session_settings().access_token_minutes;
    sign(subject, TokenType::Access, Duration::minutes(minutes)).map(|(token, _)| token)
}

/// Returns the token and its expiry (persisted next to the hash).
pub fn create_refresh_token(
    subject: TokenSubject<'_>,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let days = session_settings().refresh_token_days;
    sign(subject, TokenType::Refresh, Duration::days(days))
}

fn validate(token: &str, expected: TokenType) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )?;
    if data.claims.typ != expected {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(data.claims)
}

pub fn validate_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    validate(token, TokenType::Access)
}

pub fn validate_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    validate(token, TokenType::Refresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_secret() {
        std::env::set_var("JWT_SECRET", "policydesk-unit-test-secret");
    }

    fn subject(role: &str) -> TokenSubject<'_> {
        TokenSubject {
            user_id: 42,
            email: "reviewer@policydesk.test",
            role,
        }
    }

    #[test]
    fn access_token_round_trip() {
        setup_test_secret();
        let token = create_access_token(subject("reviewer")).unwrap();
        let claims = validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "reviewer");
        assert_eq!(claims.typ, TokenType::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_rejected() {
        setup_test_secret();
        let (token, _) = sign(subject("agent"), TokenType::Access, Duration::hours(-2)).unwrap();
        assert!(validate_access_token(&token).is_err());
    }

    #[test]
    fn garbage_rejected() {
        setup_test_secret();
        assert!(validate_access_token("not.a.jwt").is_err());
        assert!(validate_access_token("").is_err());
    }

    #[test]
    fn token_types_are_not_interchangeable() {
        setup_test_secret();
        let access = create_access_token(subject("admin")).unwrap();
        let (refresh, _) = create_refresh_token(subject("admin")).unwrap();
        assert!(validate_refresh_token(&access).is_err());
        assert!(validate_access_token(&refresh).is_err());
    }

    #[test]
    fn refresh_outlives_access() {
        setup_test_secret();
        let access = create_access_token(subject("admin")).unwrap();
        let (refresh, expires_at) = create_refresh_token(subject("admin")).unwrap();
        let access_claims = validate_access_token(&access).unwrap();
        let refresh_claims = validate_refresh_token(&refresh).unwrap();
        assert!(refresh_claims.exp > access_claims.exp);
        assert_eq!(refresh_claims.exp, expires_at.timestamp());
    }

    #[test]
    fn hash_token_is_stable_hex() {
        let a = hash_token("header.payload.sig");
        assert_eq!(a, hash_token("header.payload.sig"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, hash_token("header.payload.other"));
    }
}
