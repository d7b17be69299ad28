//! Token issuance and verification.
//!
//! Sign-in hands out three credentials: a short-lived access token carrying
//! the profile claims, a long-lived refresh token carrying only the username,
//! and a CSRF token that is also embedded in the access token so the guard
//! can compare the two without server-side session state.

pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::User;

pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking, PasswordError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub csrf: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub username: String,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
    pub csrf_token: String,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
    #[error("{0}")]
    Invalid(String),
}

fn sign<T: Serialize>(claims: &T, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

fn verify<T: DeserializeOwned>(token: &str, security: &SecurityConfig) -> Result<T, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }
    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    decode::<T>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::Invalid(e.to_string()))
}

/// New access token plus the CSRF token embedded in it.
pub fn issue_access_token(user: &User, security: &SecurityConfig) -> Result<AccessToken, JwtError> {
    let now = Utc::now();
    let csrf_token = Uuid::new_v4().simple().to_string();
    let claims = AccessClaims {
        sub: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        csrf: csrf_token.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(security.access_token_expiry_minutes)).timestamp(),
    };
    Ok(AccessToken {
        access_token: sign(&claims, security)?,
        csrf_token,
    })
}

pub fn issue_refresh_token(user: &User, security: &SecurityConfig) -> Result<String, JwtError> {
    let now = Utc::now();
    let claims = RefreshClaims {
        username: user.username.clone(),
        jti: Uuid::new_v4(),
        iat: now.timestamp(),
        exp: (now + Duration::days(security.refresh_token_expiry_days)).timestamp(),
    };
    sign(&claims, security)
}

pub fn issue_tokens(user: &User, security: &SecurityConfig) -> Result<IssuedTokens, JwtError> {
    let access = issue_access_token(user, security)?;
    Ok(IssuedTokens {
        access_token: access.access_token,
        refresh_token: issue_refresh_token(user, security)?,
        csrf_token: access.csrf_token,
    })
}

pub fn decode_access_token(token: &str, security: &SecurityConfig) -> Result<AccessClaims, JwtError> {
    verify(token, security)
}

pub fn decode_refresh_token(token: &str, security: &SecurityConfig) -> Result<RefreshClaims, JwtError> {
    verify(token, security)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn user() -> User {
        User::new("alice".into(), "alice@example.com".into(), "h".into())
    }

    #[test]
    fn access_token_round_trips_profile_claims() {
        let security = AppConfig::development().security;
        let user = user();
        let tokens = issue_tokens(&user, &security).unwrap();

        let claims = decode_access_token(&tokens.access_token, &security).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.csrf, tokens.csrf_token);
        assert!(claims.exp > claims.iat);

        let refresh = decode_refresh_token(&tokens.refresh_token, &security).unwrap();
        assert_eq!(refresh.username, "alice");
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let security = AppConfig::development().security;
        let tokens = issue_tokens(&user(), &security).unwrap();
        assert!(decode_access_token(&tokens.refresh_token, &security).is_err());
        assert!(decode_refresh_token(&tokens.access_token, &security).is_err());
    }

    #[test]
    fn refresh_tokens_are_unique_per_issue() {
        let security = AppConfig::development().security;
        let user = user();
        let a = issue_refresh_token(&user, &security).unwrap();
        let b = issue_refresh_token(&user, &security).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let security = AppConfig::development().security;
        let tokens = issue_tokens(&user(), &security).unwrap();
        let mut other = security.clone();
        other.jwt_secret = "another-secret".into();
        assert!(matches!(
            decode_access_token(&tokens.access_token, &other),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let security = AppConfig::production().security;
        assert!(matches!(issue_tokens(&user(), &security), Err(JwtError::InvalidSecret)));
    }
}
