use crate::errors::ApiError;
use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

/// Bearer-token claims: user identity plus expiry
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub exp: i64,
}

/// HS256 signing/verification keys, built once from config at startup
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_expiry_secs: i64,
}

impl AuthKeys {
    pub fn new(secret: &str, token_expiry_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_secs,
        }
    }

    pub fn issue_token(&self, user_id: i64, email: &str) -> anyhow::Result<String> {
        let claims = Claims {
            id: user_id,
            email: email.to_string(),
            exp: chrono::Utc::now().timestamp() + self.token_expiry_secs,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &Validation::default()).map(|data| data.claims)
    }
}

/// The authenticated user id, extracted from the Authorization header.
/// Handlers take this as an argument; downstream stages never see the
/// token itself.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: i64,
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(Into::into))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let keys = req
        .app_data::<web::Data<AuthKeys>>()
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Auth keys not configured")))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Validation("token not provided".to_string()))?;

    let claims = keys
        .verify_token(token)
        .map_err(|_| ApiError::Unauthorized("Invalid token.".to_string()))?;

    Ok(AuthenticatedUser { id: claims.id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_same_user() {
        let keys = AuthKeys::new("test-secret", 3600);
        let token = keys.issue_token(42, "a@b.com").unwrap();

        let claims = keys.verify_token(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.email, "a@b.com");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let keys = AuthKeys::new("test-secret", 3600);
        let other = AuthKeys::new("other-secret", 3600);
        let token = other.issue_token(42, "a@b.com").unwrap();

        assert!(keys.verify_token(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let keys = AuthKeys::new("test-secret", 3600);
        let mut token = keys.issue_token(42, "a@b.com").unwrap();
        token.push('x');

        assert!(keys.verify_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = AuthKeys::new("test-secret", -120);
        let token = keys.issue_token(42, "a@b.com").unwrap();

        assert!(keys.verify_token(&token).is_err());
    }
}
