use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Error, Result};

pub const TOKEN_TTL_HOURS: i64 = 24;

/// Identity carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and checks HS256 bearer tokens with a fixed validity window.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    pub fn issue(&self, id: Uuid, email: &str) -> Result<String> {
        self.issue_at(id, email, Utc::now())
    }

    pub fn issue_at(&self, id: Uuid, email: &str, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            id,
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("failed to sign token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Error::TokenExpired,
                _ => Error::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_same_identity() {
        let issuer = TokenIssuer::new("secret");
        let id = Uuid::new_v4();
        let token = issuer.issue(id, "a@example.com").unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.id, id);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn token_past_its_window_is_expired() {
        let issuer = TokenIssuer::new("secret");
        let issued_at = Utc::now() - Duration::hours(TOKEN_TTL_HOURS) - Duration::seconds(5);
        let token = issuer.issue_at(Uuid::new_v4(), "a@example.com", issued_at).unwrap();

        assert!(matches!(issuer.verify(&token), Err(Error::TokenExpired)));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let token = TokenIssuer::new("one")
            .issue(Uuid::new_v4(), "a@example.com")
            .unwrap();

        assert!(matches!(
            TokenIssuer::new("two").verify(&token),
            Err(Error::InvalidToken)
        ));
        assert!(matches!(
            TokenIssuer::new("one").verify("not-a-token"),
            Err(Error::InvalidToken)
        ));
    }
}
