//! JWT adapter for the auth gate's bearer credential.
//!
//! HS256 with the secret and expiry from configuration. The domain never
//! sees JWT details; it issues and resolves opaque strings through the
//! `TokenService` port.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenError, TokenService};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user id.
    sub: String,
    /// Expiry as a UNIX timestamp.
    exp: i64,
    /// Issued-at as a UNIX timestamp.
    iat: i64,
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl JwtTokenService {
    /// Build the service from the shared secret and token validity in
    /// seconds.
    pub fn new(secret: &str, validity_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validity: Duration::seconds(validity_seconds),
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.validity).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| TokenError::issue(err.to_string()))
    }

    fn resolve(&self, credential: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(credential, &self.decoding_key, &Validation::default())
            .map_err(|_| TokenError::invalid_token())?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::invalid_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn issued_tokens_resolve_to_the_same_user() {
        let service = JwtTokenService::new("test-secret", 3600);
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).expect("issues");
        assert_eq!(service.resolve(&token).expect("resolves"), user_id);
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_rejected() {
        let issuer = JwtTokenService::new("secret-a", 3600);
        let verifier = JwtTokenService::new("secret-b", 3600);

        let token = issuer.issue(Uuid::new_v4()).expect("issues");
        verifier.resolve(&token).expect_err("forged");
    }

    #[rstest]
    fn expired_tokens_are_rejected() {
        // Negative validity puts the expiry in the past.
        let service = JwtTokenService::new("test-secret", -120);
        let token = service.issue(Uuid::new_v4()).expect("issues");
        service.resolve(&token).expect_err("expired");
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("aaaa.bbbb.cccc")]
    fn garbage_credentials_are_rejected(#[case] credential: &str) {
        let service = JwtTokenService::new("test-secret", 3600);
        service.resolve(credential).expect_err("invalid");
    }
}
