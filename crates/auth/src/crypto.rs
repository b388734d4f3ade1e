use super::*;
use mlh_core::ACCESS_TOKEN_DURATION;

/// HS256 signing keys.
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
        }
    }
    /// Keys from `JWT_SECRET`, or the development secret when unset.
    pub fn from_env() -> Self {
        match std::env::var(mlh_core::env::JWT_SECRET) {
            Ok(secret) if !secret.is_empty() => Self::new(secret.as_bytes()),
            _ => {
                log::warn!(
                    "{} not set, signing tokens with the development key",
                    mlh_core::env::JWT_SECRET
                );
                Self::new(mlh_core::DEV_SECRET.as_bytes())
            }
        }
    }
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }
    /// Verifies signature and expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &jsonwebtoken::Validation::default())
            .map(|data| data.claims)
    }
    pub const fn duration() -> std::time::Duration {
        ACCESS_TOKEN_DURATION
    }
}
