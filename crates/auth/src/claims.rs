use super::*;

/// JWT payload: who, issued when, valid until (unix seconds).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: &str) -> Self {
        let now = mlh_core::now() as i64;
        Self {
            sub: subject.to_string(),
            iat: now,
            exp: now + Crypto::duration().as_secs() as i64,
        }
    }
    pub fn expired(&self) -> bool {
        self.exp < mlh_core::now() as i64
    }
    pub fn subject(&self) -> &str {
        &self.sub
    }
}
