use super::*;

/// Who may be issued a token.
#[derive(Debug, Clone)]
pub enum Access {
    /// Anyone, as [`mlh_core::ANONYMOUS_SUBJECT`]. Development only.
    Open,
    /// One account, checked against an Argon2 hash.
    Account { username: String, hashword: String },
}

impl Access {
    /// `Account` when both `API_USERNAME` and `API_HASHWORD` are set.
    pub fn from_env() -> Self {
        use mlh_core::env;
        match (
            std::env::var(env::API_USERNAME).ok().filter(|s| !s.is_empty()),
            std::env::var(env::API_HASHWORD).ok().filter(|s| !s.is_empty()),
        ) {
            (Some(username), Some(hashword)) => Self::Account { username, hashword },
            _ => {
                log::warn!("no API credentials configured, issuing tokens to anyone");
                Self::Open
            }
        }
    }

    /// The token subject for this login attempt, if it is admitted.
    pub fn admit(&self, login: Option<&LoginRequest>) -> Option<String> {
        match (self, login) {
            (Self::Open, _) => Some(mlh_core::ANONYMOUS_SUBJECT.to_string()),
            (Self::Account { .. }, None) => None,
            (Self::Account { username, hashword }, Some(login)) => {
                Some(login.username.clone())
                    .filter(|name| name == username)
                    .filter(|_| password::verify(&login.password, hashword))
            }
        }
    }
}
