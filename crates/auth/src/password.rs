//! Argon2id password hashes in PHC string form.
use argon2::Argon2;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::password_hash::SaltString;
use rand::Rng;

/// Hash a password for use as `API_HASHWORD`.
pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    let salt = SaltString::encode_b64(&bytes)?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
}

/// False for a wrong password and for a malformed hash alike.
pub fn verify(password: &str, hashword: &str) -> bool {
    match PasswordHash::new(hashword) {
        Ok(ref phc) => Argon2::default()
            .verify_password(password.as_bytes(), phc)
            .is_ok(),
        Err(e) => {
            log::error!("stored password hash is malformed: {}", e);
            false
        }
    }
}
