//! Salted PBKDF2-HMAC-SHA256 password hashes.
//!
//! Stored as `pbkdf2-sha256$<iterations>$<salt>$<hash>` with base64 salt and
//! hash, so a hash keeps verifying after the configured iteration count
//! changes.

use std::num::NonZeroU32;

use base64::{engine::general_purpose, Engine};
use ring::{
    digest, pbkdf2,
    rand::{SecureRandom, SystemRandom},
};

use crate::error::AuthError;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = digest::SHA256_OUTPUT_LEN;

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: NonZeroU32,
    rng: SystemRandom,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: NonZeroU32::new(iterations).unwrap_or(NonZeroU32::MIN),
            rng: SystemRandom::new(),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let mut salt = [0u8; SALT_LEN];
        self.rng.fill(&mut salt).map_err(|_| AuthError::Random)?;

        let mut credential = [0u8; CREDENTIAL_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            self.iterations,
            &salt,
            password.as_bytes(),
            &mut credential,
        );

        Ok(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            general_purpose::STANDARD.encode(salt),
            general_purpose::STANDARD.encode(credential),
        ))
    }
}

/// Constant-time check of `password` against a stored hash. A hash that does
/// not parse never verifies.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(credential), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }

    let Some(iterations) = iterations.parse().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let (Ok(salt), Ok(credential)) = (
        general_purpose::STANDARD.decode(salt),
        general_purpose::STANDARD.decode(credential),
    ) else {
        return false;
    };
    if credential.is_empty() {
        return false;
    }

    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        &salt,
        password.as_bytes(),
        &credential,
    )
    .is_ok()
}
