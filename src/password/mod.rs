//! Password Hashing
//!
//! Argon2id digests with a fresh random salt per hash. Cost parameters are
//! the argon2 crate defaults (19 MiB memory, two passes, one lane), which
//! line up with the usual interactive-login hardness target.

use anyhow::anyhow;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::Result;

const SALT_LEN: usize = 16;

/// Hash a plaintext password into a PHC-format digest
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;

    let argon2 = Argon2::default();
    let digest = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!(e.to_string()))?;
    Ok(digest.to_string())
}

/// Check a plaintext password against a stored digest
///
/// A digest that does not parse as a PHC string counts as a mismatch.
pub fn verify_password(digest: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(digest) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}
