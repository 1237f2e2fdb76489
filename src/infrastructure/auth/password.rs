use argon2::{
    password_hash::{
        rand_core::OsRng, Error as Argon2Error, PasswordHash,
        PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::errors::PasswordError;

/// Outcome of checking a password against a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Mismatch,
    Valid,
    /// Matched against a legacy digest; the caller should re-hash and
    /// persist the modern form.
    ValidNeedsRehash,
}

/// Hashing strategy seam. The production hasher is Argon2id; tests can
/// substitute a cheap implementation.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;
    fn verify(&self, password: &str, stored: &str) -> Result<Verification, PasswordError>;
}

/// Argon2id hasher that also accepts unsalted MD5 hex digests left over
/// from older installs, reporting them for upgrade on successful login.
pub struct Argon2Hasher;

impl Argon2Hasher {
    fn argon2() -> Result<Argon2<'static>, PasswordError> {
        Ok(Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(15_000, 2, 1, None)
                .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?,
        ))
    }
}

fn is_legacy_md5(stored: &str) -> bool {
    stored.len() == 32 && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Self::argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingError(e.to_string()))
            .map(|hash| hash.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> Result<Verification, PasswordError> {
        if is_legacy_md5(stored) {
            let digest = format!("{:x}", md5::compute(password.as_bytes()));
            return Ok(if digest.eq_ignore_ascii_case(stored) {
                Verification::ValidNeedsRehash
            } else {
                Verification::Mismatch
            });
        }

        let parsed_hash = PasswordHash::new(stored)
            .map_err(|e| PasswordError::InvalidHashFormat(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(Verification::Valid),
            Err(Argon2Error::Password) => Ok(Verification::Mismatch),
            Err(e) => Err(PasswordError::VerificationError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(hasher.verify("correct horse", &hash).unwrap(), Verification::Valid);
        assert_eq!(
            hasher.verify("battery staple", &hash).unwrap(),
            Verification::Mismatch
        );
    }

    #[test]
    fn legacy_md5_digest_verifies_and_requests_rehash() {
        let hasher = Argon2Hasher;
        // md5("password")
        let stored = "5f4dcc3b5aa765d61d8327deb882cf99";
        assert_eq!(
            hasher.verify("password", stored).unwrap(),
            Verification::ValidNeedsRehash
        );
        assert_eq!(hasher.verify("passw0rd", stored).unwrap(), Verification::Mismatch);
    }

    #[test]
    fn malformed_stored_hash_is_an_error_not_a_mismatch() {
        let hasher = Argon2Hasher;
        assert!(hasher.verify("anything", "not-a-hash").is_err());
    }
}
