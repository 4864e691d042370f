//! Account passwords, stored as bcrypt hashes

use thiserror::Error;
use tracing::warn;

/// bcrypt ignores every byte past this length
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must not be empty")]
    Empty,

    #[error("password is longer than {MAX_PASSWORD_BYTES} bytes")]
    TooLong,

    #[error("bcrypt failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Hash `password` at the configured bcrypt `cost`.
///
/// Over-long passwords are refused rather than silently truncated, so two
/// passwords sharing their first 72 bytes never hash alike.
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong);
    }
    Ok(bcrypt::hash(password, cost)?)
}

/// Whether `password` matches `stored_hash`. An unreadable stored hash never matches.
pub fn password_matches(password: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(password, stored_hash) {
        Ok(matches) => matches,
        Err(e) => {
            warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_the_original_password() {
        let hashed = hash_password("s3cret-pass", 4).unwrap();
        assert!(hashed.starts_with("$2b$04$"));
        assert!(password_matches("s3cret-pass", &hashed));
        assert!(!password_matches("wrong", &hashed));
    }

    #[test]
    fn unreadable_hash_never_matches() {
        assert!(!password_matches("anything", "not-a-bcrypt-hash"));
        assert!(!password_matches("", ""));
    }

    #[test]
    fn refuses_passwords_bcrypt_would_truncate() {
        let long = "x".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(matches!(hash_password(&long, 4), Err(PasswordError::TooLong)));
        assert!(hash_password(&long[..MAX_PASSWORD_BYTES], 4).is_ok());
        assert!(matches!(hash_password("", 4), Err(PasswordError::Empty)));
    }

    #[test]
    fn invalid_cost_is_a_bcrypt_error() {
        assert!(matches!(
            hash_password("s3cret-pass", 2),
            Err(PasswordError::Bcrypt(_))
        ));
    }
}
