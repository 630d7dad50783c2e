//! Argon2id password hasher.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use clinica_application::PasswordHasher as PasswordHasherPort;
use clinica_core::{AppError, AppResult};

/// Argon2id hasher with m=19456 KiB, t=2, p=1.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the default cost parameters.
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(19456, 2, 1, None).unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            // Accounts imported with a foreign hash format cannot log in.
            return Ok(false);
        };

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "password verification failed: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use clinica_application::PasswordHasher as PasswordHasherPort;
    use clinica_core::AppResult;

    use super::Argon2PasswordHasher;

    #[test]
    fn hashes_verify_only_the_original_password() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash_password("Recepcao#2024")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("Recepcao#2024", &hash)?);
        assert!(!hasher.verify_password("recepcao#2024", &hash)?);
        Ok(())
    }

    #[test]
    fn unparseable_hash_fails_closed() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();
        assert!(!hasher.verify_password("anything", "$2a$10$legacybcrypt")?);
        Ok(())
    }
}
