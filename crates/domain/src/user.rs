//! User account validation rules.

use clinica_core::{AppError, AppResult, Role};
use serde::{Deserialize, Serialize};

/// Validated, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Minimum password length accepted for clinic accounts.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Maximum password length (protects against Argon2id DoS).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a plaintext password against length and breached-list rules.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    if is_common_password(password) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

fn is_common_password(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|entry| *entry == lowered)
}

static COMMON_PASSWORDS: &[&str] = &[
    "123456",
    "1234567",
    "12345678",
    "123456789",
    "1234567890",
    "654321",
    "111111",
    "123123",
    "abc123",
    "qwerty",
    "qwerty123",
    "password",
    "password1",
    "password123",
    "senha123",
    "mudar123",
    "admin123",
    "iloveyou",
    "welcome",
    "letmein",
];

/// Roles a clinic administrator may assign through user management.
///
/// `SUPER_ADMIN` is provisioned out of band and never assigned here.
pub fn ensure_assignable_role(role: Role) -> AppResult<Role> {
    match role {
        Role::Master | Role::User => Ok(role),
        Role::SuperAdmin => Err(AppError::Validation(
            "role SUPER_ADMIN cannot be assigned by clinic administrators".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use clinica_core::Role;

    use super::*;

    #[test]
    fn valid_email_is_lowercased() {
        let email = EmailAddress::new("Recepcao@Clinica.COM.br");
        assert_eq!(
            email.map(String::from).unwrap_or_default(),
            "recepcao@clinica.com.br"
        );
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(EmailAddress::new("noatsign").is_err());
    }

    #[test]
    fn email_with_two_at_signs_is_rejected() {
        assert!(EmailAddress::new("a@b@clinic.com").is_err());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(EmailAddress::new("user@nodot").is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("abc").is_err());
    }

    #[test]
    fn six_character_password_is_accepted() {
        assert!(validate_password("x7k!pq").is_ok());
    }

    #[test]
    fn common_password_is_rejected() {
        assert!(validate_password("Senha123").is_err());
    }

    #[test]
    fn very_long_password_is_rejected() {
        let long = "a".repeat(PASSWORD_MAX_LENGTH + 1);
        assert!(validate_password(&long).is_err());
    }

    #[test]
    fn super_admin_is_not_assignable() {
        assert!(ensure_assignable_role(Role::SuperAdmin).is_err());
        assert_eq!(ensure_assignable_role(Role::User).ok(), Some(Role::User));
    }
}
