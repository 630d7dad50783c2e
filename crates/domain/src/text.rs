use clinica_core::AppResult;

use crate::user::EmailAddress;

/// Trims optional free text, mapping blank values to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Validates an optional email, treating blank input as absent.
pub(crate) fn optional_email(value: Option<String>) -> AppResult<Option<String>> {
    optional_text(value)
        .map(|value| EmailAddress::new(value).map(String::from))
        .transpose()
}
