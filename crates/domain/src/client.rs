use chrono::{DateTime, Utc};
use clinica_core::{AppError, AppResult, ClinicId, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::text::{optional_email, optional_text};

/// Whether a client is a company or an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonKind {
    /// Company, identified by CNPJ.
    Legal,
    /// Individual, identified by CPF.
    Natural,
}

impl PersonKind {
    /// Returns the storage code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legal => "J",
            Self::Natural => "F",
        }
    }

    /// Parses a storage code.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "J" => Ok(Self::Legal),
            "F" => Ok(Self::Natural),
            _ => Err(AppError::Validation(format!(
                "unknown person kind '{value}'"
            ))),
        }
    }
}

/// Postal address shared by client records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street name.
    pub street: Option<String>,
    /// Street number.
    pub number: Option<String>,
    /// Complement, such as suite or floor.
    pub complement: Option<String>,
    /// District or neighbourhood.
    pub district: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// Two-letter state code.
    pub state: Option<String>,
    /// Postal code (CEP), digits only.
    pub postal_code: Option<String>,
}

impl Address {
    fn normalized(self) -> AppResult<Self> {
        let state = optional_text(self.state).map(|value| value.to_uppercase());
        if let Some(state) = state.as_deref()
            && (state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(AppError::Validation(format!(
                "state must be a two-letter code, got '{state}'"
            )));
        }

        let postal_code = optional_text(self.postal_code)
            .map(|value| value.chars().filter(char::is_ascii_digit).collect::<String>())
            .filter(|value| !value.is_empty());
        if let Some(postal_code) = postal_code.as_deref()
            && postal_code.len() != 8
        {
            return Err(AppError::Validation(
                "postal code must have 8 digits".to_owned(),
            ));
        }

        Ok(Self {
            street: optional_text(self.street),
            number: optional_text(self.number),
            complement: optional_text(self.complement),
            district: optional_text(self.district),
            city: optional_text(self.city),
            state,
            postal_code,
        })
    }
}

/// Editable attributes of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Trade name (nome fantasia); required.
    pub trade_name: String,
    /// Company or individual.
    pub person_kind: Option<PersonKind>,
    /// CNPJ or CPF document number.
    pub document: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Landline phone.
    pub phone: Option<String>,
    /// Mobile phone.
    pub mobile: Option<String>,
    /// Postal address.
    pub address: Address,
    /// Whether the client is active.
    pub active: bool,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Identifier in the previous system.
    pub previous_code: Option<String>,
}

impl ClientProfile {
    /// Trims and validates the profile.
    pub fn validated(self) -> AppResult<Self> {
        let trade_name = NonEmptyString::new(self.trade_name)
            .map_err(|_| AppError::Validation("client trade name is required".to_owned()))?;

        let document = optional_text(self.document)
            .map(|value| value.chars().filter(char::is_ascii_digit).collect::<String>())
            .filter(|value| !value.is_empty());

        Ok(Self {
            trade_name: trade_name.into(),
            person_kind: self.person_kind,
            document,
            email: optional_email(self.email)?,
            phone: optional_text(self.phone),
            mobile: optional_text(self.mobile),
            address: self.address.normalized()?,
            active: self.active,
            notes: optional_text(self.notes),
            previous_code: optional_text(self.previous_code),
        })
    }
}

/// Persisted client owned by one clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Stable client identifier.
    pub id: Uuid,
    /// Owning clinic.
    pub clinic_id: ClinicId,
    /// Client attributes.
    pub profile: ClientProfile,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::{Address, ClientProfile, PersonKind};

    fn profile() -> ClientProfile {
        ClientProfile {
            trade_name: "  Metalurgica Sul ".to_owned(),
            person_kind: Some(PersonKind::Legal),
            document: Some("12.345.678/0001-90".to_owned()),
            email: Some(" ".to_owned()),
            phone: None,
            mobile: None,
            address: Address {
                state: Some("rs".to_owned()),
                postal_code: Some("90010-000".to_owned()),
                ..Address::default()
            },
            active: true,
            notes: None,
            previous_code: None,
        }
    }

    #[test]
    fn profile_is_normalized() {
        let validated = profile().validated();
        assert!(validated.is_ok());
        let Ok(validated) = validated else {
            return;
        };

        assert_eq!(validated.trade_name, "Metalurgica Sul");
        assert_eq!(validated.document.as_deref(), Some("12345678000190"));
        assert_eq!(validated.email, None);
        assert_eq!(validated.address.state.as_deref(), Some("RS"));
        assert_eq!(validated.address.postal_code.as_deref(), Some("90010000"));
    }

    #[test]
    fn blank_trade_name_is_rejected() {
        let mut value = profile();
        value.trade_name = "   ".to_owned();
        assert!(value.validated().is_err());
    }

    #[test]
    fn invalid_state_is_rejected() {
        let mut value = profile();
        value.address.state = Some("Rio Grande".to_owned());
        assert!(value.validated().is_err());
    }

    #[test]
    fn person_kind_parses_storage_codes() {
        assert_eq!(PersonKind::parse("J").ok(), Some(PersonKind::Legal));
        assert!(PersonKind::parse("X").is_err());
    }
}
