use clinica_core::AppError;
use clinica_domain::{Address, Client, ClientProfile, PersonKind};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Postal address as sent and returned by the API.
#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/address-payload.ts"
)]
pub struct AddressPayload {
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

impl From<AddressPayload> for Address {
    fn from(value: AddressPayload) -> Self {
        Self {
            street: value.street,
            number: value.number,
            complement: value.complement,
            district: value.district,
            city: value.city,
            state: value.state,
            postal_code: value.postal_code,
        }
    }
}

impl From<Address> for AddressPayload {
    fn from(value: Address) -> Self {
        Self {
            street: value.street,
            number: value.number,
            complement: value.complement,
            district: value.district,
            city: value.city,
            state: value.state,
            postal_code: value.postal_code,
        }
    }
}

fn default_active() -> bool {
    true
}

/// Incoming payload for client create and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/client-request.ts"
)]
pub struct ClientRequest {
    pub trade_name: String,
    /// `J` for companies, `F` for individuals.
    pub person_kind: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    #[serde(default)]
    pub address: AddressPayload,
    #[serde(default = "default_active")]
    pub active: bool,
    pub notes: Option<String>,
    pub previous_code: Option<String>,
}

impl TryFrom<ClientRequest> for ClientProfile {
    type Error = AppError;

    fn try_from(value: ClientRequest) -> Result<Self, Self::Error> {
        let person_kind = value
            .person_kind
            .as_deref()
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .map(PersonKind::parse)
            .transpose()?;

        Ok(Self {
            trade_name: value.trade_name,
            person_kind,
            document: value.document,
            email: value.email,
            phone: value.phone,
            mobile: value.mobile,
            address: value.address.into(),
            active: value.active,
            notes: value.notes,
            previous_code: value.previous_code,
        })
    }
}

/// API representation of a client.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/client-response.ts"
)]
pub struct ClientResponse {
    pub client_id: String,
    pub trade_name: String,
    pub person_kind: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address: AddressPayload,
    pub active: bool,
    pub notes: Option<String>,
    pub previous_code: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Client> for ClientResponse {
    fn from(value: Client) -> Self {
        let profile = value.profile;

        Self {
            client_id: value.id.to_string(),
            trade_name: profile.trade_name,
            person_kind: profile.person_kind.map(|kind| kind.as_str().to_owned()),
            document: profile.document,
            email: profile.email,
            phone: profile.phone,
            mobile: profile.mobile,
            address: profile.address.into(),
            active: profile.active,
            notes: profile.notes,
            previous_code: profile.previous_code,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}
