use async_trait::async_trait;
use clinica_core::{AppResult, ClinicId, UserId};
use clinica_domain::AuditAction;

/// Append-only audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Clinic the event belongs to.
    pub clinic_id: ClinicId,
    /// User that performed the action.
    pub actor_user_id: UserId,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends one event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}
