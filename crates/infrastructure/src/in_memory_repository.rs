use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinica_application::{
    AuditEvent, AuditRepository, ClinicRepository, ClinicScope, MembershipRepository, UserRecord,
};
use clinica_core::{AppError, AppResult, ClinicId, UserId};
use clinica_domain::{Client, Clinic, Exam, Membership, Patient, PermissionSet};
use tokio::sync::RwLock;

mod records;
mod users;

pub use records::InMemoryRecord;

/// In-memory implementation of every repository port.
///
/// Test adapter backing the infrastructure and API test suites.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    clinics: RwLock<HashMap<ClinicId, Clinic>>,
    memberships: RwLock<HashMap<(UserId, ClinicId), MembershipEntry>>,
    users: RwLock<HashMap<UserId, UserRecord>>,
    clients: RwLock<Vec<Client>>,
    patients: RwLock<Vec<Patient>>,
    exams: RwLock<Vec<Exam>>,
    audit_events: RwLock<Vec<AuditEvent>>,
}

#[derive(Debug, Clone)]
struct MembershipEntry {
    permissions: PermissionSet,
    created_at: DateTime<Utc>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a membership row directly.
    pub async fn insert_membership(
        &self,
        user_id: UserId,
        clinic_id: ClinicId,
        permissions: PermissionSet,
    ) {
        self.memberships.write().await.insert(
            (user_id, clinic_id),
            MembershipEntry {
                permissions,
                created_at: Utc::now(),
            },
        );
    }

    /// Returns a snapshot of appended audit events.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit_events.read().await.clone()
    }
}

#[async_trait]
impl ClinicRepository for InMemoryRepository {
    async fn create_with_owner(&self, name: &str, owner: UserId) -> AppResult<Clinic> {
        let mut memberships = self.memberships.write().await;
        if let Some((_, clinic_id)) = memberships.keys().find(|(member, _)| *member == owner) {
            return Err(AppError::Conflict(format!(
                "user '{owner}' already belongs to clinic '{clinic_id}'"
            )));
        }

        let clinic = Clinic::new(ClinicId::new(), name, Utc::now())?;
        self.clinics.write().await.insert(clinic.id(), clinic.clone());
        memberships.insert(
            (owner, clinic.id()),
            MembershipEntry {
                permissions: PermissionSet::new(),
                created_at: Utc::now(),
            },
        );
        Ok(clinic)
    }

    async fn find_by_id(&self, clinic_id: ClinicId) -> AppResult<Option<Clinic>> {
        Ok(self.clinics.read().await.get(&clinic_id).cloned())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryRepository {
    async fn find_membership(
        &self,
        user_id: UserId,
        clinic_id: ClinicId,
    ) -> AppResult<Option<Membership>> {
        Ok(self
            .memberships
            .read()
            .await
            .get(&(user_id, clinic_id))
            .map(|entry| Membership::new(user_id, clinic_id, entry.permissions.clone())))
    }

    async fn find_primary_clinic(&self, user_id: UserId) -> AppResult<Option<ClinicId>> {
        Ok(self
            .memberships
            .read()
            .await
            .iter()
            .filter(|((member, _), _)| *member == user_id)
            .min_by_key(|((_, clinic_id), entry)| (entry.created_at, *clinic_id))
            .map(|((_, clinic_id), _)| *clinic_id))
    }

    async fn ensure_membership(&self, scope: &ClinicScope, user_id: UserId) -> AppResult<bool> {
        let mut memberships = self.memberships.write().await;
        let key = (user_id, scope.clinic_id());
        if memberships.contains_key(&key) {
            return Ok(false);
        }

        memberships.insert(
            key,
            MembershipEntry {
                permissions: PermissionSet::new(),
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn replace_permissions(
        &self,
        scope: &ClinicScope,
        user_id: UserId,
        permissions: &PermissionSet,
    ) -> AppResult<bool> {
        let mut memberships = self.memberships.write().await;
        let Some(entry) = memberships.get_mut(&(user_id, scope.clinic_id())) else {
            return Ok(false);
        };

        entry.permissions = permissions.clone();
        Ok(true)
    }
}

#[async_trait]
impl AuditRepository for InMemoryRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.audit_events.write().await.push(event);
        Ok(())
    }
}
