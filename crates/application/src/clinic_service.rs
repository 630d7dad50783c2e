use std::sync::Arc;

use clinica_core::{AppError, AppResult, NonEmptyString, UserIdentity};
use clinica_domain::{AuditAction, Clinic};
use tracing::info;

use crate::{
    AuditEvent, AuditRepository, ClinicRepository, MembershipRepository, UserRecord,
};

/// Application service for clinic bootstrap and lookup.
#[derive(Clone)]
pub struct ClinicService {
    clinic_repository: Arc<dyn ClinicRepository>,
    membership_repository: Arc<dyn MembershipRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl ClinicService {
    /// Creates a new clinic service.
    #[must_use]
    pub fn new(
        clinic_repository: Arc<dyn ClinicRepository>,
        membership_repository: Arc<dyn MembershipRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            clinic_repository,
            membership_repository,
            audit_repository,
        }
    }

    /// Creates the first clinic of an administrator that has none yet.
    ///
    /// The creator becomes a member with an empty permission set; the role
    /// override grants access from the next request on.
    pub async fn create_initial_clinic(&self, account: &UserRecord, name: &str) -> AppResult<Clinic> {
        if !account.role.overrides_permissions() {
            return Err(AppError::Unauthorized(format!(
                "user '{}' must be MASTER to create a clinic",
                account.id
            )));
        }

        let name = NonEmptyString::new(name)
            .map_err(|_| AppError::Validation("clinic name is required".to_owned()))?;

        if let Some(clinic_id) = self
            .membership_repository
            .find_primary_clinic(account.id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "user '{}' already belongs to clinic '{clinic_id}'",
                account.id
            )));
        }

        let clinic = self
            .clinic_repository
            .create_with_owner(name.as_str(), account.id)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                clinic_id: clinic.id(),
                actor_user_id: account.id,
                action: AuditAction::ClinicCreated,
                resource_type: "clinic".to_owned(),
                resource_id: clinic.id().to_string(),
                detail: Some(format!("created clinic '{}'", clinic.name())),
            })
            .await?;

        info!(user_id = %account.id, clinic_id = %clinic.id(), "clinic created");
        Ok(clinic)
    }

    /// Returns the actor's clinic.
    pub async fn current_clinic(&self, actor: &UserIdentity) -> AppResult<Clinic> {
        self.clinic_repository
            .find_by_id(actor.clinic_id())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("clinic '{}' does not exist", actor.clinic_id()))
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clinica_core::{AppError, ClinicId, Role};
    use clinica_domain::{AuditAction, PermissionSet};

    use crate::test_support::{
        FakeAuditRepository, FakeClinicRepository, FakeMembershipRepository, user_record,
    };

    use super::ClinicService;

    #[tokio::test]
    async fn master_without_clinic_creates_one() {
        let clinics = Arc::new(FakeClinicRepository::default());
        let audit = Arc::new(FakeAuditRepository::default());
        let service = ClinicService::new(
            clinics.clone(),
            Arc::new(FakeMembershipRepository::default()),
            audit.clone(),
        );
        let account = user_record(Role::Master, "dono@clinica.com.br", "hashed:x");

        let clinic = service
            .create_initial_clinic(&account, "  Clinica Vida ")
            .await;
        let Ok(clinic) = clinic else {
            panic!("clinic should be created");
        };

        assert_eq!(clinic.name(), "Clinica Vida");
        assert_eq!(
            clinics.owners.lock().await.as_slice(),
            &[(account.id, clinic.id())]
        );
        assert_eq!(
            audit.events.lock().await.first().map(|event| event.action),
            Some(AuditAction::ClinicCreated)
        );
    }

    #[tokio::test]
    async fn regular_user_cannot_create_clinic() {
        let service = ClinicService::new(
            Arc::new(FakeClinicRepository::default()),
            Arc::new(FakeMembershipRepository::default()),
            Arc::new(FakeAuditRepository::default()),
        );
        let account = user_record(Role::User, "staff@clinica.com.br", "hashed:x");

        assert!(matches!(
            service.create_initial_clinic(&account, "Clinica").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn second_clinic_is_a_conflict() {
        let memberships = FakeMembershipRepository::default();
        let account = user_record(Role::Master, "dono@clinica.com.br", "hashed:x");
        memberships
            .insert(account.id, ClinicId::new(), PermissionSet::new())
            .await;
        let service = ClinicService::new(
            Arc::new(FakeClinicRepository::default()),
            Arc::new(memberships),
            Arc::new(FakeAuditRepository::default()),
        );

        assert!(matches!(
            service.create_initial_clinic(&account, "Outra").await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_bootstraps_create_a_single_clinic() {
        let clinics = Arc::new(FakeClinicRepository::default());
        let service = ClinicService::new(
            clinics.clone(),
            Arc::new(FakeMembershipRepository::default()),
            Arc::new(FakeAuditRepository::default()),
        );
        let account = user_record(Role::Master, "dono@clinica.com.br", "hashed:x");

        let (first, second) = tokio::join!(
            service.create_initial_clinic(&account, "Clinica Vida"),
            service.create_initial_clinic(&account, "Clinica Vida"),
        );

        assert_eq!(usize::from(first.is_ok()) + usize::from(second.is_ok()), 1);
        assert!(
            matches!(first, Err(AppError::Conflict(_)))
                || matches!(second, Err(AppError::Conflict(_)))
        );
        assert_eq!(clinics.owners.lock().await.len(), 1);
    }
}
