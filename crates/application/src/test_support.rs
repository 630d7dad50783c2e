//! In-process fakes shared by the service tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use clinica_core::{AppError, AppResult, ClinicId, Role, UserId, UserIdentity};
use clinica_domain::{Client, ClientProfile, Clinic, Membership, PermissionSet};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    AuditEvent, AuditRepository, ClinicRepository, ClinicScope, MembershipRepository, NewUser,
    Page, PasswordHasher, RecordRepository, RecordSearch, ScopedQuery, TenantRecord, UserRecord,
    UserRepository, UserSummary,
};

pub(crate) fn identity(role: Role, clinic_id: ClinicId) -> UserIdentity {
    UserIdentity::new(
        UserId::new(),
        "Test User",
        "test@clinica.com.br",
        role,
        clinic_id,
    )
}

pub(crate) fn scope(clinic_id: ClinicId) -> ClinicScope {
    ClinicScope::new(clinic_id)
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeMembershipRepository {
    rows: Mutex<Vec<Membership>>,
}

impl FakeMembershipRepository {
    pub(crate) async fn insert(
        &self,
        user_id: UserId,
        clinic_id: ClinicId,
        permissions: PermissionSet,
    ) {
        self.rows
            .lock()
            .await
            .push(Membership::new(user_id, clinic_id, permissions));
    }
}

#[async_trait]
impl MembershipRepository for FakeMembershipRepository {
    async fn find_membership(
        &self,
        user_id: UserId,
        clinic_id: ClinicId,
    ) -> AppResult<Option<Membership>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|row| row.user_id() == user_id && row.clinic_id() == clinic_id)
            .cloned())
    }

    async fn find_primary_clinic(&self, user_id: UserId) -> AppResult<Option<ClinicId>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|row| row.user_id() == user_id)
            .map(Membership::clinic_id))
    }

    async fn ensure_membership(&self, scope: &ClinicScope, user_id: UserId) -> AppResult<bool> {
        let mut rows = self.rows.lock().await;
        if rows
            .iter()
            .any(|row| row.user_id() == user_id && row.clinic_id() == scope.clinic_id())
        {
            return Ok(false);
        }

        rows.push(Membership::new(
            user_id,
            scope.clinic_id(),
            PermissionSet::new(),
        ));
        Ok(true)
    }

    async fn replace_permissions(
        &self,
        scope: &ClinicScope,
        user_id: UserId,
        permissions: &PermissionSet,
    ) -> AppResult<bool> {
        let mut rows = self.rows.lock().await;
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.user_id() == user_id && row.clinic_id() == scope.clinic_id())
        else {
            return Ok(false);
        };

        *row = Membership::new(user_id, scope.clinic_id(), permissions.clone());
        Ok(true)
    }
}

#[derive(Default)]
pub(crate) struct FakeClinicRepository {
    clinics: Mutex<Vec<Clinic>>,
    pub(crate) owners: Mutex<Vec<(UserId, ClinicId)>>,
}

#[async_trait]
impl ClinicRepository for FakeClinicRepository {
    async fn create_with_owner(&self, name: &str, owner: UserId) -> AppResult<Clinic> {
        let mut owners = self.owners.lock().await;
        if owners.iter().any(|(member, _)| *member == owner) {
            return Err(AppError::Conflict(format!("user '{owner}' already owns a clinic")));
        }

        let clinic = Clinic::new(ClinicId::new(), name, Utc::now())?;
        self.clinics.lock().await.push(clinic.clone());
        owners.push((owner, clinic.id()));
        Ok(clinic)
    }

    async fn find_by_id(&self, clinic_id: ClinicId) -> AppResult<Option<Clinic>> {
        Ok(self
            .clinics
            .lock()
            .await
            .iter()
            .find(|clinic| clinic.id() == clinic_id)
            .cloned())
    }
}

#[derive(Default)]
pub(crate) struct FakeUserRepository {
    pub(crate) users: Mutex<HashMap<UserId, UserRecord>>,
}

impl FakeUserRepository {
    pub(crate) async fn insert(&self, record: UserRecord) {
        self.users.lock().await.insert(record.id, record);
    }
}

pub(crate) fn user_record(role: Role, email: &str, password_hash: &str) -> UserRecord {
    UserRecord {
        id: UserId::new(),
        name: "Maria Lima".to_owned(),
        email: email.to_owned(),
        role,
        password_hash: password_hash.to_owned(),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut users = self.users.lock().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::Conflict(format!(
                "email '{}' is already registered",
                user.email
            )));
        }

        let record = UserRecord {
            id: UserId::new(),
            name: user.name,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        name: &str,
        email: &str,
        role: Role,
    ) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
        user.name = name.to_owned();
        user.email = email.to_owned();
        user.role = role;
        Ok(())
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
        user.password_hash = password_hash.to_owned();
        Ok(())
    }

    async fn search_members(
        &self,
        query: ScopedQuery<RecordSearch>,
    ) -> AppResult<Page<UserSummary>> {
        // Membership is not tracked here; every stored user counts as a member.
        let users = self.users.lock().await;
        let items: Vec<UserSummary> = users
            .values()
            .filter(|user| query.filter().matches(&user.name) || query.filter().matches(&user.email))
            .map(|user| UserSummary {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
                role: user.role,
                permissions: PermissionSet::new(),
                created_at: user.created_at,
            })
            .collect();
        let total = items.len() as u64;
        Ok(Page::new(items, query.filter(), total))
    }
}

pub(crate) struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

#[derive(Default)]
pub(crate) struct FakeClientRepository {
    pub(crate) rows: Mutex<Vec<Client>>,
}

#[async_trait]
impl RecordRepository<Client> for FakeClientRepository {
    async fn create(&self, scope: &ClinicScope, profile: ClientProfile) -> AppResult<Client> {
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            clinic_id: scope.clinic_id(),
            profile,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().await.push(client.clone());
        Ok(client)
    }

    async fn update(
        &self,
        scope: &ClinicScope,
        record_id: Uuid,
        profile: ClientProfile,
    ) -> AppResult<Option<Client>> {
        let mut rows = self.rows.lock().await;
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.id == record_id && row.clinic_id == scope.clinic_id())
        else {
            return Ok(None);
        };

        row.profile = profile;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn find(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<Option<Client>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|row| row.id == record_id && row.clinic_id == scope.clinic_id())
            .cloned())
    }

    async fn list(&self, query: ScopedQuery<RecordSearch>) -> AppResult<Page<Client>> {
        let items: Vec<Client> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|row| row.clinic_id() == query.clinic_id())
            .filter(|row| query.filter().matches(row.display_name()))
            .cloned()
            .collect();
        let total = items.len() as u64;
        Ok(Page::new(items, query.filter(), total))
    }

    async fn delete(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|row| !(row.id == record_id && row.clinic_id == scope.clinic_id()));
        Ok(rows.len() != before)
    }
}
