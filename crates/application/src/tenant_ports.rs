use async_trait::async_trait;
use clinica_core::{AppResult, ClinicId, UserId};
use clinica_domain::{Clinic, Membership, PermissionSet};

use crate::ClinicScope;

/// Repository port for clinics.
#[async_trait]
pub trait ClinicRepository: Send + Sync {
    /// Creates a clinic and the owner's membership in one transaction.
    ///
    /// The owner membership starts with an empty permission set. Fails with
    /// `Conflict` when the owner already belongs to a clinic; the check runs
    /// inside the same transaction as the inserts.
    async fn create_with_owner(&self, name: &str, owner: UserId) -> AppResult<Clinic>;

    /// Finds a clinic by id.
    async fn find_by_id(&self, clinic_id: ClinicId) -> AppResult<Option<Clinic>>;
}

/// Repository port for `(user, clinic)` memberships.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Finds the membership row for one user in one clinic.
    async fn find_membership(
        &self,
        user_id: UserId,
        clinic_id: ClinicId,
    ) -> AppResult<Option<Membership>>;

    /// Returns the clinic a user is attached to, picking the oldest membership.
    async fn find_primary_clinic(&self, user_id: UserId) -> AppResult<Option<ClinicId>>;

    /// Creates an empty membership in the scoped clinic when absent.
    ///
    /// Returns `true` when a row was inserted.
    async fn ensure_membership(&self, scope: &ClinicScope, user_id: UserId) -> AppResult<bool>;

    /// Replaces the permission set of an existing membership.
    ///
    /// Returns `false` when the user has no membership in the scoped clinic.
    async fn replace_permissions(
        &self,
        scope: &ClinicScope,
        user_id: UserId,
        permissions: &PermissionSet,
    ) -> AppResult<bool>;
}
