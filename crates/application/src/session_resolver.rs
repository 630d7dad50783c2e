use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use clinica_core::{AppError, AppResult, UserId, UserIdentity};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{MembershipRepository, UserRecord, UserRepository};

/// Absolute lifetime of a session principal, independent of activity.
pub const SESSION_MAX_AGE_HOURS: i64 = 12;

/// Value stored in the session store after a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPrincipal {
    /// Authenticated user.
    pub user_id: UserId,
    /// Login timestamp.
    pub issued_at: DateTime<Utc>,
}

impl SessionPrincipal {
    /// Creates a principal issued now.
    #[must_use]
    pub fn issue(user_id: UserId) -> Self {
        Self {
            user_id,
            issued_at: Utc::now(),
        }
    }
}

/// Turns the session principal of a request into the identity passed to services.
///
/// Role and clinic are read from storage on every call so that role and
/// membership changes apply on the next request.
#[derive(Clone)]
pub struct SessionResolver {
    user_repository: Arc<dyn UserRepository>,
    membership_repository: Arc<dyn MembershipRepository>,
    max_age: Duration,
}

impl SessionResolver {
    /// Creates a resolver with the default absolute session lifetime.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        membership_repository: Arc<dyn MembershipRepository>,
    ) -> Self {
        Self {
            user_repository,
            membership_repository,
            max_age: Duration::hours(SESSION_MAX_AGE_HOURS),
        }
    }

    /// Resolves the full request identity, including the user's clinic.
    pub async fn resolve(&self, principal: Option<SessionPrincipal>) -> AppResult<UserIdentity> {
        self.resolve_at(principal, Utc::now()).await
    }

    /// Resolves the full request identity against an explicit clock.
    pub async fn resolve_at(
        &self,
        principal: Option<SessionPrincipal>,
        now: DateTime<Utc>,
    ) -> AppResult<UserIdentity> {
        let user = self.resolve_principal_at(principal, now).await?;

        let Some(clinic_id) = self
            .membership_repository
            .find_primary_clinic(user.id)
            .await?
        else {
            debug!(user_id = %user.id, "session user has no clinic membership");
            return Err(AppError::Unauthenticated(
                "no clinic membership for session user".to_owned(),
            ));
        };

        Ok(UserIdentity::new(
            user.id, user.name, user.email, user.role, clinic_id,
        ))
    }

    /// Resolves the account behind a session without requiring a clinic.
    ///
    /// Only clinic bootstrap uses this; every other operation needs [`Self::resolve`].
    pub async fn resolve_principal(
        &self,
        principal: Option<SessionPrincipal>,
    ) -> AppResult<UserRecord> {
        self.resolve_principal_at(principal, Utc::now()).await
    }

    async fn resolve_principal_at(
        &self,
        principal: Option<SessionPrincipal>,
        now: DateTime<Utc>,
    ) -> AppResult<UserRecord> {
        let Some(principal) = principal else {
            return Err(AppError::Unauthenticated("no active session".to_owned()));
        };

        if now - principal.issued_at > self.max_age {
            debug!(user_id = %principal.user_id, "session principal expired");
            return Err(AppError::Unauthenticated("session expired".to_owned()));
        }

        self.user_repository
            .find_by_id(principal.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("session user no longer exists".to_owned()))
    }
}
