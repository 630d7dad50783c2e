use std::cmp::Ordering;

use clinica_application::{
    NewUser, Page, RecordSearch, RecordSort, ScopedQuery, SortDirection, UserRecord,
    UserRepository, UserSummary,
};
use clinica_core::{AppError, Role};

use super::*;

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
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
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|other| other.id != user_id && other.email.eq_ignore_ascii_case(email))
        {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
        user.name = name.to_owned();
        user.email = email.to_owned();
        user.role = role;
        Ok(())
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
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
        let users = self.users.read().await;
        let memberships = self.memberships.read().await;
        let search = query.filter();

        let mut members: Vec<UserSummary> = memberships
            .iter()
            .filter(|((_, clinic_id), _)| *clinic_id == query.clinic_id())
            .filter_map(|((user_id, _), entry)| {
                users.get(user_id).map(|user| UserSummary {
                    id: user.id,
                    name: user.name.clone(),
                    email: user.email.clone(),
                    role: user.role,
                    permissions: entry.permissions.clone(),
                    created_at: user.created_at,
                })
            })
            .filter(|member| search.matches(&member.name) || search.matches(&member.email))
            .collect();

        members.sort_by(|left, right| {
            let ordering = match search.sort {
                RecordSort::CreatedAt => left.created_at.cmp(&right.created_at),
                RecordSort::Name => left.name.cmp(&right.name),
            };
            let ordering = match search.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            match ordering {
                Ordering::Equal => left.id.cmp(&right.id),
                other => other,
            }
        });

        Ok(super::records::paginate(members, search))
    }
}
