use sqlx::{Postgres, QueryBuilder};

use clinica_application::RecordSort;

use crate::scoped_sql::page_total;

use super::*;

impl PostgresUserRepository {
    pub(super) async fn search_members_impl(
        &self,
        query: ScopedQuery<RecordSearch>,
    ) -> AppResult<Page<UserSummary>> {
        let search = query.filter();
        let offset = i64::try_from(search.offset()).map_err(|error| {
            AppError::Validation(format!("invalid user page offset: {error}"))
        })?;

        let mut count: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM users_to_clinics membership JOIN users account ON account.id = membership.user_id",
        );
        push_member_filter(&mut count, &query);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count users: {error}")))?;

        let mut select: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            r#"
            SELECT
                account.id,
                membership.clinic_id,
                account.name,
                account.email,
                account.role,
                membership.permissions,
                account.created_at
            FROM users_to_clinics membership
            JOIN users account ON account.id = membership.user_id
            "#,
        );
        push_member_filter(&mut select, &query);
        let sort_column = match search.sort {
            RecordSort::CreatedAt => "account.created_at",
            RecordSort::Name => "account.name",
        };
        select.push(format!(
            " ORDER BY {sort_column} {}, account.id ASC",
            search.direction.as_sql()
        ));
        select.push(" LIMIT ");
        select.push_bind(i64::from(search.page_size));
        select.push(" OFFSET ");
        select.push_bind(offset);

        let rows = select
            .build_query_as::<MemberRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to search users: {error}")))?;

        let items = rows
            .into_iter()
            .map(UserSummary::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(items, search, page_total(total)))
    }
}

fn push_member_filter<'a>(
    builder: &mut QueryBuilder<'a, Postgres>,
    query: &ScopedQuery<RecordSearch>,
) {
    builder.push(" WHERE membership.clinic_id = ");
    builder.push_bind(query.clinic_id().as_uuid());

    if let Some(pattern) = query.filter().like_pattern() {
        builder.push(" AND (account.name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR account.email ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}
