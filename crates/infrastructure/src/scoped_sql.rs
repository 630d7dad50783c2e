//! Query building for clinic-scoped tables.
//!
//! Every statement produced here starts its `WHERE` clause with the clinic
//! predicate taken from the scope; caller filters are appended with `AND`.

use clinica_application::{RecordSearch, RecordSort, ScopedQuery};
use clinica_core::{AppError, AppResult};
use sqlx::{Postgres, QueryBuilder};

/// Static description of a clinic-owned table.
pub(crate) struct ScopedTable {
    /// Table name.
    pub(crate) table: &'static str,
    /// Selected column list.
    pub(crate) columns: &'static str,
    /// Column used for name ordering.
    pub(crate) name_column: &'static str,
    /// Columns matched by the search term.
    pub(crate) search_columns: &'static [&'static str],
}

impl ScopedTable {
    /// Builds the paged select for a scoped list query.
    pub(crate) fn select_page<'a>(
        &self,
        query: &'a ScopedQuery<RecordSearch>,
    ) -> AppResult<QueryBuilder<'a, Postgres>> {
        let search = query.filter();
        let limit = i64::from(search.page_size);
        let offset = i64::try_from(search.offset()).map_err(|error| {
            AppError::Validation(format!("invalid {} page offset: {error}", self.table))
        })?;

        let mut builder = QueryBuilder::new(format!("SELECT {} FROM {}", self.columns, self.table));
        self.push_scoped_where(&mut builder, query);

        let sort_column = match search.sort {
            RecordSort::CreatedAt => "created_at",
            RecordSort::Name => self.name_column,
        };
        builder.push(format!(
            " ORDER BY {sort_column} {}, id ASC",
            search.direction.as_sql()
        ));
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        Ok(builder)
    }

    /// Builds the total count for a scoped list query.
    pub(crate) fn count<'a>(&self, query: &'a ScopedQuery<RecordSearch>) -> QueryBuilder<'a, Postgres> {
        let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", self.table));
        self.push_scoped_where(&mut builder, query);
        builder
    }

    fn push_scoped_where<'a>(
        &self,
        builder: &mut QueryBuilder<'a, Postgres>,
        query: &'a ScopedQuery<RecordSearch>,
    ) {
        builder.push(" WHERE clinic_id = ");
        builder.push_bind(query.clinic_id().as_uuid());

        let Some(pattern) = query.filter().like_pattern() else {
            return;
        };

        builder.push(" AND (");
        for (index, column) in self.search_columns.iter().enumerate() {
            if index > 0 {
                builder.push(" OR ");
            }
            builder.push(format!("{column} ILIKE "));
            builder.push_bind(pattern.clone());
        }
        builder.push(")");
    }
}

/// Converts a database count into the page total.
pub(crate) fn page_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clinica_application::{AuthorizationService, RecordSearch};
    use clinica_core::{ClinicId, Role, UserId, UserIdentity};
    use clinica_domain::PermissionSet;

    use super::{ScopedTable, page_total};
    use crate::InMemoryRepository;

    const TABLE: ScopedTable = ScopedTable {
        table: "clients",
        columns: "id",
        name_column: "trade_name",
        search_columns: &["trade_name", "document"],
    };

    #[test]
    fn negative_counts_collapse_to_zero() {
        assert_eq!(page_total(-1), 0);
        assert_eq!(page_total(42), 42);
    }

    #[tokio::test]
    async fn clinic_predicate_precedes_caller_filter() {
        let repository = Arc::new(InMemoryRepository::new());
        let actor = UserIdentity::new(UserId::new(), "Ana", "ana@clinica.com.br", Role::Master, ClinicId::new());
        repository
            .insert_membership(actor.user_id(), actor.clinic_id(), PermissionSet::new())
            .await;
        let Ok(scope) = AuthorizationService::new(repository)
            .require_role_admin(&actor)
            .await
        else {
            panic!("master should pass the gate");
        };

        let mut search = RecordSearch::first_page(10);
        search.search = Some("sul".to_owned());
        let query = scope.query(search);

        let count = TABLE.count(&query);
        assert_eq!(
            count.sql(),
            "SELECT COUNT(*) FROM clients WHERE clinic_id = $1 AND (trade_name ILIKE $2 OR document ILIKE $3)"
        );

        let select = TABLE.select_page(&query);
        let Ok(select) = select else {
            panic!("select should build");
        };
        assert!(select.sql().starts_with("SELECT id FROM clients WHERE clinic_id = $1 AND ("));
        assert!(select.sql().ends_with("ORDER BY created_at DESC, id ASC LIMIT $4 OFFSET $5"));
    }
}
