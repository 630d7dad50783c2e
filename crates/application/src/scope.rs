use clinica_core::{AppError, AppResult, ClinicId};

/// Upper bound accepted for any caller-supplied page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Capability proving that the authorization gate allowed an action inside one clinic.
///
/// Only [`crate::AuthorizationService`] can mint a scope, and tenant-data
/// repositories accept nothing else, so a tenant query cannot be issued
/// without passing the gate first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClinicScope {
    clinic_id: ClinicId,
}

impl ClinicScope {
    pub(crate) fn new(clinic_id: ClinicId) -> Self {
        Self { clinic_id }
    }

    /// Returns the clinic every query in this scope is restricted to.
    #[must_use]
    pub fn clinic_id(&self) -> ClinicId {
        self.clinic_id
    }

    /// Pairs this scope with a caller filter.
    #[must_use]
    pub fn query<F>(self, filter: F) -> ScopedQuery<F> {
        ScopedQuery {
            scope: self,
            filter,
        }
    }
}

/// Caller filter conjoined with the clinic predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedQuery<F> {
    scope: ClinicScope,
    filter: F,
}

impl<F> ScopedQuery<F> {
    /// Returns the tenant predicate.
    #[must_use]
    pub fn scope(&self) -> ClinicScope {
        self.scope
    }

    /// Returns the clinic the query is restricted to.
    #[must_use]
    pub fn clinic_id(&self) -> ClinicId {
        self.scope.clinic_id()
    }

    /// Returns the caller filter.
    #[must_use]
    pub fn filter(&self) -> &F {
        &self.filter
    }
}

/// Column used to order list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSort {
    /// Creation timestamp.
    CreatedAt,
    /// Primary display column: trade name, patient name, exam description or user name.
    Name,
}

impl RecordSort {
    /// Parses a transport value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "name" | "trade_name" | "tradeName" | "description" => Ok(Self::Name),
            _ => Err(AppError::Validation(format!(
                "unsupported sort column '{value}'"
            ))),
        }
    }
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Parses a transport value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::Validation(format!(
                "unsupported sort direction '{value}'"
            ))),
        }
    }

    /// Returns the SQL keyword.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Search, paging and ordering options for list operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSearch {
    /// Case-insensitive substring matched against the display columns.
    pub search: Option<String>,
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub page_size: u32,
    /// Sort column.
    pub sort: RecordSort,
    /// Sort direction.
    pub direction: SortDirection,
}

impl RecordSearch {
    /// Returns newest-first results for the first page.
    #[must_use]
    pub fn first_page(page_size: u32) -> Self {
        Self {
            search: None,
            page: 1,
            page_size,
            sort: RecordSort::CreatedAt,
            direction: SortDirection::Desc,
        }
    }

    /// Builds a search from optional transport values.
    pub fn from_parts(
        search: Option<String>,
        page: Option<u32>,
        page_size: Option<u32>,
        sort: Option<&str>,
        direction: Option<&str>,
        default_page_size: u32,
    ) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::Validation("page must be at least 1".to_owned()));
        }

        let page_size = page_size.unwrap_or(default_page_size);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Self {
            search: search
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
            page,
            page_size,
            sort: sort.map(RecordSort::parse).transpose()?.unwrap_or(RecordSort::CreatedAt),
            direction: direction
                .map(SortDirection::parse)
                .transpose()?
                .unwrap_or(SortDirection::Desc),
        })
    }

    /// Number of rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Returns the SQL `ILIKE` pattern for the search term.
    #[must_use]
    pub fn like_pattern(&self) -> Option<String> {
        self.search.as_deref().map(|value| {
            let escaped = value
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
    }

    /// Returns whether `candidate` matches the search term.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.search.as_deref().is_none_or(|search| {
            candidate
                .to_lowercase()
                .contains(search.to_lowercase().as_str())
        })
    }
}

/// One page of list results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// One-based page number.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Total matching items across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Creates a page for the given search.
    #[must_use]
    pub fn new(items: Vec<T>, search: &RecordSearch, total: u64) -> Self {
        Self {
            items,
            page: search.page,
            page_size: search.page_size,
            total,
        }
    }

    /// Total number of pages.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }

        self.total.div_ceil(u64::from(self.page_size))
    }

    /// Maps items while keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use clinica_core::ClinicId;

    use super::{ClinicScope, Page, RecordSearch, RecordSort, SortDirection};

    #[test]
    fn scoped_query_carries_clinic_and_filter() {
        let clinic_id = ClinicId::new();
        let query = ClinicScope::new(clinic_id).query("ana");

        assert_eq!(query.clinic_id(), clinic_id);
        assert_eq!(*query.filter(), "ana");
    }

    #[test]
    fn search_defaults_to_newest_first() {
        let search = RecordSearch::from_parts(Some("  ".to_owned()), None, None, None, None, 10);
        assert_eq!(search.ok(), Some(RecordSearch::first_page(10)));
    }

    #[test]
    fn search_rejects_oversized_pages() {
        assert!(RecordSearch::from_parts(None, Some(1), Some(500), None, None, 10).is_err());
        assert!(RecordSearch::from_parts(None, Some(0), None, None, None, 10).is_err());
    }

    #[test]
    fn search_parses_sort_options() {
        let search =
            RecordSearch::from_parts(None, Some(3), Some(20), Some("name"), Some("ASC"), 10);
        let Ok(search) = search else {
            panic!("search should parse");
        };

        assert_eq!(search.sort, RecordSort::Name);
        assert_eq!(search.direction, SortDirection::Asc);
        assert_eq!(search.offset(), 40);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        let mut search = RecordSearch::first_page(10);
        search.search = Some("50%_off".to_owned());
        assert_eq!(search.like_pattern().as_deref(), Some("%50\\%\\_off%"));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2], &RecordSearch::first_page(10), 21);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.map(|value| value * 2).items, vec![2, 4]);
    }
}
