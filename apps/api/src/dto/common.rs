use clinica_application::Page;
use clinica_domain::Permission;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// Status of one backing dependency.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

/// Query string shared by record listings.
#[derive(Debug, Default, Deserialize)]
pub struct RecordListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub order_by: Option<String>,
    pub order: Option<String>,
}

/// One page of a listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/page-response.ts"
)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    pub fn from_page<R>(page: Page<R>) -> Self
    where
        T: From<R>,
    {
        let total_pages = page.total_pages();
        let page = page.map(T::from);

        Self {
            items: page.items,
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages,
        }
    }
}

/// Catalog entry for one grantable permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub permission: String,
    pub display_name: String,
    pub description: String,
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            permission: value.as_str().to_owned(),
            display_name: value.display_name().to_owned(),
            description: value.description().to_owned(),
        }
    }
}
