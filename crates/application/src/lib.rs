//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod authorization_service;
mod clinic_service;
mod record_ports;
mod record_service;
mod scope;
mod session_resolver;
mod tenant_ports;
mod user_ports;
mod user_service;

#[cfg(test)]
mod test_support;

pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::AuthorizationService;
pub use clinic_service::ClinicService;
pub use record_ports::{RecordRepository, TenantRecord};
pub use record_service::{ClientService, ExamService, PatientService, RecordService};
pub use scope::{
    ClinicScope, MAX_PAGE_SIZE, Page, RecordSearch, RecordSort, ScopedQuery, SortDirection,
};
pub use session_resolver::{SESSION_MAX_AGE_HOURS, SessionPrincipal, SessionResolver};
pub use tenant_ports::{ClinicRepository, MembershipRepository};
pub use user_ports::{NewUser, PasswordHasher, UserRecord, UserRepository, UserSummary};
pub use user_service::{AuthOutcome, USER_PAGE_SIZE, UpsertUserInput, UpsertUserOutcome, UserService};
