//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_repository;
mod postgres_audit_repository;
mod postgres_client_repository;
mod postgres_clinic_repository;
mod postgres_exam_repository;
mod postgres_membership_repository;
mod postgres_patient_repository;
mod postgres_user_repository;
mod scoped_sql;


pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_repository::{InMemoryRecord, InMemoryRepository};
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_client_repository::PostgresClientRepository;
pub use postgres_clinic_repository::PostgresClinicRepository;
pub use postgres_exam_repository::PostgresExamRepository;
pub use postgres_membership_repository::PostgresMembershipRepository;
pub use postgres_patient_repository::PostgresPatientRepository;
pub use postgres_user_repository::PostgresUserRepository;

/// Embedded SQL migrations for the clinic schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
