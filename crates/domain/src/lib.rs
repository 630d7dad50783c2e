//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod client;
mod clinic;
mod exam;
mod patient;
mod security;
mod text;
mod user;

pub use client::{Address, Client, ClientProfile, PersonKind};
pub use clinic::{Clinic, Membership};
pub use exam::{Exam, ExamKind, ExamProfile};
pub use patient::{Patient, PatientProfile, PatientSex};
pub use security::{AuditAction, Permission, PermissionSet};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, ensure_assignable_role,
    validate_password,
};
