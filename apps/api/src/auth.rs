mod password;
mod session;
mod session_helpers;

pub use password::login_handler;
pub use session::{logout_handler, me_handler};
pub use session_helpers::read_session_principal;

/// Session key holding the serialized `SessionPrincipal`.
pub const SESSION_PRINCIPAL_KEY: &str = "session_principal";
