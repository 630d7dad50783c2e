pub mod clinics;
pub mod health;
pub mod permissions;
pub mod records;
pub mod users;
