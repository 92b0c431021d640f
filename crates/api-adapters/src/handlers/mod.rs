pub mod auth;
pub mod expert;
pub mod user;
