pub mod auth;
pub mod device;
pub mod maybe_auth;
