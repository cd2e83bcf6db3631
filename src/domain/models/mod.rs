pub mod auth;
pub mod change;
pub mod invite;
pub mod response;
pub mod user;
