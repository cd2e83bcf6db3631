pub mod auth;
pub mod dashboard;
pub mod health;
pub mod invite;
pub mod profile;
pub mod public_invite;
pub mod share;
