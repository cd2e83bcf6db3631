pub mod auth_service;
pub mod dashboard;
pub mod interaction;
pub mod invite_service;
pub mod metrics;
pub mod scratch;
