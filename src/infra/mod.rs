pub mod client;
pub mod factory;
pub mod realtime;
pub mod repositories;
