pub mod device_store;
pub mod http_invite_client;
