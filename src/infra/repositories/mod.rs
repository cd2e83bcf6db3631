pub mod sqlite_auth_repo;
pub mod sqlite_invite_repo;
pub mod sqlite_response_repo;
pub mod sqlite_user_repo;

pub mod postgres_auth_repo;
pub mod postgres_invite_repo;
pub mod postgres_response_repo;
pub mod postgres_user_repo;
