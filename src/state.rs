use std::sync::Arc;
use crate::domain::ports::{AuthRepository, UserRepository};
use crate::domain::services::{auth_service::AuthService, invite_service::InviteService};
use crate::infra::realtime::change_feed::BroadcastChangeFeed;
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
    pub invite_service: Arc<InviteService>,
    pub change_feed: Arc<BroadcastChangeFeed>,
    pub templates: Arc<Tera>,
}
