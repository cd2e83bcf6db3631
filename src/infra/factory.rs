use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{AuthRepository, InviteRepository, ResponseRepository, UserRepository};
use crate::domain::services::{auth_service::AuthService, invite_service::InviteService};
use crate::infra::realtime::change_feed::BroadcastChangeFeed;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_invite_repo::PostgresInviteRepo,
    postgres_response_repo::PostgresResponseRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_invite_repo::SqliteInviteRepo,
    sqlite_response_repo::SqliteResponseRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_state(pool, config)
    } else {
        info!("Initializing SQLite connection...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_state(pool, config)
    }
}

/// Wires the SQLite repositories into a fresh state. The pool must already be migrated.
pub fn sqlite_state(pool: SqlitePool, config: &Config) -> AppState {
    assemble_state(
        config,
        Arc::new(SqliteUserRepo::new(pool.clone())),
        Arc::new(SqliteAuthRepo::new(pool.clone())),
        Arc::new(SqliteInviteRepo::new(pool.clone())),
        Arc::new(SqliteResponseRepo::new(pool)),
    )
}

pub fn postgres_state(pool: PgPool, config: &Config) -> AppState {
    assemble_state(
        config,
        Arc::new(PostgresUserRepo::new(pool.clone())),
        Arc::new(PostgresAuthRepo::new(pool.clone())),
        Arc::new(PostgresInviteRepo::new(pool.clone())),
        Arc::new(PostgresResponseRepo::new(pool)),
    )
}

fn assemble_state(
    config: &Config,
    user_repo: Arc<dyn UserRepository>,
    auth_repo: Arc<dyn AuthRepository>,
    invite_repo: Arc<dyn InviteRepository>,
    response_repo: Arc<dyn ResponseRepository>,
) -> AppState {
    let change_feed = Arc::new(BroadcastChangeFeed::new(config.change_feed_capacity));
    let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
    let invite_service = Arc::new(InviteService::new(invite_repo, response_repo, change_feed.clone()));

    AppState {
        config: config.clone(),
        user_repo,
        auth_repo,
        auth_service,
        invite_service,
        change_feed,
        templates: Arc::new(load_templates()),
    }
}

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("share.html", include_str!("../templates/share.html"))
        .expect("Failed to load share template");
    tera
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
