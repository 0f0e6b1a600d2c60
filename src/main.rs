use std::net::TcpListener;
use std::sync::Arc;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use aoe_ledger_backend::run;
use aoe_ledger_backend::config::settings::{get_config, get_jwt_settings, AdminSettings};
use aoe_ledger_backend::db::{MatchStore, PgMatchStore};
use aoe_ledger_backend::telemetry::{get_subscriber, init_subscriber};
use aoe_ledger_backend::utils::password::hash_password;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "aoe-ledger-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    let jwt_settings = get_jwt_settings(&config);

    // Only try to establish connection when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(16)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(
            config.database.connection_string().expose_secret()
        )
        .expect("Failed to create Postgres connection pool");

    let store = PgMatchStore::new(connection_pool);
    if let Err(e) = store.migrate().await {
        tracing::error!("❌ Failed to run database migrations: {}", e);
        std::process::exit(1);
    }
    tracing::info!("✅ Database migrations applied");

    if let Some(admin) = &config.admin {
        if let Err(e) = bootstrap_admin(&store, admin).await {
            tracing::error!("❌ Failed to create admin {}: {}", admin.email, e);
            std::process::exit(1);
        }
    }

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    run(
        listener,
        Arc::new(store),
        jwt_settings,
        config.application.allowed_origins.clone()
    )?.await
}

async fn bootstrap_admin(
    store: &PgMatchStore,
    admin: &AdminSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let password_hash = hash_password(admin.password.expose_secret())?;
    let created = store.upsert_admin(&admin.email, &password_hash).await?;
    tracing::info!("Admin account {} is ready", created.email);
    Ok(())
}
