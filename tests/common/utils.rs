use secrecy::ExposeSecret;
use serde_json::{json, Value};
use sqlx::{PgPool, PgConnection, Connection, Executor};
use std::net::TcpListener;
use std::sync::Arc;
use uuid::Uuid;
use once_cell::sync::Lazy;
use reqwest::Client;

use aoe_ledger_backend::run;
use aoe_ledger_backend::config::jwt::JwtSettings;
use aoe_ledger_backend::config::settings::{get_config, DatabaseSettings};
use aoe_ledger_backend::db::{InMemoryStore, MatchStore, PgMatchStore};
use aoe_ledger_backend::telemetry::{get_subscriber, init_subscriber};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "password123";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp<S = InMemoryStore> {
    pub address: String,
    pub store: Arc<S>,
    pub client: Client,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    launch(Arc::new(InMemoryStore::new())).await
}

/// Same app over a fresh, migrated Postgres database.
/// Returns `None` when no Postgres server is reachable.
pub async fn spawn_app_with_postgres() -> Option<TestApp<PgMatchStore>> {
    Lazy::force(&TRACING);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    configuration.database.db_url = None;
    let connection_pool = configure_db(&configuration.database).await?;

    Some(launch(Arc::new(PgMatchStore::new(connection_pool))).await)
}

pub async fn configure_db(config: &DatabaseSettings) -> Option<PgPool> {
    // Create database
    let mut connection = match PgConnection::connect(&config.connection_string_without_db()).await {
        Ok(connection) => connection,
        Err(e) => {
            eprintln!("Postgres is not reachable, skipping: {}", e);
            return None;
        }
    };
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    Some(connection_pool)
}

async fn launch<S: MatchStore + 'static>(store: Arc<S>) -> TestApp<S> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Low cost keeps the suite fast, verification does not depend on it
    let password_hash = bcrypt::hash(ADMIN_PASSWORD, 4).expect("Failed to hash password");
    store
        .upsert_admin(ADMIN_EMAIL, &password_hash)
        .await
        .expect("Failed to seed admin");

    let jwt_settings = JwtSettings::new("test-secret".to_string(), 1);
    let server = run(
        listener,
        store.clone(),
        jwt_settings,
        vec!["http://localhost:3000".to_string()],
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        client: Client::new(),
    }
}

impl<S> TestApp<S> {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn login(&self) -> String {
        let response = self.client
            .post(self.url("/login"))
            .json(&json!({
                "email": ADMIN_EMAIL,
                "password": ADMIN_PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute login request.");
        assert_eq!(200, response.status().as_u16(), "Admin login should succeed");

        let body: Value = response.json().await.expect("Failed to parse login response");
        body["token"].as_str().expect("No token in response").to_string()
    }

    pub async fn create_player(&self, token: &str, body: Value) -> Value {
        let response = self.client
            .post(self.url("/admin/players"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Failed to create player.");
        assert_eq!(201, response.status().as_u16(), "Player creation should succeed");

        let body: Value = response.json().await.expect("Failed to parse player response");
        body["data"].clone()
    }

    /// Creates a player by name only and returns its id
    pub async fn create_named_player(&self, token: &str, name: &str) -> Uuid {
        let player = self.create_player(token, json!({ "name": name })).await;
        player_id(&player)
    }

    pub async fn post_match(&self, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/admin/matches"))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to post match.")
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.");
        let status = response.status().as_u16();
        let body = response.json().await.expect("Failed to parse response body");
        (status, body)
    }

    pub async fn get_json_with_token(&self, path: &str, token: &str) -> (u16, Value) {
        let response = self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.");
        let status = response.status().as_u16();
        let body = response.json().await.expect("Failed to parse response body");
        (status, body)
    }
}

pub fn player_id(player: &Value) -> Uuid {
    player["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("Player without id")
}

pub fn participant(player_id: Uuid, team: u8, civilization: &str) -> Value {
    json!({
        "player_id": player_id,
        "team": team,
        "civilization": civilization,
        "player_color": "Red"
    })
}

/// A valid 1v1 body with `winner` beating `loser`
pub fn one_vs_one(winner: Uuid, loser: Uuid) -> Value {
    json!({
        "map_name": "Arabia",
        "game_mode": "1v1",
        "duration_minutes": 32,
        "winner_team": 1,
        "participants": [
            participant(winner, 1, "Franks"),
            participant(loser, 2, "Britons")
        ]
    })
}
