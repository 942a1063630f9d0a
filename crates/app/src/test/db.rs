//! Per-test Postgres databases
//!
//! One container is started for the whole test run. Every [`TestDb`] gets a
//! freshly migrated database inside it, dropped again in the background once
//! the test is done.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

pub(super) const SUPERUSER: &str = "larder_test";
pub(super) const SUPERUSER_PASSWORD: &str = "larder_test_password";

static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

/// Database names are interpolated into DDL, so only plain identifiers are accepted.
fn validate_database_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 63 {
        return Err("database name must be 1-63 characters long".to_string());
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err("database name must start with a letter or underscore".to_string());
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("database name may only contain letters, digits and underscores".to_string());
    }

    Ok(())
}

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(SUPERUSER)
        .with_password(SUPERUSER_PASSWORD)
        .with_db_name("larder_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(err) = drop_database(&name).await {
                eprintln!("Failed to drop test database '{name}': {err}");
            }
        }
    });

    sender
}

/// Connection URL for `database` on the shared container.
pub(super) async fn server_url(user: &str, password: &str, database: &str) -> String {
    let container = POSTGRES_CONTAINER
        .get_or_init(init_postgres_container)
        .await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{user}:{password}@{host}:{port}/{database}")
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    if POSTGRES_CONTAINER.get().is_none() || validate_database_name(name).is_err() {
        return Ok(());
    }

    let url = server_url(SUPERUSER, SUPERUSER_PASSWORD, "postgres").await;
    let mut conn = PgConnection::connect(&url).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// An isolated, migrated database.
///
/// Services commit normally; isolation comes from every test owning its own
/// database rather than from rolling transactions back.
#[derive(Debug)]
pub struct TestDb {
    pool: PgPool,
    pub name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock before unix epoch")
            .as_nanos();

        let thread = format!("{:?}", std::thread::current().id());
        let thread: String = thread.chars().filter(char::is_ascii_digit).collect();

        Self::with_name(&format!("larder_test_{nanos}_{thread}")).await
    }

    pub async fn with_name(name: &str) -> Self {
        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        if let Err(error) = validate_database_name(name) {
            panic!("Invalid database name '{name}': {error}");
        }

        let admin_url = server_url(SUPERUSER, SUPERUSER_PASSWORD, "postgres").await;

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close().await.expect("Failed to close admin connection");

        let pool = PgPool::connect(&server_url(SUPERUSER, SUPERUSER_PASSWORD, name).await)
            .await
            .expect("Failed to create pool for database");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations on database");

        Self {
            pool,
            name: name.to_string(),
        }
    }

    /// Superuser pool; bypasses row-level security, so use it for seeding only.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_generated_names() {
        assert!(validate_database_name("larder_test_1729230000_12").is_ok());
        assert!(validate_database_name("_scratch").is_ok());
    }

    #[test]
    fn rejects_names_that_need_quoting() {
        assert!(validate_database_name("").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
        assert!(validate_database_name("1st").is_err());
        assert!(validate_database_name("drop-me").is_err());
        assert!(validate_database_name("name\"; DROP DATABASE postgres; --").is_err());
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn migrations_apply_to_a_fresh_database() {
        let test_db = TestDb::new().await;

        let tables: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name IN ('orders', 'wallets', 'coupons')",
        )
        .fetch_one(test_db.pool())
        .await
        .expect("Failed to query information schema");

        assert_eq!(tables, 3);
    }
}
