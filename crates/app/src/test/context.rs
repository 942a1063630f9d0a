//! Test context for service-level integration tests.

use std::sync::Arc;

use sqlx::{Connection, PgConnection, PgPool, query};

use crate::{
    database::Db,
    domain::{
        catalog::{CatalogService, PgCatalogService},
        coupons::PgCouponsService,
        loyalty::PgLoyaltyService,
        orders::PgOrderEvents,
        reviews::PgReviewsService,
        wallet::PgWalletService,
    },
};

use super::db::{SUPERUSER, SUPERUSER_PASSWORD, TestDb, server_url};

/// Login role the services connect as. It is not a superuser, so row-level security applies.
const APP_ROLE: &str = "larder_app_test";
const APP_ROLE_PASSWORD: &str = "larder_app_test_pass";

pub struct TestContext {
    /// Superuser access for seeding.
    pub db: TestDb,

    /// What the services use.
    pub app_db: Db,

    pub catalog: Arc<dyn CatalogService>,
    pub coupons: PgCouponsService,
    pub loyalty: PgLoyaltyService,
    pub wallet: PgWalletService,
    pub reviews: PgReviewsService,
    pub order_events: PgOrderEvents,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let app_pool = app_pool(&test_db).await;
        let app_db = Db::new(app_pool.clone());

        Self {
            catalog: Arc::new(PgCatalogService::new(app_db.clone())),
            coupons: PgCouponsService::new(app_db.clone()),
            loyalty: PgLoyaltyService::new(app_db.clone()),
            wallet: PgWalletService::new(app_db.clone()),
            reviews: PgReviewsService::new(app_db.clone()),
            order_events: PgOrderEvents::new(app_pool),
            app_db,
            db: test_db,
        }
    }
}

/// Create the app role (once per server), grant it access to `test_db` and connect as it.
async fn app_pool(test_db: &TestDb) -> PgPool {
    let mut server = PgConnection::connect(
        &server_url(SUPERUSER, SUPERUSER_PASSWORD, "postgres").await,
    )
    .await
    .expect("Failed to connect for role setup");

    // Parallel tests race to create the role; "already exists" (42710) and the
    // catalog's unique violation (23505) both mean it is there.
    let created = query(&format!(
        "CREATE ROLE {APP_ROLE} WITH LOGIN PASSWORD '{APP_ROLE_PASSWORD}' \
         NOSUPERUSER NOCREATEDB NOCREATEROLE"
    ))
    .execute(&mut server)
    .await;

    match created {
        Ok(_) => {}
        Err(sqlx::Error::Database(ref e))
            if matches!(e.code().as_deref(), Some("42710" | "23505")) => {}
        Err(error) => panic!("Failed to create app role: {error}"),
    }

    query(&format!(
        "GRANT CONNECT ON DATABASE \"{}\" TO {APP_ROLE}",
        test_db.name
    ))
    .execute(&mut server)
    .await
    .expect("Failed to grant CONNECT on test database");

    server.close().await.expect("Failed to close server connection");

    for statement in [
        format!("GRANT USAGE ON SCHEMA public TO {APP_ROLE}"),
        format!("GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {APP_ROLE}"),
    ] {
        query(&statement)
            .execute(test_db.pool())
            .await
            .expect("Failed to grant privileges to app role");
    }

    PgPool::connect(&server_url(APP_ROLE, APP_ROLE_PASSWORD, &test_db.name).await)
        .await
        .expect("Failed to create app pool")
}
