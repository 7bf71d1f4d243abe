//! Test support for bizplan: throwaway PostgreSQL databases with the plans
//! schema applied.
//!
//! [`TestDb::new`] hands each test its own freshly-migrated database inside
//! one shared server. The server comes from `BIZPLAN_TEST_PG_URL` when a CI
//! setup script already started one, otherwise a testcontainers instance is
//! started on first use and lives for the rest of the test binary.

use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

struct PgServer {
    url: String,
    /// Keeps the container running. `None` when the server is external.
    _keep: Option<ContainerAsync<Postgres>>,
}

static PG_SERVER: OnceCell<PgServer> = OnceCell::const_new();

async fn server_url() -> &'static str {
    PG_SERVER
        .get_or_init(|| async {
            if let Ok(url) = std::env::var("BIZPLAN_TEST_PG_URL") {
                return PgServer { url, _keep: None };
            }
            let container = Postgres::default()
                .with_tag("18")
                .start()
                .await
                .expect("postgres container failed to start");
            let host = container.get_host().await.expect("container host");
            let port = container
                .get_host_port_ipv4(5432)
                .await
                .expect("container port");
            PgServer {
                url: format!("postgresql://postgres:postgres@{host}:{port}"),
                _keep: Some(container),
            }
        })
        .await
        .url
        .as_str()
}

/// One connection to the server's `postgres` database, for CREATE/DROP
/// DATABASE statements.
async fn admin_connection(base: &str) -> PgConnection {
    PgConnection::connect(&format!("{base}/postgres"))
        .await
        .expect("admin connection to test server failed")
}

/// A uniquely-named database with migrations applied, plus a pool into it.
///
/// Call [`TestDb::teardown`] at the end of the test; a leaked database is
/// harmless (the server is disposable) but noisy when running against an
/// external server.
pub struct TestDb {
    pub pool: PgPool,
    name: String,
}

impl TestDb {
    pub async fn new() -> Self {
        let base = server_url().await;
        let name = format!("bizplan_test_{}", Uuid::new_v4().simple());

        let mut admin = admin_connection(base).await;
        admin
            .execute(format!("CREATE DATABASE {name}").as_str())
            .await
            .unwrap_or_else(|e| panic!("CREATE DATABASE {name} failed: {e}"));
        let _ = admin.close().await;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&format!("{base}/{name}"))
            .await
            .unwrap_or_else(|e| panic!("connecting to {name} failed: {e}"));
        bizplan_db::pool::run_migrations(&pool)
            .await
            .expect("schema should apply to a fresh database");

        Self { pool, name }
    }

    /// Close the pool and drop the database, forcing out any connection a
    /// test left behind.
    pub async fn teardown(self) {
        self.pool.close().await;

        let base = server_url().await;
        let mut admin = admin_connection(base).await;
        let _ = admin
            .execute(format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", self.name).as_str())
            .await;
        let _ = admin.close().await;
    }
}
