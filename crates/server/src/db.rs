use axum::extract::FromRef;
use shared_types::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Shared state for axum handlers and middleware.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Postgres>,
}

/// The one pool of the process. Set by [`init`], read by [`get_db`].
static POOL: OnceLock<Pool<Postgres>> = OnceLock::new();
static MIGRATED: AtomicBool = AtomicBool::new(false);

/// Build a pool from `DATABASE_URL`. No connection is opened until the first query.
fn create_pool() -> Pool<Postgres> {
    let _ = dotenvy::dotenv();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(&database_url)
        .expect("DATABASE_URL is not a valid Postgres URL")
}

fn install(make: impl FnOnce() -> Pool<Postgres>) -> &'static Pool<Postgres> {
    POOL.get_or_init(make)
}

/// Create the process pool and bring the schema up to date. Later calls
/// return the same pool without migrating again.
pub async fn init() -> &'static Pool<Postgres> {
    let pool = install(create_pool);
    if !MIGRATED.swap(true, Ordering::SeqCst) {
        sqlx::migrate!("../../migrations")
            .run(pool)
            .await
            .expect("database migrations failed");
        tracing::info!("database migrations applied");
    }
    pool
}

/// Pool used by server functions.
pub fn get_db() -> Result<&'static Pool<Postgres>, AppError> {
    POOL.get().ok_or_else(|| {
        tracing::error!("database pool requested before db::init");
        AppError::database("Database is not available")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn server_functions_share_the_startup_pool() {
        assert!(get_db().is_err());

        let installed = install(|| {
            PgPoolOptions::new()
                .connect_lazy("postgres://localhost/policydesk_test")
                .unwrap()
        });
        let read = get_db().unwrap();
        assert!(std::ptr::eq(installed, read));

        let again = install(|| panic!("pool built twice"));
        assert!(std::ptr::eq(installed, again));
    }
}
