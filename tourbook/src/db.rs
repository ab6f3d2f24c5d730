mod handle;
mod repository;

pub use handle::*;
pub use repository::*;

use crate::config::DatabaseConfig;

// Application default db driver
pub type AppDbDriver = sqlx::Postgres;
pub type AppDbHandle = Handle<AppDbDriver>;
pub type AppDbPool = sqlx::Pool<AppDbDriver>;

pub fn map_err(e: sqlx::Error) -> crate::Error {
    crate::Error::Database(anyhow::Error::new(e))
}

pub async fn connect(config: &DatabaseConfig) -> crate::Result<AppDbPool> {
    let pool = sqlx::pool::PoolOptions::<AppDbDriver>::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .map_err(map_err)?;
    tracing::info!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

/// Pool that opens no connection until first use. Services built on it work
/// against in-memory repositories that never touch the handle.
pub fn connect_lazy(url: &str) -> crate::Result<AppDbPool> {
    sqlx::pool::PoolOptions::<AppDbDriver>::new()
        .max_connections(1)
        .connect_lazy(url)
        .map_err(map_err)
}
