//! Database handle shared by service modules.
//!
//! Opens an sqlx pool for the engine named by the DSN scheme and wraps it in a
//! SeaORM [`DatabaseConnection`], which is what repositories consume.
//!
//! ```rust,no_run
//! # async fn demo() -> modkit_db::Result<()> {
//! use modkit_db::{ConnectOpts, DbHandle};
//!
//! let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
//! let conn = db.sea(); // cheap clone
//! # drop(conn);
//! db.close().await;
//! # Ok(())
//! # }
//! ```

pub mod sqlite;

use std::time::Duration;

use sea_orm::DatabaseConnection;
use thiserror::Error;

#[cfg(feature = "pg")]
use sea_orm::SqlxPostgresConnector;
#[cfg(feature = "sqlite")]
use sea_orm::SqlxSqliteConnector;
use sqlx::pool::PoolOptions;
#[cfg(feature = "sqlite")]
use sqlx::sqlite::SqliteConnectOptions;

pub use sqlite::{is_memory_dsn, resolve_sqlite_dsn};

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("database engine {0:?} not compiled in")]
    EngineDisabled(DbEngine),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

/// Pool settings; `sqlite_busy_timeout` only applies to SQLite.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    pub max_conns: Option<u32>,
    pub acquire_timeout: Option<Duration>,
    pub sqlite_busy_timeout: Option<Duration>,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            acquire_timeout: Some(Duration::from_secs(30)),
            sqlite_busy_timeout: Some(Duration::from_millis(5000)),
        }
    }
}

impl ConnectOpts {
    fn pool<DB: sqlx::Database>(&self) -> PoolOptions<DB> {
        let mut pool = PoolOptions::<DB>::new();
        if let Some(n) = self.max_conns {
            pool = pool.max_connections(n);
        }
        if let Some(t) = self.acquire_timeout {
            pool = pool.acquire_timeout(t);
        }
        pool
    }
}

/// An open pool behind a SeaORM connection, plus the DSN it was opened with.
#[derive(Clone, Debug)]
pub struct DbHandle {
    engine: DbEngine,
    dsn: String,
    sea: DatabaseConnection,
}

impl DbHandle {
    /// Engine named by the DSN scheme (`postgres`, `postgresql` or `sqlite`).
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        let scheme = dsn.trim_start().split_once(':').map(|(s, _)| s);
        match scheme {
            Some("postgres" | "postgresql") => Ok(DbEngine::Postgres),
            Some("sqlite") => Ok(DbEngine::Sqlite),
            _ => Err(DbError::UnknownDsn(dsn.to_string())),
        }
    }

    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        let sea = match engine {
            DbEngine::Postgres => connect_postgres(dsn, &opts).await?,
            DbEngine::Sqlite => connect_sqlite(dsn, &opts).await?,
        };
        tracing::debug!(?engine, "database pool ready");
        Ok(Self {
            engine,
            dsn: dsn.to_string(),
            sea,
        })
    }

    pub async fn close(self) {
        if let Err(e) = self.sea.close().await {
            tracing::warn!(error = %e, "error while closing database pool");
        }
    }

    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Cloned SeaORM connection; clones share the pool.
    pub fn sea(&self) -> DatabaseConnection {
        self.sea.clone()
    }
}

#[cfg(feature = "pg")]
async fn connect_postgres(dsn: &str, opts: &ConnectOpts) -> Result<DatabaseConnection> {
    let pool = opts.pool::<sqlx::Postgres>().connect(dsn).await?;
    Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
}

#[cfg(not(feature = "pg"))]
async fn connect_postgres(_dsn: &str, _opts: &ConnectOpts) -> Result<DatabaseConnection> {
    Err(DbError::EngineDisabled(DbEngine::Postgres))
}

#[cfg(feature = "sqlite")]
async fn connect_sqlite(dsn: &str, opts: &ConnectOpts) -> Result<DatabaseConnection> {
    use std::str::FromStr;

    let mut conn = SqliteConnectOptions::from_str(dsn)?.create_if_missing(true);
    if let Some(t) = opts.sqlite_busy_timeout {
        conn = conn.busy_timeout(t);
    }

    let mut pool = opts.pool::<sqlx::Sqlite>();
    if is_memory_dsn(dsn) {
        // An in-memory database is dropped with its last connection.
        pool = pool.min_connections(1).idle_timeout(None).max_lifetime(None);
    }
    let pool = pool.connect_with(conn).await?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

#[cfg(not(feature = "sqlite"))]
async fn connect_sqlite(_dsn: &str, _opts: &ConnectOpts) -> Result<DatabaseConnection> {
    Err(DbError::EngineDisabled(DbEngine::Sqlite))
}
