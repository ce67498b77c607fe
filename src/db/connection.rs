//! Database connection lifecycle.
//!
//! [`DbConnection`] owns at most one live pool. The pool is created lazily by
//! the first [`DbConnection::ensure_connected`] call and shared by every clone
//! of the handle until [`DbConnection::shutdown`].

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use crate::config::Config;
use crate::db::SqlitePool;
use crate::db::schema;
use crate::error::HubError;

const DEFAULT_MAX_CONNECTIONS: u32 = 8;

#[derive(Clone)]
pub struct DbConnection {
    inner: Arc<Inner>,
}

struct Inner {
    database_url: Option<String>,
    // Published pool. Readers only hold the lock long enough to clone it.
    pool: RwLock<Option<SqlitePool>>,
    // Held across a connect attempt so concurrent callers wait for the
    // in-flight attempt instead of starting their own.
    init: Mutex<()>,
    connected: AtomicBool,
    attempts: AtomicUsize,
}

impl DbConnection {
    /// Build an unconnected manager. No I/O happens until the first
    /// `ensure_connected`.
    pub fn new(database_url: Option<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                database_url,
                pool: RwLock::new(None),
                init: Mutex::new(()),
                connected: AtomicBool::new(false),
                attempts: AtomicUsize::new(0),
            }),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.database_url.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Number of real connection attempts made so far.
    pub fn connect_attempts(&self) -> usize {
        self.inner.attempts.load(Ordering::Acquire)
    }

    /// Connect eagerly at startup.
    pub async fn init(&self) -> Result<(), HubError> {
        self.ensure_connected().await.map(|_| ())
    }

    /// Return the live pool, connecting (and registering the schema) first if
    /// needed. Safe to call on every request path.
    pub async fn ensure_connected(&self) -> Result<SqlitePool, HubError> {
        if let Some(pool) = self.live_pool().await {
            return Ok(pool);
        }

        let _init = self.inner.init.lock().await;
        // another caller may have connected while we waited
        if let Some(pool) = self.live_pool().await {
            return Ok(pool);
        }
        self.inner.connected.store(false, Ordering::Release);

        let url = self.database_url()?;
        let opts = SqliteConnectOptions::from_str(url)
            .map_err(|e| HubError::InvalidDatabaseUrl(e.to_string()))?
            .create_if_missing(true);

        let mut pool_opts = SqlitePoolOptions::new().max_connections(DEFAULT_MAX_CONNECTIONS);
        if is_in_memory(url) {
            // every connection to `:memory:` is a separate database
            pool_opts = pool_opts
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        self.inner.attempts.fetch_add(1, Ordering::AcqRel);
        info!(database_url = %url, "connecting to database");
        let pool = match pool_opts.connect_with(opts).await {
            Ok(pool) => pool,
            Err(e) => {
                error!(database_url = %url, error = %e, "database connection failed");
                return Err(HubError::Connect(e));
            }
        };

        if let Err(e) = schema::register_all(&pool).await {
            error!(error = %e, "schema registration failed");
            pool.close().await;
            return Err(e);
        }

        *self.inner.pool.write().await = Some(pool.clone());
        self.inner.connected.store(true, Ordering::Release);
        info!("database connected");
        Ok(pool)
    }

    /// Close the pool. Idempotent; a later `ensure_connected` reconnects.
    pub async fn shutdown(&self) {
        let taken = {
            let mut slot = self.inner.pool.write().await;
            self.inner.connected.store(false, Ordering::Release);
            slot.take()
        };
        if let Some(pool) = taken {
            pool.close().await;
            info!("database connection closed");
        }
    }

    async fn live_pool(&self) -> Option<SqlitePool> {
        self.inner
            .pool
            .read()
            .await
            .as_ref()
            .filter(|pool| !pool.is_closed())
            .cloned()
    }

    fn database_url(&self) -> Result<&str, HubError> {
        match self.inner.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => {
                error!("DATABASE_URL is not configured");
                Err(HubError::MissingDatabaseUrl)
            }
        }
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
