//! `DuckDB` connection pool management.
//!
//! The storage file is owned for the process lifetime; each unit of
//! work (table create, batch insert, read) acquires a connection from
//! the pool and returns it on drop.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use duckdb::Connection;

struct PoolInner {
    db_path: PathBuf,
    max_pool_size: usize,
    idle: Mutex<Vec<Connection>>,
}

/// A connection pool manager for `DuckDB` connections.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Create a new connection pool manager.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, max_pool_size: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                db_path: path.into(),
                max_pool_size: max_pool_size.max(1),
                idle: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Acquire a connection, reusing an idle one when available.
    ///
    /// # Panics
    /// Panics if the pool mutex is poisoned (a previous panic while
    /// holding the lock).
    pub fn acquire(&self) -> Result<PooledConnection, duckdb::Error> {
        let connection = self
            .inner
            .idle
            .lock()
            .expect("duckdb connection pool mutex poisoned")
            .pop();

        let connection = match connection {
            Some(connection) => connection,
            None => open_connection(self.inner.db_path.as_path())?,
        };

        Ok(PooledConnection {
            pool: Arc::clone(&self.inner),
            connection: Some(connection),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        self.inner.db_path.as_path()
    }
}

/// A pooled connection that returns to the pool when dropped.
pub struct PooledConnection {
    pool: Arc<PoolInner>,
    connection: Option<Connection>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        self.connection
            .as_ref()
            .expect("pooled connection unexpectedly missing")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.connection
            .as_mut()
            .expect("pooled connection unexpectedly missing")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };

        let mut idle = self
            .pool
            .idle
            .lock()
            .expect("duckdb connection pool mutex poisoned");
        if idle.len() < self.pool.max_pool_size {
            idle.push(connection);
        }
    }
}

fn open_connection(path: &Path) -> Result<Connection, duckdb::Error> {
    let connection = Connection::open(path)?;
    connection.execute_batch("PRAGMA disable_progress_bar;")?;
    Ok(connection)
}
