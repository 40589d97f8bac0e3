/*!
 * Database connection management.
 *
 * This module handles SQLite database connection creation, initialization,
 * and provides async-safe access patterns using tokio's spawn_blocking.
 * The connection is opened once at startup and shared by every request;
 * `close` releases it on shutdown, after which every operation reports
 * the store as unavailable.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::schema;
use crate::errors::StoreError;

/// Database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Shared connection; `None` once closed
    connection: Arc<Mutex<Option<Connection>>>,
}

impl DatabaseConnection {
    /// Create a new database connection at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory database");

        let conn =
            Connection::open_in_memory().context("Failed to create in-memory database")?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Whether the connection is still open
    pub fn is_open(&self) -> bool {
        self.connection
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Close the connection; later operations fail with `StoreError::Unavailable`
    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Failed to acquire database lock: {}", e)))?;

        if let Some(conn) = guard.take() {
            conn.close()
                .map_err(|(_, e)| StoreError::Unavailable(format!("Failed to close database: {}", e)))?;
            info!("Closed database at: {:?}", self.db_path);
        }

        Ok(())
    }

    /// Execute a database operation with the connection
    ///
    /// This method acquires the mutex lock and executes the provided closure
    /// with access to the connection. For async contexts, use `execute_async`.
    pub fn execute<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        with_connection(&self.connection, f)
    }

    /// Execute a database operation asynchronously using spawn_blocking
    ///
    /// This is the preferred method for async contexts as it prevents
    /// blocking the async runtime.
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || with_connection(&conn, f)).await?
    }
}

fn with_connection<F, T>(connection: &Mutex<Option<Connection>>, f: F) -> Result<T, StoreError>
where
    F: FnOnce(&Connection) -> Result<T, StoreError>,
{
    let guard = connection
        .lock()
        .map_err(|e| StoreError::Unavailable(format!("Failed to acquire database lock: {}", e)))?;

    match guard.as_ref() {
        Some(conn) => f(conn),
        None => Err(StoreError::Unavailable("Database connection is closed".to_string())),
    }
}
