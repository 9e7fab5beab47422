use super::{AuthError, UserDirectory};
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// DuckDB-backed user directory.
///
/// Schema: `users(user_id VARCHAR PRIMARY KEY, is_super_user BOOLEAN)`.
pub struct DuckDbUserDirectory {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbUserDirectory {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let conn = Connection::open(path.as_ref())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory directory (for testing)
    pub fn in_memory() -> Result<Self, AuthError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn init_schema(&self) -> Result<(), AuthError> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS users (
                    user_id VARCHAR PRIMARY KEY,
                    is_super_user BOOLEAN NOT NULL DEFAULT false
                );",
            )?;
            Ok(())
        })
        .await
    }

    /// Insert a user or update their super-user flag
    pub async fn upsert_user(&self, user_id: Uuid, is_super_user: bool) -> Result<(), AuthError> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO users (user_id, is_super_user) VALUES (?, ?)",
                duckdb::params![user_id, is_super_user],
            )?;
            Ok(())
        })
        .await
    }

    async fn with_conn<F, T>(&self, f: F) -> Result<T, AuthError>
    where
        F: FnOnce(&Connection) -> Result<T, AuthError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| AuthError::Task("connection mutex poisoned".to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| AuthError::Task(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl UserDirectory for DuckDbUserDirectory {
    async fn is_super_user(&self, user_id: Uuid) -> Result<bool, AuthError> {
        if user_id.is_nil() {
            return Ok(false);
        }

        let user_id = user_id.to_string();
        self.with_conn(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE user_id = ? AND is_super_user = true",
                duckdb::params![user_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
    }
}
