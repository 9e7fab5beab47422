pub mod duckdb;

pub use self::duckdb::DuckDbUserDirectory;

use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

/// Answers whether a user may generate log reports
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn is_super_user(&self, user_id: Uuid) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user directory database error: {0}")]
    Database(#[from] ::duckdb::Error),

    #[error("user directory task failed: {0}")]
    Task(String),
}

/// Fixed allowlist of super users, read from config
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    super_users: HashSet<Uuid>,
}

impl StaticUserDirectory {
    pub fn new<I: IntoIterator<Item = Uuid>>(super_users: I) -> Self {
        Self {
            super_users: super_users.into_iter().collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn is_super_user(&self, user_id: Uuid) -> Result<bool, AuthError> {
        if user_id.is_nil() {
            return Ok(false);
        }
        Ok(self.super_users.contains(&user_id))
    }
}
