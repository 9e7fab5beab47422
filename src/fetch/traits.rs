use crate::model::{LogEntry, StreamGroupId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Remote log store that holds groups of append-only streams
#[async_trait]
pub trait LogStore: Send + Sync {
    /// The single stream in `group` with the most recent activity.
    /// `Ok(None)` when the group exists but holds no streams,
    /// `Err(LogStoreError::GroupNotFound)` when the group does not exist.
    async fn latest_stream(&self, group: &StreamGroupId)
        -> Result<Option<StreamHandle>, LogStoreError>;

    /// Read one page from the tail of a stream, walking backward in time.
    async fn read_tail(
        &self,
        group: &StreamGroupId,
        stream: &StreamHandle,
        request: TailRequest,
    ) -> Result<TailPage, LogStoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHandle {
    pub name: String,
    pub last_event: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailRequest {
    /// Maximum number of entries wanted from this page
    pub limit: usize,
    /// Backward token from the previous page, `None` for the first page
    pub backward_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailPage {
    pub entries: Vec<LogEntry>,
    /// Cursor for the next page further back in history
    pub backward_token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LogStoreError {
    #[error("log group not found")]
    GroupNotFound,

    #[error("log store request failed: {0}")]
    Remote(String),
}
