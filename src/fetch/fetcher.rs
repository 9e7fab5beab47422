use super::traits::{LogStore, LogStoreError, StreamHandle, TailRequest};
use crate::model::{LogBatch, LogEntry, StreamGroupId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("log store failed for group {group} after {pages_read} page(s): {source}")]
    Store {
        group: StreamGroupId,
        pages_read: usize,
        #[source]
        source: LogStoreError,
    },

    #[error("group {group} still had more entries after {pages_read} page(s)")]
    PaginationLimit {
        group: StreamGroupId,
        pages_read: usize,
    },
}

/// Fetches the newest entries of a group's most recently active stream
pub struct LogFetcher {
    store: Arc<dyn LogStore>,
    max_pages: usize,
}

impl LogFetcher {
    pub fn new(store: Arc<dyn LogStore>, max_pages: usize) -> Self {
        Self {
            store,
            max_pages: max_pages.max(1),
        }
    }

    /// Fetch at most `max_entries` of the newest entries in `group`.
    ///
    /// A group that does not exist, or that has no streams, yields an empty
    /// batch. The result is ascending by timestamp.
    pub async fn fetch_latest(
        &self,
        group: &StreamGroupId,
        max_entries: usize,
    ) -> Result<LogBatch, FetchError> {
        if max_entries == 0 {
            return Ok(LogBatch::empty());
        }

        info!(group = %group, "Finding latest log stream");

        let stream = match self.store.latest_stream(group).await {
            Ok(Some(stream)) => stream,
            Ok(None) => {
                warn!(group = %group, "No log streams found");
                return Ok(LogBatch::empty());
            }
            Err(LogStoreError::GroupNotFound) => {
                warn!(group = %group, "Log group not found");
                return Ok(LogBatch::empty());
            }
            Err(source) => {
                return Err(FetchError::Store {
                    group: group.clone(),
                    pages_read: 0,
                    source,
                })
            }
        };

        info!(
            group = %group,
            stream = %stream.name,
            last_event = ?stream.last_event,
            "Found stream"
        );

        let mut entries = self.read_tail(group, &stream, max_entries).await?;

        // Pages arrive newest first, so the head of the buffer is the newest data
        entries.truncate(max_entries);
        let batch = LogBatch::from_unordered(entries);

        info!(
            group = %group,
            stream = %stream.name,
            count = batch.len(),
            "Retrieved log events"
        );

        Ok(batch)
    }

    /// Follow backward tokens from the tail until the store returns an empty
    /// page, runs out of tokens, or `max_entries` have been collected.
    async fn read_tail(
        &self,
        group: &StreamGroupId,
        stream: &StreamHandle,
        max_entries: usize,
    ) -> Result<Vec<LogEntry>, FetchError> {
        let mut buffer: Vec<LogEntry> = Vec::new();
        let mut token: Option<String> = None;
        let mut pages_read = 0usize;

        loop {
            if pages_read >= self.max_pages {
                warn!(
                    group = %group,
                    stream = %stream.name,
                    pages_read,
                    collected = buffer.len(),
                    "Pagination limit reached"
                );
                return Err(FetchError::PaginationLimit {
                    group: group.clone(),
                    pages_read,
                });
            }

            let request = TailRequest {
                limit: max_entries - buffer.len(),
                backward_token: token.clone(),
            };

            let page = self
                .store
                .read_tail(group, stream, request)
                .await
                .map_err(|source| FetchError::Store {
                    group: group.clone(),
                    pages_read,
                    source,
                })?;
            pages_read += 1;

            debug!(
                group = %group,
                page = pages_read,
                received = page.entries.len(),
                has_token = page.backward_token.is_some(),
                "Read tail page"
            );

            if page.entries.is_empty() {
                break;
            }
            buffer.extend(page.entries);

            if buffer.len() >= max_entries {
                break;
            }

            match page.backward_token.filter(|t| !t.is_empty()) {
                None => break,
                // The store hands back the token it was given once the stream is exhausted
                Some(next) if token.as_deref() == Some(next.as_str()) => break,
                Some(next) => token = Some(next),
            }
        }

        Ok(buffer)
    }
}
