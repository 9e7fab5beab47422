#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use logshare::auth::StaticUserDirectory;
use logshare::config::PublishConfig;
use logshare::fetch::{LogFetcher, LogStore, LogStoreError, StreamHandle, TailPage, TailRequest};
use logshare::model::{LogEntry, StreamGroupId};
use logshare::pipeline::{ReportPipeline, ReportService};
use logshare::publish::{ObjectPublisher, PublishError};
use logshare::resolver::NameResolver;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

pub const SUPER_USER: Uuid = Uuid::from_u128(0x5f0c_1d2e_0000_4000_8000_0000_0000_0001);
pub const PLAIN_USER: Uuid = Uuid::from_u128(0x5f0c_1d2e_0000_4000_8000_0000_0000_0002);

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn entry(secs: i64, message: &str) -> LogEntry {
    LogEntry::new(Some(at(secs)), Some(message.to_string()))
}

/// In-memory log store: one stream per group, served in scripted pages
#[derive(Default)]
pub struct FakeLogStore {
    pages: HashMap<String, Vec<TailPage>>,
    fail_discovery: bool,
    pub discovery_calls: AtomicUsize,
    pub read_calls: AtomicUsize,
}

impl FakeLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages are served newest first, in the order given
    pub fn with_group(mut self, group: &str, pages: Vec<TailPage>) -> Self {
        self.pages.insert(group.to_string(), pages);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_discovery: true,
            ..Self::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.discovery_calls.load(Ordering::SeqCst) + self.read_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogStore for FakeLogStore {
    async fn latest_stream(
        &self,
        group: &StreamGroupId,
    ) -> Result<Option<StreamHandle>, LogStoreError> {
        self.discovery_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_discovery {
            return Err(LogStoreError::Remote("throttled".to_string()));
        }
        match self.pages.get(group.as_str()) {
            Some(_) => Ok(Some(StreamHandle {
                name: "2024/01/01/[$LATEST]abc".to_string(),
                last_event: None,
            })),
            None => Err(LogStoreError::GroupNotFound),
        }
    }

    async fn read_tail(
        &self,
        group: &StreamGroupId,
        _stream: &StreamHandle,
        request: TailRequest,
    ) -> Result<TailPage, LogStoreError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let pages = self
            .pages
            .get(group.as_str())
            .ok_or(LogStoreError::GroupNotFound)?;

        let index = match request.backward_token.as_deref() {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(pages.len()),
        };
        Ok(pages.get(index).cloned().unwrap_or_default())
    }
}

/// Builds a page whose backward token points at page `next`
pub fn page(entries: Vec<LogEntry>, next: Option<usize>) -> TailPage {
    TailPage {
        entries,
        backward_token: next.map(|n| format!("page-{n}")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: String,
    pub content_type: String,
}

/// Publisher that keeps uploads in memory and hands out fake links
#[derive(Default)]
pub struct RecordingPublisher {
    pub objects: Mutex<Vec<StoredObject>>,
    pub presigned: Mutex<Vec<(String, Duration)>>,
    fail_upload: bool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_upload: true,
            ..Self::default()
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }

    pub fn presigned(&self) -> Vec<(String, Duration)> {
        self.presigned.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectPublisher for RecordingPublisher {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, PublishError> {
        if self.fail_upload {
            return Err(PublishError::Upload {
                key: key.to_string(),
                message: "access denied".to_string(),
            });
        }
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body: String::from_utf8(bytes).unwrap(),
            content_type: content_type.to_string(),
        });
        Ok(key.to_string())
    }

    async fn presign(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, PublishError> {
        self.presigned.lock().unwrap().push((key.to_string(), ttl));
        Ok(format!(
            "https://{bucket}.s3.amazonaws.com/{key}?X-Amz-Expires={}",
            ttl.as_secs()
        ))
    }
}

pub fn publish_config() -> PublishConfig {
    PublishConfig {
        bucket: "report-bucket".to_string(),
        key_prefix: "log-reports".to_string(),
        link_ttl: Duration::from_secs(15 * 60),
    }
}

pub fn pipeline(store: Arc<FakeLogStore>) -> ReportPipeline {
    let fetcher = LogFetcher::new(store, 10);
    ReportPipeline::new(Arc::new(NameResolver::with_defaults()), fetcher, 100)
}

pub fn service(store: Arc<FakeLogStore>, publisher: Arc<RecordingPublisher>) -> ReportService {
    let directory = Arc::new(StaticUserDirectory::new([SUPER_USER]));
    ReportService::new(directory, pipeline(store), publisher, publish_config())
}
