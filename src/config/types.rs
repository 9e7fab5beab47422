use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub logs: LogsConfig,
    /// Required to serve requests; the local `report` command does without
    pub publish: Option<PublishConfig>,
    /// Required to serve requests; the local `report` command does without
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub web: WebConfig,
    /// Replaces the built-in workload table when present
    pub mappings: Option<Vec<MappingConfig>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Falls back to the SDK's region chain when unset
    pub region: Option<String>,
    /// Override for S3/CloudWatch-compatible endpoints (e.g. LocalStack)
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    /// Ceiling on entries fetched per report
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Ceiling on tail pages requested per report
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_max_entries() -> usize {
    10_000
}

fn default_max_pages() -> usize {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    pub bucket: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_link_ttl", with = "humantime_serde")]
    pub link_ttl: Duration,
}

fn default_key_prefix() -> String {
    "log-reports".to_string()
}

fn default_link_ttl() -> Duration {
    Duration::from_secs(15 * 60)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum AuthConfig {
    Duckdb { path: PathBuf },
    Static { super_users: Vec<Uuid> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    pub category: String,
    pub name: String,
    pub group: String,
}
