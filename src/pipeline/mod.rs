pub mod service;

pub use service::{ReportLink, ReportRequest, ReportService, ServiceError};

use crate::fetch::{FetchError, LogFetcher};
use crate::report::{render, Report};
use crate::resolver::NameResolver;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Result of a pipeline run that did not fault
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    MappingNotFound { category: String, name: String },
    Rendered { report: Report, entry_count: usize },
}

/// Faults raised by a pipeline run.
///
/// The display text is safe to show to callers; the underlying fetch error,
/// with group names and pagination progress, is only reachable through
/// `source()`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("log retrieval failed")]
    RetrievalFailed(#[source] FetchError),
}

/// Resolve -> fetch -> render, one attempt, no retries
pub struct ReportPipeline {
    resolver: Arc<NameResolver>,
    fetcher: LogFetcher,
    max_entries: usize,
}

impl ReportPipeline {
    pub fn new(resolver: Arc<NameResolver>, fetcher: LogFetcher, max_entries: usize) -> Self {
        Self {
            resolver,
            fetcher,
            max_entries,
        }
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    pub async fn run(&self, category: &str, name: &str) -> Result<PipelineOutcome, PipelineError> {
        self.run_at(category, name, Utc::now()).await
    }

    /// Same as [`run`](Self::run) with an explicit generation time
    pub async fn run_at(
        &self,
        category: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<PipelineOutcome, PipelineError> {
        debug!(category = %category, name = %name, "Resolving log group");
        let Some(group) = self.resolver.resolve(category, name) else {
            return Ok(PipelineOutcome::MappingNotFound {
                category: category.to_string(),
                name: name.to_string(),
            });
        };
        info!(group = %group, "Mapped to log group");

        let batch = self
            .fetcher
            .fetch_latest(&group, self.max_entries)
            .await
            .map_err(PipelineError::RetrievalFailed)?;

        let report = render(name, category, batch.entries(), now);
        let entry_count = report.entry_count;
        info!(
            group = %group,
            entry_count,
            bytes = report.body.len(),
            "Rendered log report"
        );

        Ok(PipelineOutcome::Rendered {
            report,
            entry_count,
        })
    }
}
