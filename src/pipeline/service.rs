use super::{PipelineOutcome, ReportPipeline};
use crate::auth::UserDirectory;
use crate::config::types::PublishConfig;
use crate::publish::ObjectPublisher;
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub category: String,
    #[serde(alias = "name")]
    pub function_name: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLink {
    pub file_name: String,
    pub download_url: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user is not authorized to perform this action")]
    Unauthorized,

    #[error("log group mapping not found for '{category}' -> '{name}'")]
    MappingNotFound { category: String, name: String },

    /// Details have already been logged; nothing here reaches the caller
    #[error("internal failure")]
    Internal,
}

/// Authorizes the caller, runs the pipeline and publishes the report
pub struct ReportService {
    directory: Arc<dyn UserDirectory>,
    pipeline: ReportPipeline,
    publisher: Arc<dyn ObjectPublisher>,
    publish: PublishConfig,
}

impl ReportService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        pipeline: ReportPipeline,
        publisher: Arc<dyn ObjectPublisher>,
        publish: PublishConfig,
    ) -> Self {
        Self {
            directory,
            pipeline,
            publisher,
            publish,
        }
    }

    pub async fn generate(&self, request: ReportRequest) -> Result<ReportLink, ServiceError> {
        info!(
            category = %request.category,
            function = %request.function_name,
            user_id = %request.user_id,
            "Log report request received"
        );

        debug!("Authenticating user");
        let authorized = self
            .directory
            .is_super_user(request.user_id)
            .await
            .map_err(|e| {
                error!(user_id = %request.user_id, error = %e, "User directory lookup failed");
                ServiceError::Internal
            })?;
        if !authorized {
            warn!(user_id = %request.user_id, "Unauthorized report request");
            return Err(ServiceError::Unauthorized);
        }

        let outcome = self
            .pipeline
            .run(&request.category, &request.function_name)
            .await
            .map_err(|e| {
                let detail = e.source().map(|s| s.to_string()).unwrap_or_default();
                error!(
                    function = %request.function_name,
                    error = %e,
                    detail = %detail,
                    "Log report generation failed"
                );
                ServiceError::Internal
            })?;

        let report = match outcome {
            PipelineOutcome::MappingNotFound { category, name } => {
                return Err(ServiceError::MappingNotFound { category, name });
            }
            PipelineOutcome::Rendered { report, .. } => report,
        };

        let key = report.storage_key(&self.publish.key_prefix);
        let content_type = report.content_type();
        let bucket = &self.publish.bucket;

        let key = self
            .publisher
            .put(bucket, &key, report.into_bytes(), content_type)
            .await
            .map_err(|e| {
                error!(bucket = %bucket, error = %e, "Report upload failed");
                ServiceError::Internal
            })?;

        let download_url = self
            .publisher
            .presign(bucket, &key, self.publish.link_ttl)
            .await
            .map_err(|e| {
                error!(bucket = %bucket, error = %e, "Pre-signed URL generation failed");
                ServiceError::Internal
            })?;

        info!(key = %key, "Log report published");

        Ok(ReportLink {
            file_name: key,
            download_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_function_name_or_name() {
        let user_id = Uuid::new_v4();

        let long: ReportRequest = serde_json::from_value(serde_json::json!({
            "category": "scrapers",
            "functionName": "EskomLambda",
            "userId": user_id,
        }))
        .unwrap();
        let short: ReportRequest = serde_json::from_value(serde_json::json!({
            "category": "scrapers",
            "name": "EskomLambda",
            "userId": user_id,
        }))
        .unwrap();

        assert_eq!(long.function_name, "EskomLambda");
        assert_eq!(short.function_name, "EskomLambda");
        assert_eq!(short.user_id, user_id);
    }

    #[test]
    fn test_link_serializes_camel_case() {
        let link = ReportLink {
            file_name: "log-reports/a.html".to_string(),
            download_url: "https://example.test/a".to_string(),
        };

        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["fileName"], "log-reports/a.html");
        assert_eq!(json["downloadUrl"], "https://example.test/a");
    }
}
