use crate::pipeline::{ReportLink, ReportRequest, ReportService, ServiceError};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReportService>,
}

/// GET /
pub async fn welcome() -> &'static str {
    "Welcome to the log report service"
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// POST /api/logs
/// Renders the latest logs for a workload and returns a download link
pub async fn generate_log_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportLink>, ApiError> {
    let link = state.service.generate(request).await?;
    Ok(Json(link))
}

// Error handling
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound(String),
    InternalError,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized => ApiError::Unauthorized,
            ServiceError::MappingNotFound { category, name } => ApiError::NotFound(format!(
                "Log group mapping not found for '{}' -> '{}'.",
                category, name
            )),
            ServiceError::Internal => ApiError::InternalError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "User is not authorized to perform this action.".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred. Please check the logs.".to_string(),
            ),
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}
