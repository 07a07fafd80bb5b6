//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// The body is always `{"detail": "..."}`. For [`ApiError::Failed`] the
/// underlying error is logged and replaced by a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("request failed: {source}")]
  Failed {
    status: StatusCode,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Translate a registrar error. Anything that is not a missing application
  /// becomes a [`ApiError::Failed`] with the endpoint's `fallback` status.
  pub fn from_core(e: udyam_core::Error, fallback: StatusCode) -> Self {
    match e {
      udyam_core::Error::ApplicationNotFound(_) => {
        Self::NotFound("Application not found".to_owned())
      }
      other => Self::Failed { status: fallback, source: Box::new(other) },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Failed { status, source } => {
        tracing::error!(error = %source, status = status.as_u16(), "request failed");
        let generic = if status.is_server_error() {
          "Internal Server Error"
        } else {
          "Request failed"
        };
        (*status, generic.to_owned())
      }
    };
    (status, Json(json!({ "detail": message }))).into_response()
  }
}
