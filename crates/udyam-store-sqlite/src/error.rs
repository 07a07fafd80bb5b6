//! Error type for `udyam-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum column held a value no variant matches.
  #[error("cannot decode column {column}: {value:?}")]
  Decode { column: &'static str, value: String },

  #[error("application not found: {0}")]
  ApplicationNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
