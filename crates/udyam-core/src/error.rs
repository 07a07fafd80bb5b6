//! Error types for `udyam-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::attempt::AttemptKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("application not found: {0}")]
  ApplicationNotFound(Uuid),

  #[error("{kind} verification rejected: {reason}")]
  VerificationRejected { kind: AttemptKind, reason: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("verifier error: {0}")]
  Verifier(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub(crate) fn verifier<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Verifier(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
