//! Verification attempts: the append-only audit trail of an application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Which verification step an attempt belongs to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttemptKind {
  AadhaarOtp,
  Pan,
}

/// One recorded verification action. Never updated or deleted on its own;
/// removed only together with its parent application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationAttempt {
  pub attempt_id: Uuid,
  pub app_id:     Uuid,
  pub kind:       AttemptKind,
  pub success:    bool,
  pub payload:    serde_json::Value,
  pub message:    Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`ApplicationStore::record_attempt`](crate::store::ApplicationStore::record_attempt).
#[derive(Debug, Clone)]
pub struct NewAttempt {
  pub app_id:  Uuid,
  pub kind:    AttemptKind,
  pub success: bool,
  pub payload: serde_json::Value,
  pub message: Option<String>,
}
