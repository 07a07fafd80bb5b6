//! Application: one registration in progress.
//!
//! An application is created by the Aadhaar stage and mutated in place by the
//! later stages. Full Aadhaar and PAN numbers never reach this type; only the
//! display fragments and a one-way digest are kept.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::codes::GstinStatus;

/// Lifecycle of an application. `Submitted` is terminal.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApplicationStatus {
  #[default]
  Draft,
  Submitted,
}

/// A persisted registration record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
  pub app_id:                  Uuid,
  pub entrepreneur_name:       Option<String>,

  // ── Aadhaar stage ─────────────────────────────────────────────────────
  pub aadhaar_last4:           Option<String>,
  pub aadhaar_hash:            Option<String>,
  pub aadhaar_consent:         bool,
  pub aadhaar_verified:        bool,
  pub aadhaar_verified_at:     Option<DateTime<Utc>>,

  // ── PAN stage ─────────────────────────────────────────────────────────
  /// First five characters, five `*`, last character.
  pub pan_masked:              Option<String>,
  pub pan_hash:                Option<String>,
  pub pan_holder_name:         Option<String>,
  pub dob_or_doi:              Option<NaiveDate>,
  pub pan_verified:            bool,
  pub pan_verified_at:         Option<DateTime<Utc>>,

  // ── Business profile ──────────────────────────────────────────────────
  /// Resolved display label, or the raw code when it is not in the table.
  pub type_of_organisation:    Option<String>,
  pub previous_year_itr_filed: Option<bool>,
  pub has_gstin_status:        Option<GstinStatus>,

  pub status:                  ApplicationStatus,
  /// JSON-safe snapshot of the last submitted final form.
  pub form_payload:            serde_json::Value,
  pub last_validation_errors:  Option<serde_json::Value>,
  pub created_at:              DateTime<Utc>,
  pub updated_at:              DateTime<Utc>,
}

impl Application {
  /// Collapse the GSTIN status into a yes/no answer. Exempted and unset both
  /// map to `None`.
  pub fn has_gstin(&self) -> Option<bool> {
    match self.has_gstin_status? {
      GstinStatus::Registered => Some(true),
      GstinStatus::NotRegistered => Some(false),
      GstinStatus::Exempted => None,
    }
  }
}

/// Input to [`create_application`](crate::store::ApplicationStore::create_application).
///
/// The id and both timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewApplication {
  pub entrepreneur_name: String,
  pub aadhaar_last4:     String,
  pub aadhaar_hash:      String,
  pub aadhaar_consent:   bool,
}
