//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings and calendar dates are `YYYY-MM-DD`. JSON
//! columns hold compact JSON. UUIDs are hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use udyam_core::{
  application::{Application, ApplicationStatus},
  attempt::{AttemptKind, VerificationAttempt},
  codes::GstinStatus,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<ApplicationStatus> {
  ApplicationStatus::from_str(s)
    .map_err(|_| Error::Decode { column: "status", value: s.to_owned() })
}

pub fn decode_kind(s: &str) -> Result<AttemptKind> {
  AttemptKind::from_str(s).map_err(|_| Error::Decode { column: "kind", value: s.to_owned() })
}

pub fn decode_gstin(s: &str) -> Result<GstinStatus> {
  GstinStatus::from_code(s)
    .ok_or_else(|| Error::Decode { column: "has_gstin_status", value: s.to_owned() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const APPLICATION_COLUMNS: &str = "
  app_id, entrepreneur_name,
  aadhaar_last4, aadhaar_hash, aadhaar_consent, aadhaar_verified, aadhaar_verified_at,
  pan_masked, pan_hash, pan_holder_name, dob_or_doi,
  type_of_organisation, previous_year_itr_filed, has_gstin_status,
  pan_verified, pan_verified_at,
  status, form_payload, last_validation_errors, created_at, updated_at";

/// Raw values read directly from an `applications` row.
pub struct RawApplication {
  pub app_id:                  String,
  pub entrepreneur_name:       Option<String>,
  pub aadhaar_last4:           Option<String>,
  pub aadhaar_hash:            Option<String>,
  pub aadhaar_consent:         bool,
  pub aadhaar_verified:        bool,
  pub aadhaar_verified_at:     Option<String>,
  pub pan_masked:              Option<String>,
  pub pan_hash:                Option<String>,
  pub pan_holder_name:         Option<String>,
  pub dob_or_doi:              Option<String>,
  pub type_of_organisation:    Option<String>,
  pub previous_year_itr_filed: Option<bool>,
  pub has_gstin_status:        Option<String>,
  pub pan_verified:            bool,
  pub pan_verified_at:         Option<String>,
  pub status:                  String,
  pub form_payload:            String,
  pub last_validation_errors:  Option<String>,
  pub created_at:              String,
  pub updated_at:              String,
}

impl RawApplication {
  /// Map a row selected with [`APPLICATION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      app_id:                  row.get(0)?,
      entrepreneur_name:       row.get(1)?,
      aadhaar_last4:           row.get(2)?,
      aadhaar_hash:            row.get(3)?,
      aadhaar_consent:         row.get(4)?,
      aadhaar_verified:        row.get(5)?,
      aadhaar_verified_at:     row.get(6)?,
      pan_masked:              row.get(7)?,
      pan_hash:                row.get(8)?,
      pan_holder_name:         row.get(9)?,
      dob_or_doi:              row.get(10)?,
      type_of_organisation:    row.get(11)?,
      previous_year_itr_filed: row.get(12)?,
      has_gstin_status:        row.get(13)?,
      pan_verified:            row.get(14)?,
      pan_verified_at:         row.get(15)?,
      status:                  row.get(16)?,
      form_payload:            row.get(17)?,
      last_validation_errors:  row.get(18)?,
      created_at:              row.get(19)?,
      updated_at:              row.get(20)?,
    })
  }

  pub fn into_application(self) -> Result<Application> {
    Ok(Application {
      app_id:                  decode_uuid(&self.app_id)?,
      entrepreneur_name:       self.entrepreneur_name,
      aadhaar_last4:           self.aadhaar_last4,
      aadhaar_hash:            self.aadhaar_hash,
      aadhaar_consent:         self.aadhaar_consent,
      aadhaar_verified:        self.aadhaar_verified,
      aadhaar_verified_at:     self.aadhaar_verified_at.as_deref().map(decode_dt).transpose()?,
      pan_masked:              self.pan_masked,
      pan_hash:                self.pan_hash,
      pan_holder_name:         self.pan_holder_name,
      dob_or_doi:              self.dob_or_doi.as_deref().map(decode_date).transpose()?,
      type_of_organisation:    self.type_of_organisation,
      previous_year_itr_filed: self.previous_year_itr_filed,
      has_gstin_status:        self.has_gstin_status.as_deref().map(decode_gstin).transpose()?,
      pan_verified:            self.pan_verified,
      pan_verified_at:         self.pan_verified_at.as_deref().map(decode_dt).transpose()?,
      status:                  decode_status(&self.status)?,
      form_payload:            serde_json::from_str(&self.form_payload)?,
      last_validation_errors:  self
        .last_validation_errors
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?,
      created_at:              decode_dt(&self.created_at)?,
      updated_at:              decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `verification_attempts` row.
pub struct RawAttempt {
  pub attempt_id: String,
  pub app_id:     String,
  pub kind:       String,
  pub success:    bool,
  pub payload:    String,
  pub message:    Option<String>,
  pub created_at: String,
}

impl RawAttempt {
  pub fn into_attempt(self) -> Result<VerificationAttempt> {
    Ok(VerificationAttempt {
      attempt_id: decode_uuid(&self.attempt_id)?,
      app_id:     decode_uuid(&self.app_id)?,
      kind:       decode_kind(&self.kind)?,
      success:    self.success,
      payload:    serde_json::from_str(&self.payload)?,
      message:    self.message,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
