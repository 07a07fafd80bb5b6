//! Coded form values shared by request validation and storage.
//!
//! The registration form transmits its choices as short numeric codes. Each
//! enum here serialises to exactly those codes, so the same definition backs
//! both the strict request schema and the stored column.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Tri-state flags ─────────────────────────────────────────────────────────

/// Answer to "was the previous year's income-tax return filed?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
  #[serde(rename = "1")]
  Yes,
  #[serde(rename = "2")]
  No,
}

impl YesNo {
  pub fn code(self) -> &'static str {
    match self {
      Self::Yes => "1",
      Self::No => "2",
    }
  }

  /// Lenient decoding: anything outside the known codes is `None`.
  pub fn from_code(code: &str) -> Option<Self> {
    match code {
      "1" => Some(Self::Yes),
      "2" => Some(Self::No),
      _ => None,
    }
  }

  pub fn as_bool(self) -> bool { matches!(self, Self::Yes) }
}

/// GST registration status of the enterprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GstinStatus {
  #[serde(rename = "1")]
  Registered,
  #[serde(rename = "2")]
  NotRegistered,
  #[serde(rename = "3")]
  Exempted,
}

impl GstinStatus {
  pub fn code(self) -> &'static str {
    match self {
      Self::Registered => "1",
      Self::NotRegistered => "2",
      Self::Exempted => "3",
    }
  }

  /// Lenient decoding: anything outside the known codes is `None`.
  pub fn from_code(code: &str) -> Option<Self> {
    match code {
      "1" => Some(Self::Registered),
      "2" => Some(Self::NotRegistered),
      "3" => Some(Self::Exempted),
      _ => None,
    }
  }
}

// ─── Organisation type ───────────────────────────────────────────────────────

/// Organisation-type codes as presented on the registration form.
pub const ORGANISATION_TYPES: [(&str, &str); 11] = [
  ("1", "Proprietary / एकल स्वामित्व"),
  ("2", "Hindu Undivided Family / हिंदू अविभाजित परिवार (एचयूएफ)"),
  ("3", "Partnership / पार्टनरशिप"),
  ("4", "Co-Operative / सहकारी"),
  ("5", "Private Limited Company / प्राइवेट लिमिटेड कंपनी"),
  ("6", "Public Limited Company / पब्लिक लिमिटेड कंपनी"),
  ("7", "Self Help Group / स्वयं सहायता समूह"),
  ("8", "Others / अन्य"),
  ("9", "Limited Liability Partnership / सीमित दायित्व भागीदारी"),
  ("10", "Society / सोसाईटी"),
  ("11", "Trust / ट्रस्ट"),
];

/// Look up the display label for an organisation-type code.
pub fn organisation_label(code: &str) -> Option<&'static str> {
  ORGANISATION_TYPES
    .iter()
    .find(|(c, _)| *c == code)
    .map(|(_, label)| *label)
}

/// Resolve a code to its label, passing unknown codes through unchanged.
pub fn resolve_organisation_type(code: &str) -> String {
  organisation_label(code).unwrap_or(code).to_owned()
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse a date of birth / incorporation as typed on the final form.
///
/// `dd-mm-yyyy` is tried first, then ISO `yyyy-mm-dd`.
pub fn parse_form_date(s: &str) -> Option<NaiveDate> {
  let s = s.trim();
  NaiveDate::parse_from_str(s, "%d-%m-%Y")
    .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
    .ok()
}
