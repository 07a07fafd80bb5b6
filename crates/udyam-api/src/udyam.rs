//! Handler for `POST /udyam/{app_id}/submit`, the final registration form.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use udyam_core::{
  codes::{GstinStatus, YesNo, parse_form_date},
  registrar::{FinalForm, Registrar},
  store::ApplicationStore,
  verify::IdentityVerifier,
};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Validate, ValidJson, max_chars},
};

#[derive(Debug, Deserialize)]
pub struct FinalFormRequest {
  #[serde(rename = "entrepreneurName")]
  pub entrepreneur_name:    String,
  #[serde(rename = "typeOfOrganisation")]
  pub type_of_organisation: String,
  /// `dd-mm-yyyy` or ISO `yyyy-mm-dd`.
  #[serde(rename = "dobOrDoi", deserialize_with = "form_date")]
  pub dob_or_doi:           NaiveDate,
  #[serde(rename = "previousYearITR")]
  pub previous_year_itr:    YesNo,
  #[serde(rename = "hasGSTIN")]
  pub has_gstin:            GstinStatus,
}

impl Validate for FinalFormRequest {
  fn validate(&self) -> Result<(), ApiError> {
    max_chars("entrepreneurName", &self.entrepreneur_name, 255)?;
    max_chars("typeOfOrganisation", &self.type_of_organisation, 50)
  }
}

impl From<FinalFormRequest> for FinalForm {
  fn from(b: FinalFormRequest) -> Self {
    FinalForm {
      entrepreneur_name:    b.entrepreneur_name,
      type_of_organisation: b.type_of_organisation,
      dob_or_doi:           b.dob_or_doi,
      previous_year_itr:    b.previous_year_itr.code().to_owned(),
      has_gstin:            b.has_gstin.code().to_owned(),
    }
  }
}

fn form_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
  D: Deserializer<'de>,
{
  let s = String::deserialize(deserializer)?;
  parse_form_date(&s).ok_or_else(|| {
    serde::de::Error::custom(format!("invalid date {s:?}, expected dd-mm-yyyy or yyyy-mm-dd"))
  })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
  pub registration_id: String,
  pub status:          String,
}

/// `POST /udyam/{app_id}/submit`
///
/// As with OTP verification, a path segment that is not a UUID is reported as
/// not found.
pub async fn submit<S, V>(
  State(registrar): State<Arc<Registrar<S, V>>>,
  Path(app_id): Path<String>,
  ValidJson(body): ValidJson<FinalFormRequest>,
) -> Result<Json<SubmitResponse>, ApiError>
where
  S: ApplicationStore + 'static,
  V: IdentityVerifier + 'static,
{
  let app_id = Uuid::parse_str(app_id.trim())
    .map_err(|_| ApiError::NotFound("Application not found".to_owned()))?;

  let form = FinalForm::from(body);
  let submission = registrar
    .submit_registration(app_id, &form)
    .await
    .map_err(|e| ApiError::from_core(e, StatusCode::INTERNAL_SERVER_ERROR))?;

  Ok(Json(SubmitResponse {
    registration_id: submission.registration_id.to_string(),
    status:          submission.status.to_string(),
  }))
}
