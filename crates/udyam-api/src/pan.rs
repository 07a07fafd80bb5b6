//! Handler for `POST /pan/verify`. 404 if `appId` does not resolve; any other
//! failure is a 500.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;
use udyam_core::{
  Error as CoreError,
  registrar::Registrar,
  store::ApplicationStore,
  verify::{IdentityVerifier, PanCheck},
};
use uuid::Uuid;

use crate::{
  aadhaar::VerifiedResponse,
  error::ApiError,
  extract::{Validate, ValidJson, pan_format, required_text},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanVerifyRequest {
  pub app_id:          Uuid,
  pub pan_number:      String,
  pub pan_holder_name: String,
  /// ISO `yyyy-mm-dd`.
  pub dob_or_doi:      NaiveDate,
  pub consent:         bool,
}

impl Validate for PanVerifyRequest {
  fn validate(&self) -> Result<(), ApiError> {
    pan_format("panNumber", &self.pan_number)?;
    required_text("panHolderName", &self.pan_holder_name, 100)
  }
}

/// `POST /pan/verify`
pub async fn verify<S, V>(
  State(registrar): State<Arc<Registrar<S, V>>>,
  ValidJson(body): ValidJson<PanVerifyRequest>,
) -> Result<Json<VerifiedResponse>, ApiError>
where
  S: ApplicationStore + 'static,
  V: IdentityVerifier + 'static,
{
  let check = PanCheck {
    pan_number:      &body.pan_number,
    pan_holder_name: &body.pan_holder_name,
    dob_or_doi:      body.dob_or_doi,
    consent:         body.consent,
  };

  let verified = match registrar.verify_pan(body.app_id, check).await {
    Ok(app) => app.pan_verified,
    Err(CoreError::VerificationRejected { .. }) => false,
    Err(e) => return Err(ApiError::from_core(e, StatusCode::INTERNAL_SERVER_ERROR)),
  };

  Ok(Json(VerifiedResponse { verified, app_id: body.app_id.to_string() }))
}
