//! Handlers for the Aadhaar stage.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/aadhaar/send-otp` | Creates the application; any failure is a 400 |
//! | `POST` | `/aadhaar/verify-otp` | 404 if `app_id` does not resolve |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use udyam_core::{
  Error as CoreError, registrar::Registrar, store::ApplicationStore, verify::IdentityVerifier,
};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Validate, ValidJson, exact_chars, exact_digits, required_text},
};

// ─── Send OTP ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
  pub aadhaar_number:    String,
  pub entrepreneur_name: String,
  pub consent:           bool,
}

impl Validate for SendOtpRequest {
  fn validate(&self) -> Result<(), ApiError> {
    exact_digits("aadhaarNumber", &self.aadhaar_number, 12)?;
    required_text("entrepreneurName", &self.entrepreneur_name, 100)
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
  pub transaction_id: String,
  pub otp_sent_to:    String,
  pub app_id:         String,
}

/// `POST /aadhaar/send-otp`
pub async fn send_otp<S, V>(
  State(registrar): State<Arc<Registrar<S, V>>>,
  ValidJson(body): ValidJson<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, ApiError>
where
  S: ApplicationStore + 'static,
  V: IdentityVerifier + 'static,
{
  let sent = registrar
    .send_otp(&body.aadhaar_number, &body.entrepreneur_name, body.consent)
    .await
    .map_err(|e| ApiError::from_core(e, StatusCode::BAD_REQUEST))?;

  Ok(Json(SendOtpResponse {
    transaction_id: sent.transaction_id,
    otp_sent_to:    sent.otp_sent_to,
    app_id:         sent.app_id.to_string(),
  }))
}

// ─── Verify OTP ───────────────────────────────────────────────────────────────

/// Body of `POST /aadhaar/verify-otp`. Field names are snake_case on the wire.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
  pub app_id:         String,
  pub transaction_id: String,
  pub otp:            String,
}

impl Validate for VerifyOtpRequest {
  fn validate(&self) -> Result<(), ApiError> { exact_chars("otp", &self.otp, 6) }
}

/// Shared by the OTP and PAN verification endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedResponse {
  pub verified: bool,
  pub app_id:   String,
}

/// `POST /aadhaar/verify-otp`
///
/// An `app_id` that is not a UUID cannot name an application and is reported
/// as not found.
pub async fn verify_otp<S, V>(
  State(registrar): State<Arc<Registrar<S, V>>>,
  ValidJson(body): ValidJson<VerifyOtpRequest>,
) -> Result<Json<VerifiedResponse>, ApiError>
where
  S: ApplicationStore + 'static,
  V: IdentityVerifier + 'static,
{
  let app_id = Uuid::parse_str(body.app_id.trim())
    .map_err(|_| ApiError::NotFound("Application not found".to_owned()))?;

  let verified = match registrar.verify_otp(app_id, &body.transaction_id, &body.otp).await {
    Ok(app) => app.aadhaar_verified,
    Err(CoreError::VerificationRejected { .. }) => false,
    Err(e) => return Err(ApiError::from_core(e, StatusCode::BAD_REQUEST)),
  };

  Ok(Json(VerifiedResponse { verified, app_id: app_id.to_string() }))
}
