//! The registration state machine.
//!
//! [`Registrar`] owns the three stages of a registration:
//!
//! 1. **Aadhaar**: [`send_otp`](Registrar::send_otp) creates a `draft`
//!    application and opens an OTP transaction;
//!    [`verify_otp`](Registrar::verify_otp) marks the Aadhaar as verified.
//! 2. **PAN**: [`verify_pan`](Registrar::verify_pan) stores the masked PAN and
//!    marks it verified.
//! 3. **Final form**: [`submit_registration`](Registrar::submit_registration)
//!    records the business profile and moves the application to `submitted`.
//!
//! Each stage is a sequence of independent store calls. A crash between them
//! leaves a valid application that simply has not reached the next stage.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  application::{Application, ApplicationStatus, NewApplication},
  attempt::{AttemptKind, NewAttempt, VerificationAttempt},
  codes::{GstinStatus, YesNo, resolve_organisation_type},
  redact,
  store::ApplicationStore,
  verify::{IdentityVerifier, PanCheck, SimulatedVerifier, Verdict},
};

// ─── Stage inputs and outputs ────────────────────────────────────────────────

/// Result of [`Registrar::send_otp`].
#[derive(Debug, Clone)]
pub struct OtpSent {
  pub transaction_id: String,
  /// `****` followed by the last four Aadhaar digits.
  pub otp_sent_to:    String,
  pub app_id:         Uuid,
}

/// The final registration form, with coded answers kept as submitted.
///
/// Serialises to the JSON-safe snapshot stored in `form_payload`: codes stay
/// primitive strings and the date is ISO-8601.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalForm {
  #[serde(rename = "entrepreneurName")]
  pub entrepreneur_name:    String,
  #[serde(rename = "typeOfOrganisation")]
  pub type_of_organisation: String,
  #[serde(rename = "dobOrDoi")]
  pub dob_or_doi:           NaiveDate,
  #[serde(rename = "previousYearITR")]
  pub previous_year_itr:    String,
  #[serde(rename = "hasGSTIN")]
  pub has_gstin:            String,
}

/// Result of [`Registrar::submit_registration`].
#[derive(Debug, Clone)]
pub struct Submission {
  pub registration_id: Uuid,
  pub status:          ApplicationStatus,
}

// ─── Registrar ───────────────────────────────────────────────────────────────

/// Drives applications through the registration stages.
pub struct Registrar<S, V = SimulatedVerifier> {
  store:    Arc<S>,
  verifier: Arc<V>,
}

impl<S, V> Clone for Registrar<S, V> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), verifier: Arc::clone(&self.verifier) }
  }
}

impl<S: ApplicationStore> Registrar<S> {
  /// A registrar backed by the [`SimulatedVerifier`].
  pub fn simulated(store: Arc<S>) -> Self { Self::new(store, Arc::new(SimulatedVerifier)) }
}

impl<S, V> Registrar<S, V>
where
  S: ApplicationStore,
  V: IdentityVerifier,
{
  pub fn new(store: Arc<S>, verifier: Arc<V>) -> Self { Self { store, verifier } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Aadhaar stage ─────────────────────────────────────────────────────

  /// Create a draft application and dispatch an Aadhaar OTP.
  ///
  /// The caller has already checked that `aadhaar_number` is twelve digits.
  pub async fn send_otp(
    &self,
    aadhaar_number: &str,
    entrepreneur_name: &str,
    consent: bool,
  ) -> Result<OtpSent> {
    let last4 = redact::aadhaar_last4(aadhaar_number);

    let app = self
      .store
      .create_application(NewApplication {
        entrepreneur_name: entrepreneur_name.to_owned(),
        aadhaar_last4:     last4.clone(),
        aadhaar_hash:      redact::digest(aadhaar_number),
        aadhaar_consent:   consent,
      })
      .await
      .map_err(Error::store)?;

    let dispatch = match self.verifier.send_aadhaar_otp(aadhaar_number).await {
      Ok(d) => d,
      Err(e) => {
        self
          .record(NewAttempt {
            app_id:  app.app_id,
            kind:    AttemptKind::AadhaarOtp,
            success: false,
            payload: json!({ "otp_sent": false }),
            message: Some(e.to_string()),
          })
          .await?;
        return Err(Error::verifier(e));
      }
    };

    self
      .record(NewAttempt {
        app_id:  app.app_id,
        kind:    AttemptKind::AadhaarOtp,
        success: true,
        payload: json!({
          "transaction_id": dispatch.transaction_id,
          "otp_sent": true,
        }),
        message: None,
      })
      .await?;

    info!(app_id = %app.app_id, "aadhaar otp dispatched");

    Ok(OtpSent {
      transaction_id: dispatch.transaction_id,
      otp_sent_to:    redact::otp_destination(&last4),
      app_id:         app.app_id,
    })
  }

  /// Confirm the Aadhaar OTP and mark the application Aadhaar-verified.
  ///
  /// Repeated calls succeed again and move `aadhaar_verified_at` forward.
  pub async fn verify_otp(
    &self,
    app_id: Uuid,
    transaction_id: &str,
    otp: &str,
  ) -> Result<Application> {
    let mut app = self.load(app_id).await?;

    let verdict = self
      .verifier
      .confirm_aadhaar_otp(transaction_id, otp)
      .await
      .map_err(Error::verifier)?;

    let payload = json!({ "transaction_id": transaction_id, "otp": otp });
    if !verdict.accepted {
      return Err(self.reject(app_id, AttemptKind::AadhaarOtp, payload, verdict).await);
    }

    app.aadhaar_verified = true;
    app.aadhaar_verified_at = Some(Utc::now());
    let app = self.store.update_application(&app).await.map_err(Error::store)?;

    self
      .record(NewAttempt {
        app_id,
        kind: AttemptKind::AadhaarOtp,
        success: true,
        payload,
        message: verdict.message,
      })
      .await?;

    info!(%app_id, "aadhaar verified");
    Ok(app)
  }

  // ── PAN stage ─────────────────────────────────────────────────────────

  /// Verify a PAN against an existing application.
  ///
  /// The caller has already checked the PAN against `[A-Z]{5}[0-9]{4}[A-Z]`.
  pub async fn verify_pan(&self, app_id: Uuid, check: PanCheck<'_>) -> Result<Application> {
    let mut app = self.load(app_id).await?;

    let pan_masked = redact::mask_pan(check.pan_number);
    let verdict = self.verifier.verify_pan(check).await.map_err(Error::verifier)?;

    let payload = json!({ "pan_number": pan_masked, "consent": check.consent });
    if !verdict.accepted {
      return Err(self.reject(app_id, AttemptKind::Pan, payload, verdict).await);
    }

    app.pan_masked = Some(pan_masked);
    app.pan_hash = Some(redact::digest(check.pan_number));
    app.pan_holder_name = Some(check.pan_holder_name.to_owned());
    app.dob_or_doi = Some(check.dob_or_doi);
    app.pan_verified = true;
    app.pan_verified_at = Some(Utc::now());
    let app = self.store.update_application(&app).await.map_err(Error::store)?;

    self
      .record(NewAttempt {
        app_id,
        kind: AttemptKind::Pan,
        success: true,
        payload,
        message: verdict.message,
      })
      .await?;

    info!(%app_id, "pan verified");
    Ok(app)
  }

  // ── Final submission ──────────────────────────────────────────────────

  /// Record the business profile and move the application to `submitted`.
  ///
  /// Unknown organisation codes are stored verbatim. Unknown ITR / GSTIN
  /// codes leave the stored flag as it was. Re-submission overwrites.
  pub async fn submit_registration(&self, app_id: Uuid, form: &FinalForm) -> Result<Submission> {
    let mut app = self.load(app_id).await?;

    app.entrepreneur_name = Some(form.entrepreneur_name.clone());
    app.type_of_organisation = Some(resolve_organisation_type(&form.type_of_organisation));
    app.dob_or_doi = Some(form.dob_or_doi);
    if let Some(itr) = YesNo::from_code(&form.previous_year_itr) {
      app.previous_year_itr_filed = Some(itr.as_bool());
    }
    if let Some(gst) = GstinStatus::from_code(&form.has_gstin) {
      app.has_gstin_status = Some(gst);
    }
    app.form_payload = serde_json::to_value(form)?;
    app.status = ApplicationStatus::Submitted;

    let app = self.store.update_application(&app).await.map_err(Error::store)?;

    info!(%app_id, status = %app.status, "registration submitted");
    Ok(Submission { registration_id: app.app_id, status: app.status })
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn load(&self, app_id: Uuid) -> Result<Application> {
    self
      .store
      .get_application(app_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ApplicationNotFound(app_id))
  }

  async fn record(&self, attempt: NewAttempt) -> Result<VerificationAttempt> {
    self.store.record_attempt(attempt).await.map_err(Error::store)
  }

  /// Log an unsuccessful attempt and build the error to return.
  async fn reject(
    &self,
    app_id: Uuid,
    kind: AttemptKind,
    payload: serde_json::Value,
    verdict: Verdict,
  ) -> Error {
    let reason = verdict.message.unwrap_or_else(|| "rejected by verifier".to_owned());
    warn!(%app_id, %kind, %reason, "verification rejected");

    let recorded = self
      .record(NewAttempt {
        app_id,
        kind,
        success: false,
        payload,
        message: Some(reason.clone()),
      })
      .await;

    match recorded {
      Ok(_) => Error::VerificationRejected { kind, reason },
      Err(e) => e,
    }
  }
}
