//! The identity-verification boundary.
//!
//! The registrar never decides on its own whether an OTP or a PAN is genuine;
//! it asks an [`IdentityVerifier`]. [`SimulatedVerifier`] is the default and
//! accepts everything. A real provider replaces it without touching the
//! registration state machine.

use std::{convert::Infallible, future::Future};

use chrono::NaiveDate;
use uuid::Uuid;

/// Reference returned when an OTP has been dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpDispatch {
  pub transaction_id: String,
}

/// The provider's answer to a verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
  pub accepted: bool,
  pub message:  Option<String>,
}

impl Verdict {
  pub fn accepted(message: impl Into<String>) -> Self {
    Self { accepted: true, message: Some(message.into()) }
  }

  pub fn rejected(message: impl Into<String>) -> Self {
    Self { accepted: false, message: Some(message.into()) }
  }
}

/// Details submitted for a PAN check.
#[derive(Debug, Clone, Copy)]
pub struct PanCheck<'a> {
  pub pan_number:      &'a str,
  pub pan_holder_name: &'a str,
  pub dob_or_doi:      NaiveDate,
  pub consent:         bool,
}

/// External identity provider for the Aadhaar and PAN stages.
pub trait IdentityVerifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Dispatch an OTP to the mobile number linked with `aadhaar_number`.
  fn send_aadhaar_otp<'a>(
    &'a self,
    aadhaar_number: &'a str,
  ) -> impl Future<Output = Result<OtpDispatch, Self::Error>> + Send + 'a;

  /// Check an OTP against the transaction that issued it.
  fn confirm_aadhaar_otp<'a>(
    &'a self,
    transaction_id: &'a str,
    otp: &'a str,
  ) -> impl Future<Output = Result<Verdict, Self::Error>> + Send + 'a;

  /// Check a PAN and its holder details with the issuing authority.
  fn verify_pan<'a>(
    &'a self,
    check: PanCheck<'a>,
  ) -> impl Future<Output = Result<Verdict, Self::Error>> + Send + 'a;
}

/// Stand-in provider: sends nothing, checks nothing, accepts everything.
///
/// Transaction ids are fresh UUIDs with no server-side record, so
/// [`confirm_aadhaar_otp`](IdentityVerifier::confirm_aadhaar_otp) cannot and
/// does not tie an OTP to the transaction it names.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedVerifier;

impl IdentityVerifier for SimulatedVerifier {
  type Error = Infallible;

  async fn send_aadhaar_otp<'a>(
    &'a self,
    _aadhaar_number: &'a str,
  ) -> Result<OtpDispatch, Infallible> {
    Ok(OtpDispatch { transaction_id: Uuid::new_v4().to_string() })
  }

  async fn confirm_aadhaar_otp<'a>(
    &'a self,
    _transaction_id: &'a str,
    _otp: &'a str,
  ) -> Result<Verdict, Infallible> {
    Ok(Verdict::accepted("OTP verified successfully"))
  }

  async fn verify_pan<'a>(&'a self, _check: PanCheck<'a>) -> Result<Verdict, Infallible> {
    Ok(Verdict::accepted("PAN verified (simulated)"))
  }
}
