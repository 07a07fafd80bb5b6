//! JSON body extraction with field validation.
//!
//! [`ValidJson`] runs before the handler body, so malformed or out-of-range
//! input never reaches the registrar.

use std::sync::LazyLock;

use axum::{
  Json,
  extract::{FromRequest, Request},
};
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Shape checks a request body must pass after deserialisation.
pub trait Validate {
  fn validate(&self) -> Result<(), ApiError>;
}

/// Like [`Json`], but every rejection is a 400 and the body is validated.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
  T: DeserializeOwned + Validate + Send,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    value.validate()?;
    Ok(Self(value))
  }
}

// ─── Field checks ────────────────────────────────────────────────────────────

static PAN_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]{1}$").expect("PAN pattern compiles"));

/// At most `max` characters (not bytes).
pub fn max_chars(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
  if value.chars().count() > max {
    return Err(ApiError::BadRequest(format!("{field} must be at most {max} characters")));
  }
  Ok(())
}

/// Non-blank and at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
  if value.trim().is_empty() {
    return Err(ApiError::BadRequest(format!("{field} is required")));
  }
  max_chars(field, value, max)
}

pub fn exact_digits(field: &str, value: &str, len: usize) -> Result<(), ApiError> {
  if value.len() != len || !value.bytes().all(|b| b.is_ascii_digit()) {
    return Err(ApiError::BadRequest(format!("{field} must be exactly {len} digits")));
  }
  Ok(())
}

pub fn exact_chars(field: &str, value: &str, len: usize) -> Result<(), ApiError> {
  if value.chars().count() != len {
    return Err(ApiError::BadRequest(format!("{field} must be exactly {len} characters")));
  }
  Ok(())
}

pub fn pan_format(field: &str, value: &str) -> Result<(), ApiError> {
  if !PAN_PATTERN.is_match(value) {
    return Err(ApiError::BadRequest(format!("{field} format is invalid")));
  }
  Ok(())
}
