//! Masking and one-way hashing of identity numbers.
//!
//! Only the outputs of these functions are ever stored.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the full identifier.
pub fn digest(value: &str) -> String { hex::encode(Sha256::digest(value.as_bytes())) }

/// Last four characters of an Aadhaar number.
pub fn aadhaar_last4(aadhaar_number: &str) -> String {
  let chars: Vec<char> = aadhaar_number.chars().collect();
  chars[chars.len().saturating_sub(4)..].iter().collect()
}

/// The destination shown to the user after an OTP dispatch.
pub fn otp_destination(last4: &str) -> String { format!("****{last4}") }

/// Mask a PAN as first five characters, five `*`, last character.
///
/// Assumes the fixed ten-character PAN format.
pub fn mask_pan(pan_number: &str) -> String {
  let head: String = pan_number.chars().take(5).collect();
  let tail = pan_number.chars().last().map(String::from).unwrap_or_default();
  format!("{head}*****{tail}")
}
