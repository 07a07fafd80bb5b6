//! The `ApplicationStore` trait.
//!
//! Implemented by storage backends (e.g. `udyam-store-sqlite`). The
//! [`Registrar`](crate::registrar::Registrar) depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  application::{Application, NewApplication},
  attempt::{NewAttempt, VerificationAttempt},
};

/// Abstraction over an application store backend.
///
/// Every method is a single atomic write or read. No transaction spans two
/// calls, so concurrent updates to the same application are last-writer-wins.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ApplicationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Applications ──────────────────────────────────────────────────────

  /// Persist a new draft application. The store assigns the id and the
  /// `created_at` / `updated_at` timestamps.
  fn create_application(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  /// Retrieve an application by id. Returns `None` if not found.
  fn get_application(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  /// Write every mutable field of `app` back and bump `updated_at`.
  ///
  /// Returns the stored record. Fails if the application does not exist.
  fn update_application<'a>(
    &'a self,
    app: &'a Application,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + 'a;

  /// Delete an application together with its attempts. Returns `false` if
  /// nothing was deleted.
  fn delete_application(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Attempts (append-only) ──────────────────────────────────────────

  /// Append an attempt to the audit trail. The store assigns the id and
  /// `created_at`.
  fn record_attempt(
    &self,
    input: NewAttempt,
  ) -> impl Future<Output = Result<VerificationAttempt, Self::Error>> + Send + '_;

  /// All attempts for an application, oldest first.
  fn list_attempts(
    &self,
    app_id: Uuid,
  ) -> impl Future<Output = Result<Vec<VerificationAttempt>, Self::Error>> + Send + '_;
}
