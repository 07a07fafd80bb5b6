//! [`SqliteStore`], the SQLite implementation of [`ApplicationStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use udyam_core::{
  application::{Application, ApplicationStatus, NewApplication},
  attempt::{NewAttempt, VerificationAttempt},
  store::ApplicationStore,
};

use crate::{
  Error, Result,
  encode::{APPLICATION_COLUMNS, RawApplication, RawAttempt, encode_date, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An application store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ApplicationStore impl ───────────────────────────────────────────────────

impl ApplicationStore for SqliteStore {
  type Error = Error;

  // ── Applications ──────────────────────────────────────────────────────────

  async fn create_application(&self, input: NewApplication) -> Result<Application> {
    let now = Utc::now();
    let app = Application {
      app_id:                  Uuid::new_v4(),
      entrepreneur_name:       Some(input.entrepreneur_name),
      aadhaar_last4:           Some(input.aadhaar_last4),
      aadhaar_hash:            Some(input.aadhaar_hash),
      aadhaar_consent:         input.aadhaar_consent,
      aadhaar_verified:        false,
      aadhaar_verified_at:     None,
      pan_masked:              None,
      pan_hash:                None,
      pan_holder_name:         None,
      dob_or_doi:              None,
      type_of_organisation:    None,
      previous_year_itr_filed: None,
      has_gstin_status:        None,
      pan_verified:            false,
      pan_verified_at:         None,
      status:                  ApplicationStatus::Draft,
      form_payload:            serde_json::json!({}),
      last_validation_errors:  None,
      created_at:              now,
      updated_at:              now,
    };

    let id_str       = encode_uuid(app.app_id);
    let name         = app.entrepreneur_name.clone();
    let last4        = app.aadhaar_last4.clone();
    let hash         = app.aadhaar_hash.clone();
    let consent      = app.aadhaar_consent;
    let status_str   = app.status.as_ref().to_owned();
    let payload_str  = app.form_payload.to_string();
    let at_str       = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO applications (
             app_id, entrepreneur_name, aadhaar_last4, aadhaar_hash,
             aadhaar_consent, status, form_payload, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str,
            name,
            last4,
            hash,
            consent,
            status_str,
            payload_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(app)
  }

  async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawApplication> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE app_id = ?1"),
            rusqlite::params![id_str],
            RawApplication::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawApplication::into_application).transpose()
  }

  async fn update_application<'a>(&'a self, app: &'a Application) -> Result<Application> {
    let mut updated = app.clone();
    updated.updated_at = Utc::now();

    let id_str           = encode_uuid(updated.app_id);
    let name             = updated.entrepreneur_name.clone();
    let last4            = updated.aadhaar_last4.clone();
    let aadhaar_hash     = updated.aadhaar_hash.clone();
    let consent          = updated.aadhaar_consent;
    let aadhaar_ok       = updated.aadhaar_verified;
    let aadhaar_at       = updated.aadhaar_verified_at.map(encode_dt);
    let pan_masked       = updated.pan_masked.clone();
    let pan_hash         = updated.pan_hash.clone();
    let holder           = updated.pan_holder_name.clone();
    let dob              = updated.dob_or_doi.map(encode_date);
    let org              = updated.type_of_organisation.clone();
    let itr              = updated.previous_year_itr_filed;
    let gstin            = updated.has_gstin_status.map(|g| g.code().to_owned());
    let pan_ok           = updated.pan_verified;
    let pan_at           = updated.pan_verified_at.map(encode_dt);
    let status_str       = updated.status.as_ref().to_owned();
    let payload_str      = updated.form_payload.to_string();
    let errors_str       = updated.last_validation_errors.as_ref().map(|v| v.to_string());
    let updated_at_str   = encode_dt(updated.updated_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE applications SET
             entrepreneur_name       = ?2,
             aadhaar_last4           = ?3,
             aadhaar_hash            = ?4,
             aadhaar_consent         = ?5,
             aadhaar_verified        = ?6,
             aadhaar_verified_at     = ?7,
             pan_masked              = ?8,
             pan_hash                = ?9,
             pan_holder_name         = ?10,
             dob_or_doi              = ?11,
             type_of_organisation    = ?12,
             previous_year_itr_filed = ?13,
             has_gstin_status        = ?14,
             pan_verified            = ?15,
             pan_verified_at         = ?16,
             status                  = ?17,
             form_payload            = ?18,
             last_validation_errors  = ?19,
             updated_at              = ?20
           WHERE app_id = ?1",
          rusqlite::params![
            id_str,
            name,
            last4,
            aadhaar_hash,
            consent,
            aadhaar_ok,
            aadhaar_at,
            pan_masked,
            pan_hash,
            holder,
            dob,
            org,
            itr,
            gstin,
            pan_ok,
            pan_at,
            status_str,
            payload_str,
            errors_str,
            updated_at_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ApplicationNotFound(updated.app_id));
    }
    Ok(updated)
  }

  async fn delete_application(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM applications WHERE app_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── Attempts (append-only) ──────────────────────────────────────────────

  async fn record_attempt(&self, input: NewAttempt) -> Result<VerificationAttempt> {
    let attempt = VerificationAttempt {
      attempt_id: Uuid::new_v4(),
      app_id:     input.app_id,
      kind:       input.kind,
      success:    input.success,
      payload:    input.payload,
      message:    input.message,
      created_at: Utc::now(),
    };

    let id_str      = encode_uuid(attempt.attempt_id);
    let app_id_str  = encode_uuid(attempt.app_id);
    let kind_str    = attempt.kind.as_ref().to_owned();
    let success     = attempt.success;
    let payload_str = attempt.payload.to_string();
    let message     = attempt.message.clone();
    let at_str      = encode_dt(attempt.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO verification_attempts (
             attempt_id, app_id, kind, success, payload, message, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, app_id_str, kind_str, success, payload_str, message, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(attempt)
  }

  async fn list_attempts(&self, app_id: Uuid) -> Result<Vec<VerificationAttempt>> {
    let app_id_str = encode_uuid(app_id);

    let raws: Vec<RawAttempt> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT attempt_id, app_id, kind, success, payload, message, created_at
           FROM verification_attempts
           WHERE app_id = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![app_id_str], |row| {
            Ok(RawAttempt {
              attempt_id: row.get(0)?,
              app_id:     row.get(1)?,
              kind:       row.get(2)?,
              success:    row.get(3)?,
              payload:    row.get(4)?,
              message:    row.get(5)?,
              created_at: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttempt::into_attempt).collect()
  }
}
