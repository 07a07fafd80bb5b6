//! JSON REST API for Udyam registration.
//!
//! Exposes an axum [`Router`] backed by a [`Registrar`] over any
//! [`ApplicationStore`] and [`IdentityVerifier`]. Caller authentication,
//! CORS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", udyam_api::api_router(registrar.clone()))
//! .route("/", get(udyam_api::health::handler))
//! ```

pub mod aadhaar;
pub mod error;
pub mod extract;
pub mod health;
pub mod pan;
pub mod udyam;

use std::sync::Arc;

use axum::{Router, routing::post};
use udyam_core::{registrar::Registrar, store::ApplicationStore, verify::IdentityVerifier};

pub use error::ApiError;

/// Build the registration API router for `registrar`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, V>(registrar: Arc<Registrar<S, V>>) -> Router<()>
where
  S: ApplicationStore + 'static,
  V: IdentityVerifier + 'static,
{
  Router::new()
    // Aadhaar
    .route("/aadhaar/send-otp", post(aadhaar::send_otp::<S, V>))
    .route("/aadhaar/verify-otp", post(aadhaar::verify_otp::<S, V>))
    // PAN
    .route("/pan/verify", post(pan::verify::<S, V>))
    // Final form
    .route("/udyam/{app_id}/submit", post(udyam::submit::<S, V>))
    .with_state(registrar)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use udyam_core::{
    application::{ApplicationStatus, NewApplication},
    codes::GstinStatus,
    registrar::Registrar,
    store::ApplicationStore,
    verify::{IdentityVerifier, OtpDispatch, PanCheck, Verdict},
  };
  use udyam_store_sqlite::SqliteStore;
  use uuid::Uuid;

  use super::*;

  async fn make_registrar() -> Arc<Registrar<SqliteStore>> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    Arc::new(Registrar::simulated(Arc::new(store)))
  }

  async fn send(
    router: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = router.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
  }

  async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, "POST", uri, Some(body)).await
  }

  fn send_otp_body() -> Value {
    json!({
      "aadhaarNumber": "123412341234",
      "entrepreneurName": "John Doe",
      "consent": true,
    })
  }

  fn pan_body(app_id: &str) -> Value {
    json!({
      "appId": app_id,
      "panNumber": "ABCDE1234F",
      "panHolderName": "Jane Doe",
      "dobOrDoi": "1990-01-01",
      "consent": true,
    })
  }

  fn final_form_body() -> Value {
    json!({
      "entrepreneurName": "John Doe",
      "typeOfOrganisation": "3",
      "dobOrDoi": "01-01-1990",
      "previousYearITR": "1",
      "hasGSTIN": "2",
    })
  }

  /// Run send-otp and return the new application id.
  async fn start_application(router: &Router) -> String {
    let (status, body) = post_json(router.clone(), "/aadhaar/send-otp", send_otp_body()).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    body["appId"].as_str().unwrap().to_owned()
  }

  // ── Health ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_returns_ok() {
    let router = Router::new().route("/", get(health::handler));
    let (status, body) = send(router, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
  }

  // ── Aadhaar ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn send_otp_returns_masked_destination() {
    let registrar = make_registrar().await;
    let router = api_router(registrar.clone());

    let (status, body) = post_json(router, "/aadhaar/send-otp", send_otp_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["otpSentTo"], "****1234");
    assert!(body["transactionId"].as_str().is_some_and(|t| !t.is_empty()));

    let app_id = Uuid::parse_str(body["appId"].as_str().unwrap()).unwrap();
    let app = registrar.store().get_application(app_id).await.unwrap().unwrap();
    assert_eq!(app.status, ApplicationStatus::Draft);
  }

  #[tokio::test]
  async fn send_otp_rejects_bad_aadhaar() {
    let router = api_router(make_registrar().await);

    for bad in ["12341234123", "1234123412345", "12341234123x"] {
      let mut body = send_otp_body();
      body["aadhaarNumber"] = json!(bad);
      let (status, resp) = post_json(router.clone(), "/aadhaar/send-otp", body).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "aadhaar {bad}");
      assert!(resp["detail"].as_str().unwrap().contains("aadhaarNumber"));
    }
  }

  #[tokio::test]
  async fn send_otp_rejects_bad_names_and_missing_fields() {
    let router = api_router(make_registrar().await);

    let mut body = send_otp_body();
    body["entrepreneurName"] = json!("x".repeat(101));
    let (status, _) = post_json(router.clone(), "/aadhaar/send-otp", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = send_otp_body();
    body["entrepreneurName"] = json!("");
    let (status, _) = post_json(router.clone(), "/aadhaar/send-otp", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, resp) =
      post_json(router, "/aadhaar/send-otp", json!({ "aadhaarNumber": "123412341234" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["detail"].is_string());
  }

  #[tokio::test]
  async fn verify_otp_marks_verified() {
    let registrar = make_registrar().await;
    let router = api_router(registrar.clone());
    let app_id = start_application(&router).await;

    let (status, body) = post_json(
      router,
      "/aadhaar/verify-otp",
      json!({ "app_id": app_id, "transaction_id": "whatever", "otp": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "verified": true, "appId": app_id }));

    let app = registrar
      .store()
      .get_application(Uuid::parse_str(&app_id).unwrap())
      .await
      .unwrap()
      .unwrap();
    assert!(app.aadhaar_verified);
  }

  #[tokio::test]
  async fn verify_otp_unknown_app_is_404() {
    let router = api_router(make_registrar().await);

    for app_id in [Uuid::new_v4().to_string(), "app123".to_owned()] {
      let (status, body) = post_json(
        router.clone(),
        "/aadhaar/verify-otp",
        json!({ "app_id": app_id, "transaction_id": "txn456", "otp": "123456" }),
      )
      .await;
      assert_eq!(status, StatusCode::NOT_FOUND, "app_id {app_id}");
      assert_eq!(body, json!({ "detail": "Application not found" }));
    }
  }

  #[tokio::test]
  async fn verify_otp_requires_six_characters() {
    let router = api_router(make_registrar().await);
    let app_id = start_application(&router).await;

    for otp in ["12345", "1234567"] {
      let (status, _) = post_json(
        router.clone(),
        "/aadhaar/verify-otp",
        json!({ "app_id": app_id, "transaction_id": "txn", "otp": otp }),
      )
      .await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "otp {otp}");
    }
  }

  // ── PAN ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn verify_pan_stores_masked_pan() {
    let registrar = make_registrar().await;
    let router = api_router(registrar.clone());
    let app_id = start_application(&router).await;

    let (status, body) = post_json(router, "/pan/verify", pan_body(&app_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "verified": true, "appId": app_id }));

    let app = registrar
      .store()
      .get_application(Uuid::parse_str(&app_id).unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(app.pan_masked.as_deref(), Some("ABCDE*****F"));
    assert!(app.pan_verified);
  }

  #[tokio::test]
  async fn verify_pan_validation_and_not_found() {
    let router = api_router(make_registrar().await);

    let unknown = Uuid::new_v4().to_string();
    let (status, body) = post_json(router.clone(), "/pan/verify", pan_body(&unknown)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Application not found");

    let app_id = start_application(&router).await;
    let mut body = pan_body(&app_id);
    body["panNumber"] = json!("abcde1234f");
    let (status, _) = post_json(router.clone(), "/pan/verify", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = pan_body(&app_id);
    body["dobOrDoi"] = json!("01-01-1990");
    let (status, _) = post_json(router.clone(), "/pan/verify", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(router, "/pan/verify", pan_body("not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Final form ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn submit_moves_to_submitted() {
    let registrar = make_registrar().await;
    let router = api_router(registrar.clone());
    let app_id = start_application(&router).await;

    let (status, body) =
      post_json(router, &format!("/udyam/{app_id}/submit"), final_form_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "registrationId": app_id, "status": "submitted" }));

    let app = registrar
      .store()
      .get_application(Uuid::parse_str(&app_id).unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(app.type_of_organisation.as_deref(), Some("Partnership / पार्टनरशिप"));
    assert_eq!(app.dob_or_doi, chrono::NaiveDate::from_ymd_opt(1990, 1, 1));
    assert_eq!(app.previous_year_itr_filed, Some(true));
    assert_eq!(app.has_gstin_status, Some(GstinStatus::NotRegistered));
    assert_eq!(app.form_payload["dobOrDoi"], "1990-01-01");
  }

  #[tokio::test]
  async fn submit_unknown_app_is_404() {
    let router = api_router(make_registrar().await);
    let (status, body) = post_json(
      router,
      &format!("/udyam/{}/submit", Uuid::new_v4()),
      final_form_body(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Application not found" }));

    let router = api_router(make_registrar().await);
    let (status, _) = post_json(router, "/udyam/app123/submit", final_form_body()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn submit_rejects_codes_outside_the_form() {
    let router = api_router(make_registrar().await);
    let app_id = start_application(&router).await;

    let mut body = final_form_body();
    body["previousYearITR"] = json!("3");
    let (status, _) = post_json(router.clone(), &format!("/udyam/{app_id}/submit"), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = final_form_body();
    body["dobOrDoi"] = json!("1990/01/01");
    let (status, _) = post_json(router, &format!("/udyam/{app_id}/submit"), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn full_registration_flow() {
    let registrar = make_registrar().await;
    let router = api_router(registrar.clone());

    let app_id = start_application(&router).await;

    let (_, body) = post_json(
      router.clone(),
      "/aadhaar/verify-otp",
      json!({ "app_id": app_id, "transaction_id": "any", "otp": "123456" }),
    )
    .await;
    assert_eq!(body["verified"], true);

    let (_, body) = post_json(router.clone(), "/pan/verify", pan_body(&app_id)).await;
    assert_eq!(body["verified"], true);

    let (status, body) =
      post_json(router, &format!("/udyam/{app_id}/submit"), final_form_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registrationId"], app_id.as_str());

    let app = registrar
      .store()
      .get_application(Uuid::parse_str(&app_id).unwrap())
      .await
      .unwrap()
      .unwrap();
    assert!(app.aadhaar_verified && app.pan_verified);
    assert_eq!(app.pan_masked.as_deref(), Some("ABCDE*****F"));
    assert_eq!(app.status, ApplicationStatus::Submitted);
  }

  // ── Verifier outcomes ───────────────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("provider unavailable: secret-upstream-detail")]
  struct ProviderDown;

  /// Dispatches OTPs, rejects OTPs, and errors on PAN checks.
  struct FlakyVerifier;

  impl IdentityVerifier for FlakyVerifier {
    type Error = ProviderDown;

    async fn send_aadhaar_otp<'a>(
      &'a self,
      _aadhaar_number: &'a str,
    ) -> Result<OtpDispatch, ProviderDown> {
      Ok(OtpDispatch { transaction_id: "txn".into() })
    }

    async fn confirm_aadhaar_otp<'a>(
      &'a self,
      _transaction_id: &'a str,
      _otp: &'a str,
    ) -> Result<Verdict, ProviderDown> {
      Ok(Verdict::rejected("OTP mismatch"))
    }

    async fn verify_pan<'a>(&'a self, _check: PanCheck<'a>) -> Result<Verdict, ProviderDown> {
      Err(ProviderDown)
    }
  }

  #[tokio::test]
  async fn rejected_otp_reports_unverified_and_errors_stay_generic() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let router = api_router(Arc::new(Registrar::new(Arc::new(store), Arc::new(FlakyVerifier))));
    let app_id = start_application(&router).await;

    let (status, body) = post_json(
      router.clone(),
      "/aadhaar/verify-otp",
      json!({ "app_id": app_id, "transaction_id": "txn", "otp": "000000" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "verified": false, "appId": app_id }));

    let (status, body) = post_json(router, "/pan/verify", pan_body(&app_id)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": "Internal Server Error" }));
  }

  /// Every call fails with an error that must not reach the client.
  struct OfflineVerifier;

  impl IdentityVerifier for OfflineVerifier {
    type Error = ProviderDown;

    async fn send_aadhaar_otp<'a>(
      &'a self,
      _aadhaar_number: &'a str,
    ) -> Result<OtpDispatch, ProviderDown> {
      Err(ProviderDown)
    }

    async fn confirm_aadhaar_otp<'a>(
      &'a self,
      _transaction_id: &'a str,
      _otp: &'a str,
    ) -> Result<Verdict, ProviderDown> {
      Err(ProviderDown)
    }

    async fn verify_pan<'a>(&'a self, _check: PanCheck<'a>) -> Result<Verdict, ProviderDown> {
      Err(ProviderDown)
    }
  }

  #[tokio::test]
  async fn aadhaar_provider_errors_are_generic_400s() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let registrar = Arc::new(Registrar::new(Arc::new(store), Arc::new(OfflineVerifier)));
    let router = api_router(Arc::clone(&registrar));

    let (status, body) = post_json(router.clone(), "/aadhaar/send-otp", send_otp_body()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Request failed" }));
    assert!(!body.to_string().contains("secret-upstream-detail"));

    let app = registrar
      .store()
      .create_application(NewApplication {
        entrepreneur_name: "John Doe".into(),
        aadhaar_last4:     "1234".into(),
        aadhaar_hash:      "hash".into(),
        aadhaar_consent:   true,
      })
      .await
      .unwrap();

    let (status, body) = post_json(
      router,
      "/aadhaar/verify-otp",
      json!({ "app_id": app.app_id, "transaction_id": "txn", "otp": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Request failed" }));
    assert!(!body.to_string().contains("secret-upstream-detail"));
  }
}
