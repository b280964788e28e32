//! Router tests: requests go through the full axum stack into a session
//! backed by an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use creche_core::{
  child::{Child, ChildId},
  payment::{MONTHLY_FEE, Payment, PaymentKey},
  settings::FacilitySettings,
  store::CrecheStore,
};
use creche_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{Session, api_router};

async fn loaded_session() -> Arc<Session<SqliteStore>> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let session = Arc::new(Session::new(store, MONTHLY_FEE));
  session.load().await.unwrap();
  session
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut req = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      req = req.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, value)
}

fn lina() -> Value {
  json!({
    "familyName": "Amrani",
    "givenName": "Lina",
    "birthDate": "2021-04-12",
    "enrolledOn": "2024-09-01",
    "gender": "Fille",
    "section": "Moyenne",
    "motherName": "Samia",
    "fatherName": ""
  })
}

fn yanis() -> Value {
  json!({
    "familyName": "Bouzid",
    "givenName": "Yanis",
    "birthDate": "2020-11-30",
    "enrolledOn": "2024-09-01",
    "gender": "Garçon",
    "section": "Préscolaire"
  })
}

async fn enroll(router: &Router, child: Value) -> String {
  let (status, body) = call(router, Method::POST, "/children", Some(child)).await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_str().unwrap().to_owned()
}

fn pay(child: &str, month: u32, amount: i64) -> Value {
  json!({
    "childId": child,
    "year": 2024,
    "month": month,
    "amountPaid": amount,
    "paymentDate": "2024-10-05"
  })
}

// ─── Children ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn enroll_then_fetch_child() {
  let router = api_router(loaded_session().await);
  let id = enroll(&router, lina()).await;

  let (status, child) = call(&router, Method::GET, &format!("/children/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(child["familyName"], "Amrani");
  assert_eq!(child["motherName"], "Samia");
  assert_eq!(child["fatherName"], Value::Null);
}

#[tokio::test]
async fn roster_is_sorted_and_filterable() {
  let router = api_router(loaded_session().await);
  enroll(&router, yanis()).await;
  enroll(&router, lina()).await;

  let (_, all) = call(&router, Method::GET, "/children", None).await;
  let names: Vec<&str> = all.as_array().unwrap().iter().map(|c| c["familyName"].as_str().unwrap()).collect();
  assert_eq!(names, ["Amrani", "Bouzid"]);

  let (_, found) = call(&router, Method::GET, "/children?search=BOUZID%20yan", None).await;
  assert_eq!(found.as_array().unwrap().len(), 1);

  let (_, middle) = call(&router, Method::GET, "/children?section=Moyenne", None).await;
  assert_eq!(middle[0]["givenName"], "Lina");
  assert_eq!(middle.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_name_is_a_bad_request() {
  let router = api_router(loaded_session().await);
  let mut child = lina();
  child["givenName"] = json!("   ");

  let (status, body) = call(&router, Method::POST, "/children", Some(child)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("given name"));
}

#[tokio::test]
async fn updating_unknown_child_is_not_found() {
  let router = api_router(loaded_session().await);
  let (status, _) = call(&router, Method::PUT, "/children/nope", Some(lina())).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_child_fields() {
  let router = api_router(loaded_session().await);
  let id = enroll(&router, lina()).await;
  let mut edited = lina();
  edited["section"] = json!("Préscolaire");

  let (status, child) = call(&router, Method::PUT, &format!("/children/{id}"), Some(edited)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(child["id"], id.as_str());
  assert_eq!(child["section"], "Préscolaire");
}

#[tokio::test]
async fn deleting_child_drops_its_payments() {
  let session = loaded_session().await;
  let router = api_router(session.clone());
  let id = enroll(&router, lina()).await;
  call(&router, Method::PUT, "/payments", Some(pay(&id, 9, 10_000))).await;

  let (status, _) = call(&router, Method::DELETE, &format!("/children/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = call(&router, Method::GET, &format!("/children/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(session.store().list_payments().await.unwrap().is_empty());
  assert_eq!(session.ready().await.unwrap().payments.len(), 0);
}

// ─── Payments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn partial_then_full_payment_keeps_one_record() {
  let router = api_router(loaded_session().await);
  let id = enroll(&router, lina()).await;

  let (status, first) = call(&router, Method::PUT, "/payments", Some(pay(&id, 9, 6_000))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(first["status"]["status"], "partially_paid");
  assert_eq!(first["status"]["remaining"], 4_000);

  let (_, second) = call(&router, Method::PUT, "/payments", Some(pay(&id, 9, 10_000))).await;
  assert_eq!(second["status"]["status"], "fully_paid");
  assert_eq!(second["status"]["remaining"], 0);

  let (_, history) = call(&router, Method::GET, &format!("/children/{id}/payments"), None).await;
  assert_eq!(history.as_array().unwrap().len(), 1);
  assert_eq!(history[0]["amountPaid"], 10_000);
}

#[tokio::test]
async fn monthly_overview_classifies_every_child() {
  let router = api_router(loaded_session().await);
  let lina = enroll(&router, lina()).await;
  enroll(&router, yanis()).await;
  call(&router, Method::PUT, "/payments", Some(pay(&lina, 9, 4_000))).await;

  let (status, overview) = call(&router, Method::GET, "/payments?year=2024&month=9", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(overview["monthName"], "Octobre");
  let rows = overview["rows"].as_array().unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0]["status"]["status"], "partially_paid");
  assert_eq!(rows[0]["status"]["remaining"], 6_000);
  assert_eq!(rows[1]["status"]["status"], "unpaid");
  assert_eq!(rows[1]["status"]["remaining"], MONTHLY_FEE);

  let (_, unpaid) = call(&router, Method::GET, "/payments?year=2024&month=9&status=unpaid", None).await;
  assert_eq!(unpaid["rows"].as_array().unwrap().len(), 1);
  assert_eq!(unpaid["rows"][0]["child"]["familyName"], "Bouzid");

  let (_, next_month) = call(&router, Method::GET, "/payments?year=2024&month=10", None).await;
  assert_eq!(next_month["rows"][0]["status"]["status"], "unpaid");
}

#[tokio::test]
async fn month_out_of_range_is_rejected() {
  let router = api_router(loaded_session().await);
  let id = enroll(&router, lina()).await;

  let (status, _) = call(&router, Method::GET, "/payments?year=2024&month=12", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let (status, _) = call(&router, Method::PUT, "/payments", Some(pay(&id, 12, 1_000))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn negative_amount_is_rejected() {
  let router = api_router(loaded_session().await);
  let id = enroll(&router, lina()).await;
  let (status, _) = call(&router, Method::PUT, "/payments", Some(pay(&id, 1, -1))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) =
    call(&router, Method::PUT, "/payments", Some(pay(&id, 1, 1_000_000_001))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_for_unknown_child_is_not_found() {
  let router = api_router(loaded_session().await);
  let (status, _) = call(&router, Method::PUT, "/payments", Some(pay("ghost", 1, 10_000))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn removing_payment_reverts_to_unpaid() {
  let router = api_router(loaded_session().await);
  let id = enroll(&router, lina()).await;
  call(&router, Method::PUT, "/payments", Some(pay(&id, 9, 10_000))).await;

  let (status, _) = call(&router, Method::DELETE, &format!("/payments/{id}/2024/9"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, overview) = call(&router, Method::GET, "/payments?year=2024&month=9", None).await;
  assert_eq!(overview["rows"][0]["status"]["status"], "unpaid");
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_reports_month_and_history() {
  let router = api_router(loaded_session().await);
  let lina = enroll(&router, lina()).await;
  enroll(&router, yanis()).await;
  call(&router, Method::PUT, "/payments", Some(pay(&lina, 9, 10_000))).await;

  let (status, dash) = call(&router, Method::GET, "/dashboard?date=2024-10-20", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(dash["headcount"]["total"], 2);
  assert_eq!(dash["month"]["collected"], 10_000);
  assert_eq!(dash["month"]["expected"], 20_000);
  assert_eq!(dash["month"]["outstanding"], 10_000);

  let history = dash["history"].as_array().unwrap();
  assert_eq!(history.len(), 6);
  assert_eq!(history[5]["amount"], 10_000);
  assert_eq!(history[5]["ratio"], 1.0);
  assert_eq!(history[0]["amount"], 0);
  assert_eq!(history[5]["height"], 100);
  assert_eq!(history[0]["height"], 4);
}

// ─── Settings & certificate ──────────────────────────────────────────────────

#[tokio::test]
async fn settings_default_until_saved() {
  let router = api_router(loaded_session().await);

  let (_, settings) = call(&router, Method::GET, "/settings", None).await;
  assert_eq!(settings["name"], FacilitySettings::default().name);

  let mut edited = settings.clone();
  edited["city"] = json!("Alger");
  let (status, _) = call(&router, Method::PUT, "/settings", Some(edited)).await;
  assert_eq!(status, StatusCode::OK);

  let (_, settings) = call(&router, Method::GET, "/settings", None).await;
  assert_eq!(settings["city"], "Alger");

  let mut blank = settings.clone();
  blank["taxId"] = json!("");
  let (status, _) = call(&router, Method::PUT, "/settings", Some(blank)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn certificate_is_a_text_attachment() {
  let router = api_router(loaded_session().await);
  let id = enroll(&router, lina()).await;

  let req = Request::builder()
    .uri(format!("/children/{id}/certificate?date=2024-10-03"))
    .body(Body::empty())
    .unwrap();
  let resp = router.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(resp.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
  assert_eq!(
    resp.headers()[header::CONTENT_DISPOSITION],
    "attachment; filename=\"Certificat_Amrani_Lina.txt\""
  );

  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let text = std::str::from_utf8(&bytes).unwrap();
  let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
  assert!(flat.contains("née le 12/04/2021"), "{text}");
  assert!(flat.contains("l’année scolaire 2024-2025"));
}

// ─── Load failures ───────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("settings table unreachable")]
struct Offline;

/// Serves children and payments but cannot read settings.
struct SettingsOffline;

impl CrecheStore for SettingsOffline {
  type Error = Offline;

  async fn list_children(&self) -> Result<Vec<Child>, Offline> { Ok(Vec::new()) }

  async fn upsert_child(&self, _: Child) -> Result<(), Offline> { Ok(()) }

  async fn delete_child(&self, _: ChildId) -> Result<(), Offline> { Ok(()) }

  async fn list_payments(&self) -> Result<Vec<Payment>, Offline> { Ok(Vec::new()) }

  async fn upsert_payment(&self, _: Payment) -> Result<(), Offline> { Ok(()) }

  async fn delete_payment(&self, _: PaymentKey) -> Result<(), Offline> { Ok(()) }

  async fn get_settings(&self) -> Result<Option<FacilitySettings>, Offline> { Err(Offline) }

  async fn put_settings(&self, _: FacilitySettings) -> Result<(), Offline> { Ok(()) }
}

#[tokio::test]
async fn reads_before_load_are_unavailable() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let router = api_router(Arc::new(Session::new(store, MONTHLY_FEE)));

  let (status, body) = call(&router, Method::GET, "/children", None).await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
  assert_eq!(body["retry"], "/api/reload");

  let (_, status_body) = call(&router, Method::GET, "/status", None).await;
  assert_eq!(status_body["load"]["state"], "idle");

  let (status, reloaded) = call(&router, Method::POST, "/reload", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(reloaded["load"]["state"], "ready");
}

#[tokio::test]
async fn settings_failure_blocks_the_session() {
  let session = Arc::new(Session::new(SettingsOffline, MONTHLY_FEE));
  assert!(session.load().await.is_err());
  let router = api_router(session);

  let (status, body) = call(&router, Method::GET, "/dashboard", None).await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
  assert!(body["error"].as_str().unwrap().contains("settings table unreachable"));

  let (_, status_body) = call(&router, Method::GET, "/status", None).await;
  assert_eq!(status_body["load"]["state"], "failed");

  let (status, _) = call(&router, Method::POST, "/reload", None).await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

  let (status, _) = call(&router, Method::POST, "/children", Some(lina())).await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
