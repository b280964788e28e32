//! [`RestStore`], the PostgREST implementation of [`CrecheStore`].

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;

use creche_core::{
  child::{Child, ChildId},
  payment::{Payment, PaymentKey},
  settings::FacilitySettings,
  store::CrecheStore,
};

use crate::{
  Error, Result,
  rows::{ChildRow, PaymentRow, SettingsRow},
};

const CHILDREN: &str = "children";
const PAYMENTS: &str = "payments";
const SETTINGS: &str = "settings";

/// Upsert instead of failing on a primary-key conflict.
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=minimal";

/// Connection settings for the hosted database.
#[derive(Debug, Clone)]
pub struct RestConfig {
  /// Project URL, e.g. `https://xyz.supabase.co`.
  pub url:     String,
  /// Public (anon) API key, sent both as `apikey` and as a bearer token.
  pub api_key: String,
}

/// A crèche store backed by a PostgREST endpoint.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RestStore {
  client: Client,
  config: RestConfig,
}

impl RestStore {
  pub fn new(config: RestConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, table: &str) -> String {
    format!("{}/rest/v1/{table}", self.config.url.trim_end_matches('/'))
  }

  fn request(&self, method: Method, table: &str) -> RequestBuilder {
    self
      .client
      .request(method, self.url(table))
      .header("apikey", &self.config.api_key)
      .bearer_auth(&self.config.api_key)
  }

  fn upsert(&self, table: &str, body: &impl Serialize) -> RequestBuilder {
    self
      .request(Method::POST, table)
      .header("Prefer", MERGE_DUPLICATES)
      .json(body)
  }

  // ── Request builders ──────────────────────────────────────────────────────

  pub(crate) fn list_children_request(&self) -> RequestBuilder {
    self
      .request(Method::GET, CHILDREN)
      .query(&[("select", "*"), ("order", "nom.asc")])
  }

  pub(crate) fn upsert_child_request(&self, child: &Child) -> RequestBuilder {
    self.upsert(CHILDREN, &ChildRow::from(child))
  }

  /// The child row, then its payments.
  pub(crate) fn delete_child_requests(&self, id: &ChildId) -> [RequestBuilder; 2] {
    let filter = format!("eq.{id}");
    [
      self
        .request(Method::DELETE, CHILDREN)
        .query(&[("id", filter.as_str())]),
      self
        .request(Method::DELETE, PAYMENTS)
        .query(&[("child_id", filter.as_str())]),
    ]
  }

  pub(crate) fn list_payments_request(&self) -> RequestBuilder {
    self.request(Method::GET, PAYMENTS).query(&[("select", "*")])
  }

  pub(crate) fn upsert_payment_request(&self, payment: &Payment) -> RequestBuilder {
    self
      .upsert(PAYMENTS, &PaymentRow::from(payment))
      .query(&[("on_conflict", "child_id,year,month")])
  }

  pub(crate) fn delete_payment_request(&self, key: &PaymentKey) -> RequestBuilder {
    self.request(Method::DELETE, PAYMENTS).query(&[
      ("child_id", format!("eq.{}", key.child_id)),
      ("year", format!("eq.{}", key.period.year())),
      ("month", format!("eq.{}", key.period.month())),
    ])
  }

  pub(crate) fn get_settings_request(&self) -> RequestBuilder {
    self
      .request(Method::GET, SETTINGS)
      .query(&[("select", "*"), ("limit", "1")])
  }

  pub(crate) fn put_settings_request(&self, settings: &FacilitySettings) -> RequestBuilder {
    self.upsert(SETTINGS, &SettingsRow::from(settings))
  }
}

/// Send `req` and turn a non-success status into [`Error::Status`],
/// carrying the backend's `message` when the body has one.
async fn send(method: &'static str, table: &'static str, req: RequestBuilder) -> Result<Response> {
  tracing::debug!(method, table, "backend request");
  let resp = req.send().await?;
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }

  let body = resp.text().await.unwrap_or_default();
  let message = serde_json::from_str::<serde_json::Value>(&body)
    .ok()
    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
    .unwrap_or(body);

  Err(Error::Status { method, table, status, message })
}

// ─── CrecheStore impl ────────────────────────────────────────────────────────

impl CrecheStore for RestStore {
  type Error = Error;

  async fn list_children(&self) -> Result<Vec<Child>> {
    let rows: Vec<ChildRow> = send("GET", CHILDREN, self.list_children_request())
      .await?
      .json()
      .await?;
    rows.into_iter().map(ChildRow::into_child).collect()
  }

  async fn upsert_child(&self, child: Child) -> Result<()> {
    child.validate()?;
    send("POST", CHILDREN, self.upsert_child_request(&child)).await?;
    Ok(())
  }

  /// Once the child row is gone the deletion has happened; a failure to
  /// clear its payments afterwards only leaves rows no roster refers to.
  async fn delete_child(&self, id: ChildId) -> Result<()> {
    let [child, payments] = self.delete_child_requests(&id);
    send("DELETE", CHILDREN, child).await?;
    if let Err(e) = send("DELETE", PAYMENTS, payments).await {
      tracing::warn!(child = %id, error = %e, "child deleted but its payments were not");
    }
    Ok(())
  }

  async fn list_payments(&self) -> Result<Vec<Payment>> {
    let rows: Vec<PaymentRow> = send("GET", PAYMENTS, self.list_payments_request())
      .await?
      .json()
      .await?;
    rows.into_iter().map(PaymentRow::into_payment).collect()
  }

  async fn upsert_payment(&self, payment: Payment) -> Result<()> {
    payment.validate()?;
    send("POST", PAYMENTS, self.upsert_payment_request(&payment)).await?;
    Ok(())
  }

  async fn delete_payment(&self, key: PaymentKey) -> Result<()> {
    send("DELETE", PAYMENTS, self.delete_payment_request(&key)).await?;
    Ok(())
  }

  async fn get_settings(&self) -> Result<Option<FacilitySettings>> {
    let rows: Vec<SettingsRow> = send("GET", SETTINGS, self.get_settings_request())
      .await?
      .json()
      .await?;
    Ok(rows.into_iter().next().map(FacilitySettings::from))
  }

  async fn put_settings(&self, settings: FacilitySettings) -> Result<()> {
    settings.validate()?;
    send("POST", SETTINGS, self.put_settings_request(&settings)).await?;
    Ok(())
  }
}
