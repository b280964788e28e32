//! Handlers for `/payments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/payments` | `?year&month&search&section&status`; defaults to the current month |
//! | `PUT`    | `/payments` | Body: `{"childId","year","month","amountPaid","paymentDate"?}` |
//! | `DELETE` | `/payments/{child_id}/{year}/{month}` | 204 |
//!
//! Months are 0-based (0 = January).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use chrono::NaiveDate;
use creche_core::{
  child::{Child, ChildId, Section},
  payment::{Amount, Payment, PaymentKey, Period},
  roster::RosterFilter,
  status::{PaymentStatus, StatusReport, status_for},
  store::CrecheStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, session::Session};

fn today() -> NaiveDate { chrono::Local::now().date_naive() }

// ─── Monthly overview ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct OverviewParams {
  pub year:    Option<i32>,
  pub month:   Option<u32>,
  pub search:  Option<String>,
  pub section: Option<Section>,
  pub status:  Option<PaymentStatus>,
}

/// One roster line of the monthly overview.
#[derive(Debug, Serialize)]
pub struct OverviewRow {
  pub child:  Child,
  pub status: StatusReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
  pub year:       i32,
  pub month:      u8,
  pub month_name: &'static str,
  pub fee:        Amount,
  pub rows:       Vec<OverviewRow>,
}

/// `GET /payments`
pub async fn overview<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Query(params): Query<OverviewParams>,
) -> Result<Json<Overview>, ApiError> {
  let current = Period::of(today());
  let period = Period::new(
    params.year.unwrap_or(current.year()),
    params.month.unwrap_or(current.month().into()),
  )?;

  let fee = session.fee();
  let state = session.ready().await?;
  let filter = RosterFilter { search: params.search, section: params.section, status: params.status };

  let rows = filter
    .apply(&state.children, &state.payments, period, fee)
    .into_iter()
    .map(|child| OverviewRow {
      status: status_for(&state.payments, &child.id, period, fee),
      child:  child.clone(),
    })
    .collect();

  Ok(Json(Overview {
    year: period.year(),
    month: period.month(),
    month_name: period.month_name(),
    fee,
    rows,
  }))
}

// ─── Record ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBody {
  pub child_id:     ChildId,
  pub year:         i32,
  pub month:        u32,
  pub amount_paid:  Amount,
  /// Defaults to today.
  pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct Recorded {
  pub payment: Payment,
  pub status:  StatusReport,
}

/// `PUT /payments`. Replaces whatever was recorded for that child and month.
pub async fn record<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Json(body): Json<RecordBody>,
) -> Result<Json<Recorded>, ApiError> {
  let period = Period::new(body.year, body.month)?;
  let payment = Payment::new(
    body.child_id,
    period,
    body.amount_paid,
    body.payment_date.unwrap_or_else(today),
  )?;

  session.record_payment(payment.clone()).await?;

  let status = status_for(
    &session.ready().await?.payments,
    &payment.child_id,
    period,
    session.fee(),
  );
  Ok(Json(Recorded { payment, status }))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /payments/{child_id}/{year}/{month}`
pub async fn remove<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Path((child_id, year, month)): Path<(String, i32, u32)>,
) -> Result<StatusCode, ApiError> {
  let key = PaymentKey { child_id: ChildId::from(child_id), period: Period::new(year, month)? };
  session.remove_payment(key).await?;
  Ok(StatusCode::NO_CONTENT)
}
