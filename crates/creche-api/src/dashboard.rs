//! `GET /dashboard[?date=YYYY-MM-DD]`: headcounts, the month's revenue and
//! the trailing collection history, as of `date` (default today).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::NaiveDate;
use creche_core::{stats::Dashboard, store::CrecheStore};
use serde::Deserialize;

use crate::{error::ApiError, session::Session};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
  pub date: Option<NaiveDate>,
}

pub async fn handler<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Query(params): Query<DashboardParams>,
) -> Result<Json<Dashboard>, ApiError> {
  let today = params.date.unwrap_or_else(|| chrono::Local::now().date_naive());
  let state = session.ready().await?;
  Ok(Json(Dashboard::compute(&state.children, &state.payments, today, session.fee())))
}
