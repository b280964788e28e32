//! `GET /status` and `POST /reload`.
//!
//! These two stay available whatever the load state, so a client can see
//! why data is missing and ask for another attempt.

use std::sync::Arc;

use axum::{Json, extract::State};
use creche_core::{payment::Amount, state::LoadState, store::CrecheStore};
use serde::Serialize;

use crate::{error::ApiError, session::Session};

#[derive(Debug, Serialize)]
pub struct StatusBody {
  pub load:     LoadState,
  pub children: usize,
  pub payments: usize,
  pub fee:      Amount,
  pub currency: &'static str,
}

async fn snapshot<S: CrecheStore>(session: &Session<S>) -> StatusBody {
  let load = session.load_state().await;
  let (children, payments) = match session.ready().await {
    Ok(state) => (state.children.len(), state.payments.len()),
    Err(_) => (0, 0),
  };
  StatusBody {
    load,
    children,
    payments,
    fee: session.fee(),
    currency: creche_core::payment::CURRENCY,
  }
}

/// `GET /status`
pub async fn get<S: CrecheStore>(State(session): State<Arc<Session<S>>>) -> Json<StatusBody> {
  Json(snapshot(&session).await)
}

/// `POST /reload`: re-run the initial load. 503 if it fails again.
pub async fn reload<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
) -> Result<Json<StatusBody>, ApiError> {
  session.load().await?;
  Ok(Json(snapshot(&session).await))
}
