//! Handlers for `/children` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/children` | Optional `?search=<text>&section=<Petite\|Moyenne\|Préscolaire>` |
//! | `POST`   | `/children` | Body: a child without `id`; 201 with the stored child |
//! | `GET`    | `/children/{id}` | 404 if unknown |
//! | `PUT`    | `/children/{id}` | Full replacement; 404 if unknown |
//! | `DELETE` | `/children/{id}` | Also deletes the child's payments; 204 |
//! | `GET`    | `/children/{id}/payments` | Payment history, oldest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use creche_core::{
  child::{Child, ChildDraft, ChildId, Section},
  payment::{Payment, Period},
  roster::RosterFilter,
  store::CrecheStore,
};
use serde::Deserialize;

use crate::{error::ApiError, session::Session};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub search:  Option<String>,
  pub section: Option<Section>,
}

/// `GET /children[?search=<text>&section=<section>]`
pub async fn list<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Child>>, ApiError> {
  let state = session.ready().await?;
  let filter = RosterFilter { search: params.search, section: params.section, status: None };

  let period = Period::of(chrono::Local::now().date_naive());
  let children = filter
    .apply(&state.children, &state.payments, period, session.fee())
    .into_iter()
    .cloned()
    .collect();
  Ok(Json(children))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /children`
pub async fn create<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Json(draft): Json<ChildDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let child = draft.into_child(ChildId::generate())?;
  let child = session.save_child(child).await?;
  Ok((StatusCode::CREATED, Json(child)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /children/{id}`
pub async fn get_one<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Path(id): Path<String>,
) -> Result<Json<Child>, ApiError> {
  let id = ChildId::from(id);
  let state = session.ready().await?;
  let child = state.child(&id).cloned().ok_or_else(|| not_found(&id))?;
  Ok(Json(child))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /children/{id}`
pub async fn update<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Path(id): Path<String>,
  Json(draft): Json<ChildDraft>,
) -> Result<Json<Child>, ApiError> {
  let id = ChildId::from(id);
  if session.ready().await?.child(&id).is_none() {
    return Err(not_found(&id));
  }
  let child = session.save_child(draft.into_child(id)?).await?;
  Ok(Json(child))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /children/{id}`
pub async fn delete_one<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  session.delete_child(ChildId::from(id)).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Payment history ─────────────────────────────────────────────────────────

/// `GET /children/{id}/payments`
pub async fn payments<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<Payment>>, ApiError> {
  let id = ChildId::from(id);
  let state = session.ready().await?;
  if state.child(&id).is_none() {
    return Err(not_found(&id));
  }
  Ok(Json(state.payments.for_child(&id).into_iter().cloned().collect()))
}

pub(crate) fn not_found(id: &ChildId) -> ApiError {
  ApiError::NotFound(format!("child {id} not found"))
}
