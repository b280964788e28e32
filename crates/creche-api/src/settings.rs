//! `GET /settings` and `PUT /settings`: the single facility record.

use std::sync::Arc;

use axum::{Json, extract::State};
use creche_core::{settings::FacilitySettings, store::CrecheStore};

use crate::{error::ApiError, session::Session};

pub async fn get<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
) -> Result<Json<FacilitySettings>, ApiError> {
  Ok(Json(session.ready().await?.settings.clone()))
}

/// Every field is required and must be non-blank.
pub async fn put<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Json(settings): Json<FacilitySettings>,
) -> Result<Json<FacilitySettings>, ApiError> {
  session.save_settings(settings.clone()).await?;
  Ok(Json(settings))
}
