//! `GET /children/{id}/certificate[?date=YYYY-MM-DD]`
//!
//! Returns the enrollment certificate as a plain-text attachment. The issue
//! date defaults to today and also decides the academic year printed.

use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  http::header,
  response::IntoResponse,
};
use chrono::NaiveDate;
use creche_certificate::Certificate;
use creche_core::{child::ChildId, store::CrecheStore};
use serde::Deserialize;

use crate::{children::not_found, error::ApiError, session::Session};

#[derive(Debug, Default, Deserialize)]
pub struct CertificateParams {
  pub date: Option<NaiveDate>,
}

pub async fn handler<S: CrecheStore>(
  State(session): State<Arc<Session<S>>>,
  Path(id): Path<String>,
  Query(params): Query<CertificateParams>,
) -> Result<impl IntoResponse, ApiError> {
  let id = ChildId::from(id);
  let issued_on = params.date.unwrap_or_else(|| chrono::Local::now().date_naive());

  let cert = {
    let state = session.ready().await?;
    let child = state.child(&id).ok_or_else(|| not_found(&id))?;
    Certificate::new(child, &state.settings, issued_on)
  };

  let disposition = format!("attachment; filename=\"{}\"", ascii_file_name(&cert.file_name()));
  Ok((
    [
      (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
      (header::CONTENT_DISPOSITION, disposition),
    ],
    cert.render(),
  ))
}

/// Header-safe version of `name`: anything outside printable ASCII, and
/// quotes, become `_`.
fn ascii_file_name(name: &str) -> String {
  name
    .chars()
    .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
    .collect()
}
