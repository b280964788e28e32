//! Error type for `creche-store-rest`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] creche_core::Error),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The backend answered with a non-success status.
  #[error("{method} {table} → {status}: {message}")]
  Status {
    method:  &'static str,
    table:   &'static str,
    status:  reqwest::StatusCode,
    message: String,
  },

  #[error("date parse error in column {column}: {value:?}")]
  DateParse { column: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
