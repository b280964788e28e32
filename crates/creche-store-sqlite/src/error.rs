//! Error type for `creche-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] creche_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error in column {column}: {value:?}")]
  DateParse { column: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
