//! Error types for `creche-core`.

use thiserror::Error;

use crate::child::ChildId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("child not found: {0}")]
  ChildNotFound(ChildId),

  #[error("month index out of range (expected 0-11): {0}")]
  InvalidMonth(u32),

  #[error("amount paid cannot be negative: {0}")]
  NegativeAmount(i64),

  #[error("amount paid exceeds {max}: {0}", max = crate::payment::MAX_AMOUNT)]
  AmountTooLarge(i64),

  #[error("{0} must not be blank")]
  BlankField(&'static str),

  #[error("unknown section: {0:?}")]
  UnknownSection(String),

  #[error("unknown gender: {0:?}")]
  UnknownGender(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
