//! School-year labelling.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// 0-based index of September, the first month of a school year.
const SCHOOL_YEAR_START_MONTH0: u32 = 8;

/// A school year running from September of `start` to the summer of
/// `start + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcademicYear {
  pub start: i32,
}

impl AcademicYear {
  /// The school year in progress on `date`.
  pub fn containing(date: NaiveDate) -> Self {
    if date.month0() >= SCHOOL_YEAR_START_MONTH0 {
      Self { start: date.year() }
    } else {
      Self { start: date.year() - 1 }
    }
  }
}

impl fmt::Display for AcademicYear {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.start, self.start + 1)
  }
}
