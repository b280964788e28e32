//! Roster filtering for the children and payments listings.

use serde::Deserialize;

use crate::{
  child::{Child, Section},
  payment::{Amount, PaymentHistory, Period},
  status::{PaymentStatus, status_for},
};

/// Criteria applied to the roster; unset fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterFilter {
  /// Case-insensitive substring of "family given".
  pub search:  Option<String>,
  pub section: Option<Section>,
  /// Only children whose status for the selected period is this one.
  pub status:  Option<PaymentStatus>,
}

impl RosterFilter {
  /// Children matching the filter, in roster order. `period` and `fee` are
  /// only consulted when a status criterion is set.
  pub fn apply<'a>(
    &self,
    children: &'a [Child],
    history: &PaymentHistory,
    period: Period,
    fee: Amount,
  ) -> Vec<&'a Child> {
    let needle = self
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_lowercase);

    children
      .iter()
      .filter(|child| {
        needle
          .as_ref()
          .is_none_or(|n| child.full_name().to_lowercase().contains(n.as_str()))
      })
      .filter(|child| self.section.is_none_or(|s| child.section == s))
      .filter(|child| {
        self
          .status
          .is_none_or(|s| status_for(history, &child.id, period, fee).status == s)
      })
      .collect()
  }
}
