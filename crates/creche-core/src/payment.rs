//! Monthly tuition payments and the per-child payment history.
//!
//! Months are 0-based indices (0 = January … 11 = December), matching what
//! the backend stores. At most one payment exists per (child, year, month);
//! recording a second one replaces the first.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, child::ChildId};

/// A sum of money in whole dinars.
pub type Amount = i64;

/// Tuition due per child per calendar month.
pub const MONTHLY_FEE: Amount = 10_000;

pub const CURRENCY: &str = "DA";

/// Largest amount a single payment may record.
pub const MAX_AMOUNT: Amount = 1_000_000_000;

pub const MONTH_NAMES: [&str; 12] = [
  "Janvier", "Février", "Mars", "Avril", "Mai", "Juin", "Juillet", "Août", "Septembre",
  "Octobre", "Novembre", "Décembre",
];

// ─── Period ──────────────────────────────────────────────────────────────────

/// A calendar month. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
  year:  i32,
  month: u8,
}

impl Period {
  /// `month` is the 0-based month index.
  pub fn new(year: i32, month: u32) -> Result<Self> {
    if month > 11 {
      return Err(Error::InvalidMonth(month));
    }
    Ok(Self { year, month: month as u8 })
  }

  /// The period containing `date`.
  pub fn of(date: NaiveDate) -> Self {
    Self { year: date.year(), month: date.month0() as u8 }
  }

  pub fn year(self) -> i32 { self.year }

  pub fn month(self) -> u8 { self.month }

  pub fn previous(self) -> Self {
    if self.month == 0 {
      Self { year: self.year - 1, month: 11 }
    } else {
      Self { year: self.year, month: self.month - 1 }
    }
  }

  /// The `n` most recent periods ending at (and including) `self`, oldest
  /// first.
  pub fn trailing(self, n: usize) -> Vec<Self> {
    let mut periods: Vec<Self> =
      std::iter::successors(Some(self), |p| Some(p.previous())).take(n).collect();
    periods.reverse();
    periods
  }

  pub fn month_name(self) -> &'static str { MONTH_NAMES[self.month as usize] }

  /// First four characters of the month name, e.g. `Janv`, `Févr`.
  pub fn short_label(self) -> String { self.month_name().chars().take(4).collect() }
}

// ─── Payment ─────────────────────────────────────────────────────────────────

/// Identifies the single payment slot of a child for one month.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentKey {
  pub child_id: ChildId,
  pub period:   Period,
}

/// The amount recorded for one child for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
  pub child_id:     ChildId,
  pub year:         i32,
  /// 0-based month index.
  pub month:        u8,
  pub amount_paid:  Amount,
  pub payment_date: NaiveDate,
}

impl Payment {
  pub fn new(
    child_id: ChildId,
    period: Period,
    amount_paid: Amount,
    payment_date: NaiveDate,
  ) -> Result<Self> {
    let payment = Self {
      child_id,
      year: period.year,
      month: period.month,
      amount_paid,
      payment_date,
    };
    payment.validate()?;
    Ok(payment)
  }

  pub fn validate(&self) -> Result<()> {
    if self.month > 11 {
      return Err(Error::InvalidMonth(self.month.into()));
    }
    if self.amount_paid < 0 {
      return Err(Error::NegativeAmount(self.amount_paid));
    }
    if self.amount_paid > MAX_AMOUNT {
      return Err(Error::AmountTooLarge(self.amount_paid));
    }
    Ok(())
  }

  pub fn period(&self) -> Result<Period> { Period::new(self.year, self.month.into()) }

  pub fn key(&self) -> Result<PaymentKey> {
    Ok(PaymentKey { child_id: self.child_id.clone(), period: self.period()? })
  }
}

// ─── History ─────────────────────────────────────────────────────────────────

type YearMap = BTreeMap<i32, BTreeMap<u8, Payment>>;

/// Every recorded payment, keyed child id → year → month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentHistory(BTreeMap<ChildId, YearMap>);

impl PaymentHistory {
  pub fn new() -> Self { Self::default() }

  /// The payment recorded for `child` in `period`, if any.
  pub fn get(&self, child: &ChildId, period: Period) -> Option<&Payment> {
    self
      .0
      .get(child)
      .and_then(|years| years.get(&period.year))
      .and_then(|months| months.get(&period.month))
  }

  /// Amount recorded for `child` in `period`; zero when nothing is recorded.
  pub fn amount_for(&self, child: &ChildId, period: Period) -> Amount {
    self.get(child, period).map_or(0, |p| p.amount_paid)
  }

  /// Store `payment`, replacing whatever was recorded for the same slot.
  /// Returns the replaced payment.
  pub fn upsert(&mut self, payment: Payment) -> Option<Payment> {
    self
      .0
      .entry(payment.child_id.clone())
      .or_default()
      .entry(payment.year)
      .or_default()
      .insert(payment.month, payment)
  }

  pub fn remove(&mut self, key: &PaymentKey) -> Option<Payment> {
    let years = self.0.get_mut(&key.child_id)?;
    let months = years.get_mut(&key.period.year)?;
    let removed = months.remove(&key.period.month);

    if months.is_empty() {
      years.remove(&key.period.year);
    }
    if years.is_empty() {
      self.0.remove(&key.child_id);
    }
    removed
  }

  /// Drop every payment of `child`. Returns how many were removed.
  pub fn remove_child(&mut self, child: &ChildId) -> usize {
    self
      .0
      .remove(child)
      .map_or(0, |years| years.values().map(BTreeMap::len).sum())
  }

  /// Payments of `child`, oldest first.
  pub fn for_child(&self, child: &ChildId) -> Vec<&Payment> {
    self
      .0
      .get(child)
      .map(|years| years.values().flat_map(BTreeMap::values).collect())
      .unwrap_or_default()
  }

  /// Sum of the amounts recorded in `period` for the given children.
  pub fn collected<'a>(
    &self,
    children: impl IntoIterator<Item = &'a ChildId>,
    period: Period,
  ) -> Amount {
    children
      .into_iter()
      .map(|id| self.amount_for(id, period))
      .fold(0, Amount::saturating_add)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Payment> {
    self
      .0
      .values()
      .flat_map(BTreeMap::values)
      .flat_map(BTreeMap::values)
  }

  pub fn len(&self) -> usize { self.iter().count() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl FromIterator<Payment> for PaymentHistory {
  fn from_iter<I: IntoIterator<Item = Payment>>(iter: I) -> Self {
    let mut history = Self::new();
    for payment in iter {
      history.upsert(payment);
    }
    history
  }
}
