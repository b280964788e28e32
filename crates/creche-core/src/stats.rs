//! Dashboard aggregation, recomputed from scratch on every call.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  child::{Child, Gender, Section},
  payment::{Amount, PaymentHistory, Period},
};

/// Length of the collection history shown on the dashboard.
pub const HISTORY_MONTHS: usize = 6;

/// Smallest bar height, so months with nothing collected stay visible.
pub const MIN_BAR_HEIGHT: u32 = 4;

/// Height of the full-scale bar in the serialized dashboard.
pub const CHART_HEIGHT: u32 = 100;

// ─── Headcount ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount<C> {
  pub category: C,
  pub count:    usize,
  /// `count / total` as a rounded percentage; 0 when there are no children.
  pub percent:  u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Headcount {
  pub total:      usize,
  pub by_section: Vec<CategoryCount<Section>>,
  pub by_gender:  Vec<CategoryCount<Gender>>,
}

pub fn percent(count: usize, total: usize) -> u32 {
  if total == 0 {
    return 0;
  }
  (count as f64 / total as f64 * 100.0).round() as u32
}

impl Headcount {
  pub fn compute(children: &[Child]) -> Self {
    let total = children.len();
    let tally = |count: usize| (count, percent(count, total));

    let by_section = Section::all()
      .into_iter()
      .map(|section| {
        let (count, percent) = tally(children.iter().filter(|c| c.section == section).count());
        CategoryCount { category: section, count, percent }
      })
      .collect();

    let by_gender = Gender::all()
      .into_iter()
      .map(|gender| {
        let (count, percent) = tally(children.iter().filter(|c| c.gender == gender).count());
        CategoryCount { category: gender, count, percent }
      })
      .collect();

    Self { total, by_section, by_gender }
  }
}

// ─── Revenue ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
  pub period:      Period,
  pub collected:   Amount,
  pub expected:    Amount,
  /// `expected - collected`; negative only if children over-paid.
  pub outstanding: Amount,
}

impl MonthlyRevenue {
  pub fn compute(children: &[Child], history: &PaymentHistory, period: Period, fee: Amount) -> Self {
    let collected = history.collected(children.iter().map(|c| &c.id), period);
    let expected = (children.len() as Amount).saturating_mul(fee);
    Self { period, collected, expected, outstanding: expected.saturating_sub(collected) }
  }
}

// ─── History ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryBar {
  pub period: Period,
  pub label:  String,
  pub amount: Amount,
  /// `amount` relative to the best month of the window, in `0.0..=1.0`.
  pub ratio:  f64,
  /// Bar height on a [`CHART_HEIGHT`] scale.
  pub height: u32,
}

/// Bar height in a chart `full` units tall, never below [`MIN_BAR_HEIGHT`].
pub fn bar_height(ratio: f64, full: u32) -> u32 {
  ((ratio * full as f64).round() as u32).max(MIN_BAR_HEIGHT)
}

/// Totals collected over the [`HISTORY_MONTHS`] months ending at `current`,
/// oldest first.
pub fn collection_history(
  children: &[Child],
  history: &PaymentHistory,
  current: Period,
) -> Vec<HistoryBar> {
  let totals: Vec<(Period, Amount)> = current
    .trailing(HISTORY_MONTHS)
    .into_iter()
    .map(|period| (period, history.collected(children.iter().map(|c| &c.id), period)))
    .collect();

  let max = totals.iter().map(|(_, amount)| *amount).max().unwrap_or(0).max(1);

  totals
    .into_iter()
    .map(|(period, amount)| {
      let ratio = amount as f64 / max as f64;
      HistoryBar {
        period,
        label: period.short_label(),
        amount,
        ratio,
        height: bar_height(ratio, CHART_HEIGHT),
      }
    })
    .collect()
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
  pub headcount: Headcount,
  pub month:     MonthlyRevenue,
  pub history:   Vec<HistoryBar>,
}

impl Dashboard {
  /// Figures for the month containing `today`.
  pub fn compute(
    children: &[Child],
    history: &PaymentHistory,
    today: NaiveDate,
    fee: Amount,
  ) -> Self {
    let current = Period::of(today);
    Self {
      headcount: Headcount::compute(children),
      month:     MonthlyRevenue::compute(children, history, current, fee),
      history:   collection_history(children, history, current),
    }
  }
}
