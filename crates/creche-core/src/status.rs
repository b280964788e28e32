//! Payment status engine.
//!
//! Classification depends only on the amount stored for a (child, month)
//! slot compared to the monthly fee. There is no overpaid state: anything at
//! or above the fee is fully paid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  child::ChildId,
  payment::{Amount, Payment, PaymentHistory, Period},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
  #[serde(alias = "Non payé")]
  Unpaid,
  #[serde(alias = "Reste à payer")]
  PartiallyPaid,
  #[serde(alias = "Payé")]
  FullyPaid,
}

impl PaymentStatus {
  pub fn label(self) -> &'static str {
    match self {
      Self::Unpaid => "Non payé",
      Self::PartiallyPaid => "Reste à payer",
      Self::FullyPaid => "Payé",
    }
  }
}

/// The status of one slot together with what is still owed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
  pub status:       PaymentStatus,
  pub label:        &'static str,
  pub remaining:    Amount,
  pub amount_paid:  Option<Amount>,
  pub payment_date: Option<NaiveDate>,
}

/// Classify a possibly-absent payment against `fee`.
pub fn classify(payment: Option<&Payment>, fee: Amount) -> StatusReport {
  let (status, remaining) = match payment {
    None => (PaymentStatus::Unpaid, fee),
    Some(p) if p.amount_paid >= fee => (PaymentStatus::FullyPaid, 0),
    Some(p) => (PaymentStatus::PartiallyPaid, fee - p.amount_paid),
  };

  StatusReport {
    status,
    label: status.label(),
    remaining,
    amount_paid: payment.map(|p| p.amount_paid),
    payment_date: payment.map(|p| p.payment_date),
  }
}

/// Status of `child` for `period` according to `history`.
pub fn status_for(
  history: &PaymentHistory,
  child: &ChildId,
  period: Period,
  fee: Amount,
) -> StatusReport {
  classify(history.get(child, period), fee)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::payment::MONTHLY_FEE;

  fn period() -> Period { Period::new(2024, 3).unwrap() }

  fn record(history: &mut PaymentHistory, amount: Amount) {
    history.upsert(
      Payment::new(
        ChildId::from("c"),
        period(),
        amount,
        NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
      )
      .unwrap(),
    );
  }

  #[test]
  fn absent_payment_is_unpaid_with_full_fee_due() {
    let report = classify(None, MONTHLY_FEE);
    assert_eq!(report.status, PaymentStatus::Unpaid);
    assert_eq!(report.remaining, MONTHLY_FEE);
    assert!(report.amount_paid.is_none());
  }

  #[test]
  fn zero_amount_record_is_partial_not_unpaid() {
    let mut history = PaymentHistory::new();
    record(&mut history, 0);
    let report = status_for(&history, &ChildId::from("c"), period(), MONTHLY_FEE);
    assert_eq!(report.status, PaymentStatus::PartiallyPaid);
    assert_eq!(report.remaining, MONTHLY_FEE);
  }

  #[test]
  fn boundary_amounts() {
    for (amount, status, remaining) in [
      (MONTHLY_FEE - 1, PaymentStatus::PartiallyPaid, 1),
      (MONTHLY_FEE, PaymentStatus::FullyPaid, 0),
      (MONTHLY_FEE + 5000, PaymentStatus::FullyPaid, 0),
    ] {
      let mut history = PaymentHistory::new();
      record(&mut history, amount);
      let report = status_for(&history, &ChildId::from("c"), period(), MONTHLY_FEE);
      assert_eq!((report.status, report.remaining), (status, remaining), "amount {amount}");
    }
  }

  #[test]
  fn status_follows_the_latest_record_for_the_slot() {
    let child = ChildId::from("c");
    let mut history = PaymentHistory::new();

    let report = status_for(&history, &child, period(), MONTHLY_FEE);
    assert_eq!((report.status, report.remaining), (PaymentStatus::Unpaid, 10_000));

    record(&mut history, 6000);
    let report = status_for(&history, &child, period(), MONTHLY_FEE);
    assert_eq!((report.status, report.remaining), (PaymentStatus::PartiallyPaid, 4000));
    assert_eq!(report.label, "Reste à payer");

    record(&mut history, 10_000);
    let report = status_for(&history, &child, period(), MONTHLY_FEE);
    assert_eq!((report.status, report.remaining), (PaymentStatus::FullyPaid, 0));
    assert_eq!(history.for_child(&child).len(), 1);
  }

  #[test]
  fn status_accepts_french_labels() {
    let s: PaymentStatus = serde_json::from_str("\"Reste à payer\"").unwrap();
    assert_eq!(s, PaymentStatus::PartiallyPaid);
    let s: PaymentStatus = serde_json::from_str("\"fully_paid\"").unwrap();
    assert_eq!(s, PaymentStatus::FullyPaid);
  }
}
