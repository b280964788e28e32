//! The `CrecheStore` trait, the persistence gateway.
//!
//! Implemented by storage backends (`creche-store-rest` for the hosted
//! database, `creche-store-sqlite` for local use). The API layer depends on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  child::{Child, ChildId},
  payment::{Payment, PaymentKey},
  settings::FacilitySettings,
};

/// Backing store of children, payments and settings. Futures are `Send`
/// so handlers can await them on a multi-threaded runtime.
pub trait CrecheStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Children ──────────────────────────────────────────────────────────

  /// Every child, ordered by family name ascending.
  fn list_children(&self) -> impl Future<Output = Result<Vec<Child>, Self::Error>> + Send + '_;

  /// Insert `child`, or replace the row with the same id.
  fn upsert_child(&self, child: Child) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete the child and every payment recorded for it. Deleting an
  /// unknown id is not an error.
  fn delete_child(&self, id: ChildId) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Payments ──────────────────────────────────────────────────────────

  fn list_payments(&self) -> impl Future<Output = Result<Vec<Payment>, Self::Error>> + Send + '_;

  /// Insert `payment`, replacing any payment for the same
  /// (child, year, month).
  fn upsert_payment(
    &self,
    payment: Payment,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_payment(
    &self,
    key: PaymentKey,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  /// The settings row, or `None` if it was never saved.
  fn get_settings(
    &self,
  ) -> impl Future<Output = Result<Option<FacilitySettings>, Self::Error>> + Send + '_;

  fn put_settings(
    &self,
    settings: FacilitySettings,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
