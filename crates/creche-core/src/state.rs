//! Session state and its pure update function.
//!
//! Every change to the in-memory copy of the backend goes through
//! [`AppState::apply`], which consumes the previous state and returns the
//! next one. Events are only emitted after the backend accepted the change.

use serde::Serialize;

use crate::{
  child::{Child, ChildId},
  payment::{Payment, PaymentHistory, PaymentKey},
  settings::FacilitySettings,
};

/// Outcome of the most recent initial load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum LoadState {
  /// Nothing has been fetched yet.
  #[default]
  Idle,
  Ready,
  /// The backend could not be reached; retrying the load is the only way
  /// out.
  Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
  pub children: Vec<Child>,
  pub payments: PaymentHistory,
  pub settings: FacilitySettings,
  pub load:     LoadState,
}

#[derive(Debug, Clone)]
pub enum Event {
  /// The initial fetch succeeded. `settings: None` means no settings row
  /// exists yet.
  Loaded {
    children: Vec<Child>,
    payments: PaymentHistory,
    settings: Option<FacilitySettings>,
  },
  LoadFailed(String),
  /// The roster was re-fetched after a child was created or edited.
  ChildrenRefetched(Vec<Child>),
  ChildRemoved(ChildId),
  PaymentRecorded(Payment),
  PaymentRemoved(PaymentKey),
  SettingsSaved(FacilitySettings),
}

impl AppState {
  pub fn apply(mut self, event: Event) -> Self {
    match event {
      Event::Loaded { children, payments, settings } => {
        self.children = children;
        self.payments = payments;
        self.settings = settings.unwrap_or_default();
        self.load = LoadState::Ready;
      }
      Event::LoadFailed(message) => {
        self.load = LoadState::Failed(message);
      }
      Event::ChildrenRefetched(children) => {
        self.children = children;
      }
      Event::ChildRemoved(id) => {
        self.children.retain(|c| c.id != id);
        self.payments.remove_child(&id);
      }
      Event::PaymentRecorded(payment) => {
        self.payments.upsert(payment);
      }
      Event::PaymentRemoved(key) => {
        self.payments.remove(&key);
      }
      Event::SettingsSaved(settings) => {
        self.settings = settings;
      }
    }
    self
  }

  pub fn is_ready(&self) -> bool { self.load == LoadState::Ready }

  pub fn child(&self, id: &ChildId) -> Option<&Child> { self.children.iter().find(|c| &c.id == id) }
}
