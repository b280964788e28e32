//! [`Session`]: the in-memory copy of the roster, payments and settings,
//! kept in step with the store.
//!
//! Every mutation goes to the store first. Only when the store accepts it is
//! the matching [`Event`] applied, so a failed write leaves the session as it
//! was. Reads are served from memory and require a successful load.

use tokio::sync::{RwLock, RwLockReadGuard};

use creche_core::{
  child::{Child, ChildId},
  payment::{Amount, Payment, PaymentHistory, PaymentKey},
  settings::FacilitySettings,
  state::{AppState, Event, LoadState},
  store::CrecheStore,
};

use crate::error::ApiError;

pub struct Session<S> {
  store: S,
  fee:   Amount,
  state: RwLock<AppState>,
}

impl<S: CrecheStore> Session<S> {
  /// A session that has not loaded anything yet. Call [`Session::load`].
  pub fn new(store: S, fee: Amount) -> Self {
    Self { store, fee, state: RwLock::new(AppState::default()) }
  }

  pub fn store(&self) -> &S { &self.store }

  /// Tuition due per child per month.
  pub fn fee(&self) -> Amount { self.fee }

  pub async fn load_state(&self) -> LoadState { self.state.read().await.load.clone() }

  /// Read access to the loaded data, or [`ApiError::Unavailable`] when the
  /// load has not succeeded.
  pub async fn ready(&self) -> Result<RwLockReadGuard<'_, AppState>, ApiError> {
    let state = self.state.read().await;
    match &state.load {
      LoadState::Ready => Ok(state),
      LoadState::Idle => Err(ApiError::Unavailable("data not loaded yet".into())),
      LoadState::Failed(message) => Err(ApiError::Unavailable(message.clone())),
    }
  }

  async fn ensure_ready(&self) -> Result<(), ApiError> {
    self.ready().await.map(drop)
  }

  async fn apply(&self, event: Event) {
    let mut state = self.state.write().await;
    *state = std::mem::take(&mut *state).apply(event);
  }

  // ── Load ──────────────────────────────────────────────────────────────────

  /// Fetch children, payments and settings from the store.
  ///
  /// A failure on any of the three marks the session failed; it stays that
  /// way until a later `load` succeeds. A missing settings row is not a
  /// failure and yields the defaults.
  pub async fn load(&self) -> Result<(), ApiError> {
    match self.fetch_all().await {
      Ok((children, payments, settings)) => {
        tracing::info!(
          children = children.len(),
          payments = payments.len(),
          settings = if settings.is_some() { "stored" } else { "default" },
          "data loaded"
        );
        self.apply(Event::Loaded { children, payments, settings }).await;
        Ok(())
      }
      Err(e) => {
        let message = format!("failed to load data: {e}");
        tracing::warn!(error = %e, "load failed");
        self.apply(Event::LoadFailed(message.clone())).await;
        Err(ApiError::Unavailable(message))
      }
    }
  }

  async fn fetch_all(
    &self,
  ) -> Result<(Vec<Child>, PaymentHistory, Option<FacilitySettings>), S::Error> {
    let children = self.store.list_children().await?;
    let payments = self.store.list_payments().await?.into_iter().collect();
    let settings = self.store.get_settings().await?;
    Ok((children, payments, settings))
  }

  // ── Children ──────────────────────────────────────────────────────────────

  /// Insert or replace `child`, then refresh the roster from the store so
  /// its ordering matches the backend.
  pub async fn save_child(&self, child: Child) -> Result<Child, ApiError> {
    self.ensure_ready().await?;
    child.validate()?;

    self
      .store
      .upsert_child(child.clone())
      .await
      .map_err(ApiError::store)?;
    let children = self.store.list_children().await.map_err(ApiError::store)?;

    tracing::info!(child = %child.id, "child saved");
    self.apply(Event::ChildrenRefetched(children)).await;
    Ok(child)
  }

  /// Remove the child and its payment history.
  pub async fn delete_child(&self, id: ChildId) -> Result<(), ApiError> {
    if self.ready().await?.child(&id).is_none() {
      return Err(creche_core::Error::ChildNotFound(id).into());
    }

    self
      .store
      .delete_child(id.clone())
      .await
      .map_err(ApiError::store)?;

    tracing::info!(child = %id, "child deleted");
    self.apply(Event::ChildRemoved(id)).await;
    Ok(())
  }

  // ── Payments ──────────────────────────────────────────────────────────────

  /// Record `payment`, replacing any payment for the same month.
  pub async fn record_payment(&self, payment: Payment) -> Result<(), ApiError> {
    if self.ready().await?.child(&payment.child_id).is_none() {
      return Err(creche_core::Error::ChildNotFound(payment.child_id).into());
    }
    payment.validate()?;

    self
      .store
      .upsert_payment(payment.clone())
      .await
      .map_err(ApiError::store)?;

    tracing::info!(
      child = %payment.child_id,
      year = payment.year,
      month = payment.month,
      amount = payment.amount_paid,
      "payment recorded"
    );
    self.apply(Event::PaymentRecorded(payment)).await;
    Ok(())
  }

  pub async fn remove_payment(&self, key: PaymentKey) -> Result<(), ApiError> {
    self.ensure_ready().await?;

    self
      .store
      .delete_payment(key.clone())
      .await
      .map_err(ApiError::store)?;

    tracing::info!(child = %key.child_id, period = ?key.period, "payment removed");
    self.apply(Event::PaymentRemoved(key)).await;
    Ok(())
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  pub async fn save_settings(&self, settings: FacilitySettings) -> Result<(), ApiError> {
    self.ensure_ready().await?;
    settings.validate()?;

    self
      .store
      .put_settings(settings.clone())
      .await
      .map_err(ApiError::store)?;

    tracing::info!("settings saved");
    self.apply(Event::SettingsSaved(settings)).await;
    Ok(())
  }
}
