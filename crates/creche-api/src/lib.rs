//! JSON REST API for the crèche manager.
//!
//! Exposes an axum [`Router`] over a [`Session`], which serves reads from
//! memory and writes through to any [`creche_core::store::CrecheStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", creche_api::api_router(session.clone()))
//! ```

pub mod certificate;
pub mod children;
pub mod dashboard;
pub mod error;
pub mod payments;
pub mod session;
pub mod settings;
pub mod status;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use creche_core::store::CrecheStore;

pub use error::ApiError;
pub use session::Session;

/// Build the API router for `session`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(session: Arc<Session<S>>) -> Router<()>
where
  S: CrecheStore + 'static,
{
  Router::new()
    // Session
    .route("/status", get(status::get::<S>))
    .route("/reload", post(status::reload::<S>))
    // Children
    .route("/children", get(children::list::<S>).post(children::create::<S>))
    .route(
      "/children/{id}",
      get(children::get_one::<S>)
        .put(children::update::<S>)
        .delete(children::delete_one::<S>),
    )
    .route("/children/{id}/payments", get(children::payments::<S>))
    .route("/children/{id}/certificate", get(certificate::handler::<S>))
    // Payments
    .route("/payments", get(payments::overview::<S>).put(payments::record::<S>))
    .route("/payments/{child_id}/{year}/{month}", delete(payments::remove::<S>))
    // Settings & reporting
    .route("/settings", get(settings::get::<S>).put(settings::put::<S>))
    .route("/dashboard", get(dashboard::handler::<S>))
    .with_state(session)
}

#[cfg(test)]
mod tests;
