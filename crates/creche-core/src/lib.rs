//! Core types and trait definitions for the crèche manager.
//!
//! This crate holds the domain model, the payment status engine, the
//! dashboard aggregation and the reducer-style session state. It is free of
//! HTTP and database dependencies; storage backends implement
//! [`store::CrecheStore`].

pub mod child;
pub mod error;
pub mod payment;
pub mod roster;
pub mod settings;
pub mod state;
pub mod stats;
pub mod status;
pub mod store;

pub use error::{Error, Result};
