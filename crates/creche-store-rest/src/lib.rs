//! Hosted-database backend for the crèche store.
//!
//! Talks to a PostgREST endpoint (as exposed by Supabase) over HTTPS with
//! [`reqwest`]. Tables and columns keep their French names on the wire;
//! the `rows` module maps them onto the domain types.

mod rows;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{RestConfig, RestStore};
