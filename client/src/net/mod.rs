//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` is the authenticated request pipeline, `transport` performs the
//! browser fetch, `error` defines call failures and `types` the wire schema.

pub mod api;
#[cfg(any(test, feature = "hydrate"))]
mod deadline;
pub mod error;
#[cfg(feature = "hydrate")]
mod transport;
pub mod types;
