//! Client state modules.
//!
//! `auth` owns the persisted session; `remote` is the per-request load state
//! pages keep in signals.

pub mod auth;
pub mod remote;
