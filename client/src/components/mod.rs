//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the console chrome, stat tiles and log tables. They read
//! the API client from Leptos context and never touch storage directly.

pub mod app_shell;
pub mod log_table;
pub mod stat_card;
