//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped loading and form state and delegates shared
//! chrome and tables to `components`.

pub mod dashboard;
pub mod firewall_config;
pub mod login;
pub mod logs;
pub mod protected_app_add;
pub mod protected_app_detail;
pub mod protected_apps;
