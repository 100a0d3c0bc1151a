//! Wire DTOs for the monitoring backend's REST API.
//!
//! DESIGN
//! ======
//! The backend has shipped several response shapes over time (some fields
//! only appear on newer builds), so optional fields default rather than fail
//! deserialization. Field names mirror the JSON exactly.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// AUTH
// =============================================================================

/// Successful `POST /auth/login` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// The signed-in operator as returned by `GET /auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub role: String,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Error body; the backend puts a human-readable reason in `detail`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best human-readable reason carried by the body.
    #[must_use]
    pub fn reason(self) -> Option<String> {
        self.detail.or(self.message)
    }
}

// =============================================================================
// LOGS
// =============================================================================

/// IP geolocation attached to a log entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub loc: String,
    #[serde(default)]
    pub org: String,
}

/// One access or attack log line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Seconds since the Unix epoch (fractional).
    pub timestamp: f64,
    pub ip: String,
    #[serde(default)]
    pub is_ipv6: bool,
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub is_attack: bool,
    #[serde(default)]
    pub attack_message: Option<String>,
    #[serde(default)]
    pub is_blacklisted: bool,
    /// `"allowed"` or `"blocked"` on newer backends.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub geolocation: Option<GeoLocation>,
}

impl LogEntry {
    /// `City, Country` when geolocation is known.
    #[must_use]
    pub fn location_label(&self) -> Option<String> {
        let geo = self.geolocation.as_ref()?;
        match (geo.city.is_empty(), geo.country.is_empty()) {
            (true, true) => None,
            (false, true) => Some(geo.city.clone()),
            (true, false) => Some(geo.country.clone()),
            (false, false) => Some(format!("{}, {}", geo.city, geo.country)),
        }
    }
}

/// `GET /access-logs` and `GET /attack-logs` body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogPage {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub total: u64,
}

// =============================================================================
// STATS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ipv6Stats {
    pub ipv6_count: u64,
    pub total_count: u64,
    /// Percentage rounded to two decimals by the backend.
    pub ipv6_percentage: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitWindow {
    pub window: u64,
    pub max_requests: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicProtection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub html_encryption: bool,
    #[serde(default)]
    pub js_encryption: bool,
}

/// `GET /status` body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveStatus {
    pub total_accesses: u64,
    pub total_attacks: u64,
    pub recent_accesses: u64,
    pub recent_attacks: u64,
    pub ipv6_stats: Ipv6Stats,
    #[serde(default)]
    pub blacklist_count: Option<u64>,
    #[serde(default)]
    pub rate_limit: Option<RateLimitWindow>,
    #[serde(default)]
    pub dynamic_protection: Option<DynamicProtection>,
}

// =============================================================================
// FIREWALL CONFIGURATION
// =============================================================================

/// `GET /protection-rules` body: pattern lists keyed by rule category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionRules {
    #[serde(default)]
    pub rules: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `GET /rate-limiting` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiting {
    pub window: u64,
    pub max_requests: u64,
    /// Requests per client IP inside the current window.
    #[serde(default)]
    pub current_usage: BTreeMap<String, u64>,
}

/// `POST /blacklist` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum BlacklistAction {
    Add { ip: String },
    Remove { ip: String },
    Clear,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

// =============================================================================
// PROTECTED APPLICATIONS
// =============================================================================

/// A backend application placed behind the firewall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedApp {
    pub id: u64,
    pub name: String,
    pub backend: String,
    pub protocol: String,
    pub port: u16,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub is_protected: bool,
    #[serde(default)]
    pub cc_protection: bool,
    #[serde(default)]
    pub bot_protection: bool,
    #[serde(default)]
    pub auth_protection: bool,
    #[serde(default)]
    pub dynamic_protection: bool,
    #[serde(default)]
    pub cc_rate_limit: u32,
    #[serde(default)]
    pub cc_penalty_time: u32,
    #[serde(default)]
    pub requests_count: u64,
    #[serde(default)]
    pub attacks_count: u64,
    #[serde(default, rename = "created_at")]
    pub created_at: Option<f64>,
}

/// `GET /protected-apps` body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectedAppList {
    #[serde(default)]
    pub apps: Vec<ProtectedApp>,
    #[serde(default)]
    pub total: u64,
}

/// `POST /protected-apps` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProtectedApp {
    pub name: String,
    pub backend: String,
    pub protocol: String,
    pub port: u16,
    pub cc_protection: bool,
    pub bot_protection: bool,
    pub auth_protection: bool,
    pub dynamic_protection: bool,
    pub cc_rate_limit: u32,
    pub cc_penalty_time: u32,
}

impl Default for NewProtectedApp {
    fn default() -> Self {
        Self {
            name: String::new(),
            backend: String::new(),
            protocol: "http".to_owned(),
            port: 80,
            cc_protection: true,
            bot_protection: true,
            auth_protection: false,
            dynamic_protection: false,
            cc_rate_limit: 100,
            cc_penalty_time: 5,
        }
    }
}

/// Lifecycle action posted to `POST /protected-apps/{id}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum AppAction {
    Delete,
    ToggleProtection,
    ToggleStatus,
}

/// Acknowledgement for app create/update; `app` is absent after delete.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub app: Option<ProtectedApp>,
}
