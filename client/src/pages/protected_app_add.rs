//! Form for registering a new protected application.

#[cfg(test)]
#[path = "protected_app_add_test.rs"]
mod protected_app_add_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use crate::components::app_shell::AppShell;
use crate::net::api::ApiClient;
use crate::net::types::NewProtectedApp;

pub const PROTOCOLS: [&str; 2] = ["http", "https"];

/// Raw form input; numbers stay text until submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppDraft {
    pub name: String,
    pub backend: String,
    pub protocol: String,
    pub port: String,
    pub cc_protection: bool,
    pub bot_protection: bool,
    pub auth_protection: bool,
    pub dynamic_protection: bool,
    pub cc_rate_limit: String,
    pub cc_penalty_time: String,
}

impl Default for AppDraft {
    fn default() -> Self {
        let base = NewProtectedApp::default();
        Self {
            name: base.name,
            backend: base.backend,
            protocol: base.protocol,
            port: base.port.to_string(),
            cc_protection: base.cc_protection,
            bot_protection: base.bot_protection,
            auth_protection: base.auth_protection,
            dynamic_protection: base.dynamic_protection,
            cc_rate_limit: base.cc_rate_limit.to_string(),
            cc_penalty_time: base.cc_penalty_time.to_string(),
        }
    }
}

impl AppDraft {
    /// Validate the draft into a request body.
    ///
    /// # Errors
    ///
    /// Returns the first problem as an operator-facing message.
    pub fn build(&self) -> Result<NewProtectedApp, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Application name is required.".to_owned());
        }
        let backend = self.backend.trim();
        if backend.is_empty() {
            return Err("Backend address is required.".to_owned());
        }
        let protocol = self.protocol.trim().to_ascii_lowercase();
        if !PROTOCOLS.contains(&protocol.as_str()) {
            return Err("Protocol must be http or https.".to_owned());
        }
        let port = self
            .port
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| "Port must be between 1 and 65535.".to_owned())?;
        let cc_rate_limit = positive(&self.cc_rate_limit, "CC rate limit")?;
        let cc_penalty_time = positive(&self.cc_penalty_time, "CC penalty time")?;
        Ok(NewProtectedApp {
            name: name.to_owned(),
            backend: backend.to_owned(),
            protocol,
            port,
            cc_protection: self.cc_protection,
            bot_protection: self.bot_protection,
            auth_protection: self.auth_protection,
            dynamic_protection: self.dynamic_protection,
            cc_rate_limit,
            cc_penalty_time,
        })
    }
}

fn positive(raw: &str, field: &str) -> Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("{field} must be a positive whole number."))
}

#[component]
pub fn AddProtectedAppPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();
    let draft = RwSignal::new(AppDraft::default());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let body = match draft.with_untracked(AppDraft::build) {
            Ok(body) => body,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        error.set(None);
        busy.set(true);
        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match api.add_protected_app(&body).await {
                    Ok(_) => navigate("/protected-apps", leptos_router::NavigateOptions::default()),
                    Err(e) => {
                        error.set(Some(e.to_string()));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, body);
        }
    };

    let text = move |label: &'static str, get: fn(&AppDraft) -> &String, set: fn(&mut AppDraft, String)| {
        view! {
            <label>
                {label}
                <input
                    type="text"
                    prop:value=move || draft.with(|d| get(d).clone())
                    on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
                />
            </label>
        }
    };
    let flag = move |label: &'static str, get: fn(&AppDraft) -> bool, set: fn(&mut AppDraft, bool)| {
        view! {
            <label class="checkbox">
                <input
                    type="checkbox"
                    prop:checked=move || draft.with(get)
                    on:change=move |ev| draft.update(|d| set(d, event_target_checked(&ev)))
                />
                {label}
            </label>
        }
    };

    view! {
        <AppShell title="Add Protected App">
            <form class="app-form" on:submit=on_submit>
                {text("Name", |d| &d.name, |d, v| d.name = v)}
                {text("Backend host", |d| &d.backend, |d, v| d.backend = v)}
                <label>
                    "Protocol"
                    <select
                        prop:value=move || draft.with(|d| d.protocol.clone())
                        on:change=move |ev| draft.update(|d| d.protocol = event_target_value(&ev))
                    >
                        {PROTOCOLS.iter().map(|p| view! { <option value=*p>{*p}</option> }).collect_view()}
                    </select>
                </label>
                {text("Port", |d| &d.port, |d, v| d.port = v)}
                {flag("CC protection", |d| d.cc_protection, |d, v| d.cc_protection = v)}
                {flag("Bot protection", |d| d.bot_protection, |d, v| d.bot_protection = v)}
                {flag("Auth protection", |d| d.auth_protection, |d, v| d.auth_protection = v)}
                {flag("Dynamic protection", |d| d.dynamic_protection, |d, v| d.dynamic_protection = v)}
                {text("CC rate limit (requests)", |d| &d.cc_rate_limit, |d, v| d.cc_rate_limit = v)}
                {text("CC penalty time (minutes)", |d| &d.cc_penalty_time, |d, v| d.cc_penalty_time = v)}
                <Show when=move || error.get().is_some()>
                    <p class="form-error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                    "Add application"
                </button>
            </form>
        </AppShell>
    }
}
