//! Access-log and attack-log pages.
//!
//! Both pages share one view; they differ only in endpoint, title and whether
//! the attack reason column is shown.

#[cfg(test)]
#[path = "logs_test.rs"]
mod logs_test;

use leptos::prelude::*;

use crate::components::app_shell::AppShell;
use crate::components::log_table::{LIMIT_CHOICES, LogTable};
use crate::net::api::{ApiClient, DEFAULT_LOG_LIMIT};
use crate::net::types::LogPage;
use crate::state::remote::Remote;
use crate::util::load::spawn_load;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKind {
    Access,
    Attack,
}

impl LogKind {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Access => "Access Logs",
            Self::Attack => "Attack Logs",
        }
    }
}

/// Parse the limit selector value, falling back to the default.
pub(crate) fn parse_limit(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_LOG_LIMIT)
}

/// `"showing X of Y"` summary line.
pub(crate) fn summary(page: &LogPage) -> String {
    format!("Showing {} of {} entries", page.logs.len(), page.total)
}

fn load(api: &ApiClient, kind: LogKind, limit: u32, target: RwSignal<Remote<LogPage>>) {
    let api = api.clone();
    spawn_load(target, async move {
        match kind {
            LogKind::Access => api.access_logs(Some(limit)).await,
            LogKind::Attack => api.attack_logs(Some(limit)).await,
        }
    });
}

#[component]
fn LogsView(kind: LogKind) -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let limit = RwSignal::new(DEFAULT_LOG_LIMIT);
    let page = RwSignal::new(Remote::<LogPage>::default());

    load(&api, kind, limit.get_untracked(), page);

    let api_for_limit = api.clone();
    let on_limit = move |ev| {
        let value = parse_limit(&event_target_value(&ev));
        limit.set(value);
        load(&api_for_limit, kind, value, page);
    };
    let on_refresh = move |_| load(&api, kind, limit.get_untracked(), page);

    let entries = Signal::derive(move || page.with(|p| p.ready().map(|p| p.logs.clone()).unwrap_or_default()));

    view! {
        <AppShell title=kind.title()>
            <div class="logs-page">
                <div class="logs-page__controls">
                    <label>
                        "Show "
                        <select on:change=on_limit prop:value=move || limit.get().to_string()>
                            {LIMIT_CHOICES
                                .iter()
                                .map(|n| view! { <option value=n.to_string()>{n.to_string()}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    <button class="btn" on:click=on_refresh>"Refresh"</button>
                    <span class="logs-page__summary">
                        {move || page.with(|p| p.ready().map(summary).unwrap_or_default())}
                    </span>
                </div>
                <Show when=move || page.with(|p| p.error().is_some())>
                    <p class="page-error">{move || page.with(|p| p.error().unwrap_or_default().to_owned())}</p>
                </Show>
                <Show
                    when=move || !page.with(Remote::is_loading)
                    fallback=|| view! { <p>"Loading logs..."</p> }
                >
                    <LogTable entries=entries show_reason=kind == LogKind::Attack/>
                </Show>
            </div>
        </AppShell>
    }
}

#[component]
pub fn AccessLogsPage() -> impl IntoView {
    view! { <LogsView kind=LogKind::Access/> }
}

#[component]
pub fn AttackLogsPage() -> impl IntoView {
    view! { <LogsView kind=LogKind::Attack/> }
}
