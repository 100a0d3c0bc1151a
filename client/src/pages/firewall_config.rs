//! Firewall configuration page: protection rules, rate limiting, blacklist.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each panel loads its own backend resource and writes back through the
//! matching `POST` endpoint. Input is validated locally before any request
//! leaves the browser; the backend still re-validates.

#[cfg(test)]
#[path = "firewall_config_test.rs"]
mod firewall_config_test;

use std::collections::BTreeMap;
use std::net::IpAddr;

use leptos::prelude::*;

use crate::components::app_shell::AppShell;
use crate::net::api::ApiClient;
use crate::net::types::{BlacklistAction, ProtectionRules, RateLimitWindow, RateLimiting};
use crate::state::remote::Remote;
use crate::util::load::spawn_load;

/// Parse the rate-limit form fields into a window.
pub(crate) fn parse_rate_limit(window: &str, max_requests: &str) -> Result<RateLimitWindow, String> {
    let positive = |raw: &str, field: &str| {
        raw.trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("{field} must be a positive whole number."))
    };
    Ok(RateLimitWindow { window: positive(window, "Window")?, max_requests: positive(max_requests, "Max requests")? })
}

/// Normalize an IPv4/IPv6 address typed by the operator.
pub(crate) fn validate_ip(raw: &str) -> Result<String, String> {
    raw.trim()
        .parse::<IpAddr>()
        .map(|ip| ip.to_string())
        .map_err(|_| format!("\"{}\" is not a valid IP address.", raw.trim()))
}

/// One pattern per line; blank lines are dropped.
pub(crate) fn parse_patterns(raw: &str) -> Vec<String> {
    raw.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_owned).collect()
}

/// Build the single-category update posted to `/protection-rules`.
pub(crate) fn rule_update(category: &str, patterns: &str) -> Result<BTreeMap<String, Vec<String>>, String> {
    let category = category.trim();
    if category.is_empty() {
        return Err("Enter a rule category.".to_owned());
    }
    let patterns = parse_patterns(patterns);
    if patterns.is_empty() {
        return Err("Enter at least one pattern.".to_owned());
    }
    Ok(BTreeMap::from([(category.to_owned(), patterns)]))
}

#[component]
pub fn FirewallConfigPage() -> impl IntoView {
    view! {
        <AppShell title="Firewall Configuration">
            <div class="firewall-page">
                <RulesPanel/>
                <RateLimitPanel/>
                <BlacklistPanel/>
            </div>
        </AppShell>
    }
}

#[component]
fn RulesPanel() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let rules = RwSignal::new(Remote::<ProtectionRules>::default());
    let category = RwSignal::new(String::new());
    let patterns = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<String>);

    {
        let api = api.clone();
        spawn_load(rules, async move { api.protection_rules().await });
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let update = match rule_update(&category.get_untracked(), &patterns.get_untracked()) {
            Ok(update) => update,
            Err(message) => {
                notice.set(Some(message));
                return;
            }
        };
        notice.set(None);
        let api = api.clone();
        spawn_load(rules, async move { api.update_protection_rules(&update).await });
        category.set(String::new());
        patterns.set(String::new());
    };

    view! {
        <section class="panel">
            <h2>"Protection rules"</h2>
            <Show when=move || rules.with(|r| r.error().is_some())>
                <p class="page-error">{move || rules.with(|r| r.error().unwrap_or_default().to_owned())}</p>
            </Show>
            <Show when=move || !rules.with(Remote::is_loading) fallback=|| view! { <p>"Loading rules..."</p> }>
                <dl class="rule-list">
                    {move || {
                        rules.with(|r| {
                            r.ready()
                                .map(|r| {
                                    r.rules
                                        .iter()
                                        .map(|(name, list)| {
                                            let name = name.clone();
                                            let list = list.join(", ");
                                            view! {
                                                <dt>{name}</dt>
                                                <dd><code>{list}</code></dd>
                                            }
                                        })
                                        .collect_view()
                                })
                        })
                    }}
                </dl>
            </Show>
            <form class="panel__form" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Category (e.g. sql_injection)"
                    prop:value=move || category.get()
                    on:input=move |ev| category.set(event_target_value(&ev))
                />
                <textarea
                    placeholder="One pattern per line"
                    prop:value=move || patterns.get()
                    on:input=move |ev| patterns.set(event_target_value(&ev))
                ></textarea>
                <button class="btn" type="submit">"Save rules"</button>
            </form>
            <Show when=move || notice.get().is_some()>
                <p class="form-error">{move || notice.get().unwrap_or_default()}</p>
            </Show>
        </section>
    }
}

#[component]
fn RateLimitPanel() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let limits = RwSignal::new(Remote::<RateLimiting>::default());
    let window = RwSignal::new(String::new());
    let max_requests = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<String>);

    {
        let api = api.clone();
        spawn_load(limits, async move { api.rate_limiting().await });
    }

    // Seed the form from the first successful load.
    Effect::new(move || {
        limits.with(|l| {
            if let Some(l) = l.ready() {
                window.set(l.window.to_string());
                max_requests.set(l.max_requests.to_string());
            }
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match parse_rate_limit(&window.get_untracked(), &max_requests.get_untracked()) {
            Ok(update) => {
                notice.set(None);
                let api = api.clone();
                spawn_load(limits, async move { api.update_rate_limiting(update).await });
            }
            Err(message) => notice.set(Some(message)),
        }
    };

    view! {
        <section class="panel">
            <h2>"Rate limiting"</h2>
            <Show when=move || limits.with(|l| l.error().is_some())>
                <p class="page-error">{move || limits.with(|l| l.error().unwrap_or_default().to_owned())}</p>
            </Show>
            <form class="panel__form" on:submit=on_submit>
                <label>
                    "Window (seconds)"
                    <input
                        type="number"
                        min="1"
                        prop:value=move || window.get()
                        on:input=move |ev| window.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Max requests per window"
                    <input
                        type="number"
                        min="1"
                        prop:value=move || max_requests.get()
                        on:input=move |ev| max_requests.set(event_target_value(&ev))
                    />
                </label>
                <button class="btn" type="submit">"Apply"</button>
            </form>
            <Show when=move || notice.get().is_some()>
                <p class="form-error">{move || notice.get().unwrap_or_default()}</p>
            </Show>
            <table class="data-table">
                <thead>
                    <tr><th>"Client IP"</th><th>"Requests in window"</th></tr>
                </thead>
                <tbody>
                    {move || {
                        limits.with(|l| {
                            l.ready()
                                .map(|l| {
                                    l.current_usage
                                        .iter()
                                        .map(|(ip, count)| {
                                            let ip = ip.clone();
                                            let count = count.to_string();
                                            view! { <tr><td>{ip}</td><td>{count}</td></tr> }
                                        })
                                        .collect_view()
                                })
                        })
                    }}
                </tbody>
            </table>
        </section>
    }
}

#[component]
fn BlacklistPanel() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let ip = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<String>);
    let entries = RwSignal::new(Vec::<String>::new());

    let submit = StoredValue::new(move |action: BlacklistAction| {
        let api = api.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match api.update_blacklist(&action).await {
                Ok(response) => {
                    entries.set(response.blacklist);
                    notice.set(Some(response.message).filter(|m| !m.is_empty()));
                }
                Err(e) => notice.set(Some(e.to_string())),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (api, action, entries);
        }
    });

    let with_ip = move |make: fn(String) -> BlacklistAction| match validate_ip(&ip.get_untracked()) {
        Ok(addr) => {
            ip.set(String::new());
            submit.with_value(|send| send(make(addr)));
        }
        Err(message) => notice.set(Some(message)),
    };

    view! {
        <section class="panel">
            <h2>"Blacklist"</h2>
            <div class="panel__form">
                <input
                    type="text"
                    placeholder="IP address"
                    prop:value=move || ip.get()
                    on:input=move |ev| ip.set(event_target_value(&ev))
                />
                <button class="btn" on:click=move |_| with_ip(|ip| BlacklistAction::Add { ip })>"Block"</button>
                <button class="btn" on:click=move |_| with_ip(|ip| BlacklistAction::Remove { ip })>"Unblock"</button>
                <button class="btn btn--danger" on:click=move |_| submit.with_value(|send| send(BlacklistAction::Clear))>
                    "Clear all"
                </button>
            </div>
            <Show when=move || notice.get().is_some()>
                <p class="form-notice">{move || notice.get().unwrap_or_default()}</p>
            </Show>
            <ul class="blacklist">
                {move || entries.get().into_iter().map(|ip| view! { <li>{ip}</li> }).collect_view()}
            </ul>
        </section>
    }
}
