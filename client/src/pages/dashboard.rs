//! Dashboard page: live traffic and attack counters plus IPv6 share.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. It loads `/status` and
//! `/ipv6-stats` on mount and then polls `/status` while the page is alive.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::components::app_shell::AppShell;
use crate::components::stat_card::StatCard;
use crate::net::api::ApiClient;
use crate::net::types::{Ipv6Stats, LiveStatus};
use crate::state::remote::Remote;
use crate::util::format::format_percent;
use crate::util::load::{spawn_load, spawn_refresh};

/// Seconds between background status refreshes.
pub const STATUS_POLL_SECS: u64 = 10;

/// `"X of Y requests"` caption for the IPv6 panel.
pub(crate) fn ipv6_summary(stats: &Ipv6Stats) -> String {
    format!("{} of {} requests", stats.ipv6_count, stats.total_count)
}

/// Share of recent traffic that was blocked, in percent.
pub(crate) fn recent_attack_rate(status: &LiveStatus) -> f64 {
    if status.recent_accesses == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = status.recent_attacks as f64 / status.recent_accesses as f64 * 100.0;
    rate
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let status = RwSignal::new(Remote::<LiveStatus>::default());
    let ipv6 = RwSignal::new(Remote::<Ipv6Stats>::default());

    {
        let api = api.clone();
        spawn_load(status, async move { api.status().await });
    }
    {
        let api = api.clone();
        spawn_load(ipv6, async move { api.ipv6_stats().await });
    }

    #[cfg(feature = "hydrate")]
    {
        let poll_alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        let poll_alive_task = poll_alive.clone();
        let api = api.clone();
        leptos::task::spawn_local(async move {
            loop {
                gloo_timers::future::sleep(std::time::Duration::from_secs(STATUS_POLL_SECS)).await;
                if !poll_alive_task.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                let api = api.clone();
                spawn_refresh(status, async move { api.status().await });
            }
        });
        on_cleanup(move || poll_alive.store(false, std::sync::atomic::Ordering::Relaxed));
    }

    let on_refresh = move |_| {
        let status_api = api.clone();
        spawn_refresh(status, async move { status_api.status().await });
        let ipv6_api = api.clone();
        spawn_refresh(ipv6, async move { ipv6_api.ipv6_stats().await });
    };

    let stat = move |pick: fn(&LiveStatus) -> String| {
        Signal::derive(move || status.with(|s| s.ready().map(pick).unwrap_or_else(|| "-".to_owned())))
    };

    let ipv6_stat = move |pick: fn(&Ipv6Stats) -> String| {
        Signal::derive(move || ipv6.with(|s| s.ready().map(pick).unwrap_or_else(|| "-".to_owned())))
    };

    view! {
        <AppShell title="Dashboard">
            <div class="dashboard-page">
                <div class="dashboard-page__actions">
                    <button class="btn" on:click=on_refresh>"Refresh"</button>
                </div>
                <Show when=move || status.with(|s| s.error().is_some())>
                    <p class="page-error">{move || status.with(|s| s.error().unwrap_or_default().to_owned())}</p>
                </Show>
                <Show when=move || status.with(Remote::is_loading)>
                    <p>"Loading status..."</p>
                </Show>
                <div class="dashboard-page__cards">
                    <StatCard label="Total requests" value=stat(|s| s.total_accesses.to_string())/>
                    <StatCard label="Total attacks" value=stat(|s| s.total_attacks.to_string()) accent="danger"/>
                    <StatCard label="Recent requests" value=stat(|s| s.recent_accesses.to_string())/>
                    <StatCard label="Recent attacks" value=stat(|s| s.recent_attacks.to_string()) accent="danger"/>
                    <StatCard label="Recent attack rate" value=stat(|s| format_percent(recent_attack_rate(s)))/>
                    <StatCard label="IPv6 requests" value=ipv6_stat(ipv6_summary)/>
                    <StatCard label="IPv6 share" value=ipv6_stat(|s| format_percent(s.ipv6_percentage))/>
                    <StatCard
                        label="Blacklisted IPs"
                        value=stat(|s| s.blacklist_count.map_or_else(|| "-".to_owned(), |n| n.to_string()))
                    />
                </div>
                <Show when=move || status.with(|s| s.ready().and_then(|s| s.rate_limit).is_some())>
                    <p class="dashboard-page__note">
                        {move || {
                            status
                                .with(|s| s.ready().and_then(|s| s.rate_limit))
                                .map(|r| format!("Rate limit: {} requests per {}s", r.max_requests, r.window))
                                .unwrap_or_default()
                        }}
                    </p>
                </Show>
            </div>
        </AppShell>
    }
}
