//! Detail view for one protected application.

#[cfg(test)]
#[path = "protected_app_detail_test.rs"]
mod protected_app_detail_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::components::app_shell::AppShell;
use crate::components::stat_card::StatCard;
use crate::net::api::ApiClient;
use crate::net::types::ProtectedApp;
use crate::pages::protected_apps::{endpoint_label, status_label};
use crate::state::remote::Remote;
use crate::util::format::format_timestamp;
use crate::util::load::spawn_load;

/// Numeric id from the `:id` route segment.
pub(crate) fn parse_app_id(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

/// `(label, enabled)` rows for the protection feature list.
pub(crate) fn feature_rows(app: &ProtectedApp) -> [(&'static str, bool); 5] {
    [
        ("Protection active", app.is_protected),
        ("CC protection", app.cc_protection),
        ("Bot protection", app.bot_protection),
        ("Auth protection", app.auth_protection),
        ("Dynamic protection", app.dynamic_protection),
    ]
}

#[component]
pub fn ProtectedAppDetailPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let params = use_params_map();
    let app = RwSignal::new(Remote::<ProtectedApp>::default());

    Effect::new(move || {
        let id = params.with(|p| parse_app_id(p.get_str("id")));
        match id {
            Some(id) => {
                let api = api.clone();
                spawn_load(app, async move { api.protected_app(id).await });
            }
            None => app.set(Remote::Failed("Unknown application id.".to_owned())),
        }
    });

    let field = move |pick: fn(&ProtectedApp) -> String| {
        Signal::derive(move || app.with(|a| a.ready().map(pick).unwrap_or_else(|| "-".to_owned())))
    };

    view! {
        <AppShell title="Protected App">
            <div class="app-detail">
                <A href="/protected-apps">"Back to list"</A>
                <Show when=move || app.with(|a| a.error().is_some())>
                    <p class="page-error">{move || app.with(|a| a.error().unwrap_or_default().to_owned())}</p>
                </Show>
                <Show when=move || app.with(|a| a.ready().is_some())>
                    <h2>{move || app.with(|a| a.ready().map(|a| a.name.clone()).unwrap_or_default())}</h2>
                    <div class="app-detail__cards">
                        <StatCard label="Backend" value=field(endpoint_label)/>
                        <StatCard label="Status" value=field(status_label)/>
                        <StatCard label="Requests" value=field(|a| a.requests_count.to_string())/>
                        <StatCard label="Attacks" value=field(|a| a.attacks_count.to_string()) accent="danger"/>
                        <StatCard
                            label="CC limit"
                            value=field(|a| format!("{} req / {} min penalty", a.cc_rate_limit, a.cc_penalty_time))
                        />
                        <StatCard
                            label="Created"
                            value=field(|a| a.created_at.map_or_else(|| "-".to_owned(), format_timestamp))
                        />
                    </div>
                    <ul class="app-detail__features">
                        {move || {
                            app.with(|a| {
                                a.ready()
                                    .map(|a| {
                                        feature_rows(a)
                                            .into_iter()
                                            .map(|(label, on)| {
                                                let class = if on { "feature feature--on" } else { "feature" };
                                                view! {
                                                    <li class=class>
                                                        {label}": "{if on { "enabled" } else { "disabled" }}
                                                    </li>
                                                }
                                            })
                                            .collect_view()
                                    })
                            })
                        }}
                    </ul>
                </Show>
            </div>
        </AppShell>
    }
}
