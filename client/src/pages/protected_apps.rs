//! Protected applications list with per-row lifecycle actions.

#[cfg(test)]
#[path = "protected_apps_test.rs"]
mod protected_apps_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::app_shell::AppShell;
use crate::net::api::ApiClient;
use crate::net::types::{AppAction, AppResponse, ProtectedApp, ProtectedAppList};
use crate::state::remote::Remote;
use crate::util::load::spawn_load;

/// Apply the backend's answer to an action on the cached list.
pub(crate) fn apply_action(list: &mut ProtectedAppList, id: u64, action: AppAction, response: AppResponse) {
    match (action, response.app) {
        (AppAction::Delete, _) => {
            let before = list.apps.len();
            list.apps.retain(|app| app.id != id);
            if list.apps.len() < before {
                list.total = list.total.saturating_sub(1);
            }
        }
        (_, Some(updated)) => {
            if let Some(slot) = list.apps.iter_mut().find(|app| app.id == id) {
                *slot = updated;
            }
        }
        (_, None) => {}
    }
}

/// Running/stopped badge text; falls back to the raw status code.
#[must_use]
pub fn status_label(app: &ProtectedApp) -> String {
    match app.status.as_str() {
        "running" => "Running".to_owned(),
        "stopped" => "Stopped".to_owned(),
        "" => "-".to_owned(),
        other => other.to_owned(),
    }
}

/// Link target for one row.
#[must_use]
pub fn detail_href(id: u64) -> String {
    format!("/protected-apps/{id}")
}

#[must_use]
pub fn endpoint_label(app: &ProtectedApp) -> String {
    format!("{}://{}:{}", app.protocol, app.backend, app.port)
}

#[component]
pub fn ProtectedAppsPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let apps = RwSignal::new(Remote::<ProtectedAppList>::default());
    let action_error = RwSignal::new(None::<String>);

    {
        let api = api.clone();
        spawn_load(apps, async move { api.protected_apps().await });
    }

    let run_action = StoredValue::new(move |id: u64, action: AppAction| {
        let api = api.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match api.protected_app_action(id, action).await {
                Ok(response) => {
                    action_error.set(None);
                    apps.update(|state| {
                        if let Remote::Ready(list) = state {
                            apply_action(list, id, action, response);
                        }
                    });
                }
                Err(e) => action_error.set(Some(e.to_string())),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (api, id, action);
        }
    });

    view! {
        <AppShell title="Protected Apps">
            <div class="apps-page">
                <div class="apps-page__actions">
                    <A href="/protected-apps/add">"Add application"</A>
                </div>
                <Show when=move || action_error.get().is_some()>
                    <p class="page-error">{move || action_error.get().unwrap_or_default()}</p>
                </Show>
                <Show when=move || apps.with(|a| a.error().is_some())>
                    <p class="page-error">{move || apps.with(|a| a.error().unwrap_or_default().to_owned())}</p>
                </Show>
                <Show when=move || !apps.with(Remote::is_loading) fallback=|| view! { <p>"Loading applications..."</p> }>
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Backend"</th>
                                <th>"Status"</th>
                                <th>"Protected"</th>
                                <th>"Requests"</th>
                                <th>"Attacks"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || {
                                apps.with(|a| a.ready().map(|l| l.apps.clone()).unwrap_or_default())
                                    .into_iter()
                                    .map(|app| {
                                        let id = app.id;
                                        let href = detail_href(id);
                                        let name = app.name.clone();
                                        let act = move |action| run_action.with_value(|run| run(id, action));
                                        view! {
                                            <tr>
                                                <td><A href=href>{name}</A></td>
                                                <td>{endpoint_label(&app)}</td>
                                                <td>{status_label(&app)}</td>
                                                <td>{if app.is_protected { "yes" } else { "no" }}</td>
                                                <td>{app.requests_count}</td>
                                                <td>{app.attacks_count}</td>
                                                <td class="data-table__actions">
                                                    <button class="btn" on:click=move |_| act(AppAction::ToggleProtection)>
                                                        {if app.is_protected { "Unprotect" } else { "Protect" }}
                                                    </button>
                                                    <button class="btn" on:click=move |_| act(AppAction::ToggleStatus)>
                                                        {if app.status == "running" { "Stop" } else { "Start" }}
                                                    </button>
                                                    <button class="btn btn--danger" on:click=move |_| act(AppAction::Delete)>
                                                        "Delete"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </tbody>
                    </table>
                </Show>
            </div>
        </AppShell>
    }
}
