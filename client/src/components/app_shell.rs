//! Authenticated page chrome: navigation sidebar, operator badge and logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected page renders inside `AppShell`, so logout and navigation
//! behave the same everywhere. The login page does not use it.

#[cfg(test)]
#[path = "app_shell_test.rs"]
mod app_shell_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::net::api::ApiClient;
use crate::routes::LOGIN_PATH;

/// Sidebar entries as `(href, label)`.
pub const NAV_ITEMS: &[(&str, &str)] = &[
    ("/", "Dashboard"),
    ("/access-logs", "Access Logs"),
    ("/attack-logs", "Attack Logs"),
    ("/firewall-config", "Firewall"),
    ("/protected-apps", "Protected Apps"),
];

/// Label shown for the signed-in operator.
#[must_use]
pub fn operator_label(username: Option<&str>, role: Option<&str>) -> String {
    match (username, role.filter(|r| !r.is_empty())) {
        (Some(name), Some(role)) => format!("{name} ({role})"),
        (Some(name), None) => name.to_owned(),
        (None, _) => "operator".to_owned(),
    }
}

#[component]
pub fn AppShell(title: &'static str, children: Children) -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let navigate = use_navigate();
    let busy = RwSignal::new(false);

    let profile = api.session().profile();
    let operator = operator_label(
        profile.as_ref().map(|u| u.username.as_str()),
        profile.as_ref().map(|u| u.role.as_str()),
    );

    let on_logout = move |_| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                api.sign_out().await;
                navigate(LOGIN_PATH, leptos_router::NavigateOptions::default());
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, &navigate, LOGIN_PATH);
        }
    };

    view! {
        <div class="app-shell">
            <nav class="app-shell__nav">
                <div class="app-shell__brand">"WAF Console"</div>
                <ul>
                    {NAV_ITEMS
                        .iter()
                        .map(|(href, label)| {
                            view! {
                                <li>
                                    <A href=*href>{*label}</A>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </nav>
            <main class="app-shell__main">
                <header class="app-shell__header toolbar">
                    <h1 class="toolbar__title">{title}</h1>
                    <span class="toolbar__spacer"></span>
                    <span class="toolbar__self">{operator}</span>
                    <button class="btn toolbar__logout" on:click=on_logout disabled=move || busy.get()>
                        "Logout"
                    </button>
                </header>
                <section class="app-shell__content">{children()}</section>
            </main>
        </div>
    }
}
