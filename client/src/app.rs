//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Redirect, Route, Router, Routes},
    hooks::{use_location, use_navigate},
};

use crate::net::api::ApiClient;
use crate::pages::{
    dashboard::DashboardPage,
    firewall_config::FirewallConfigPage,
    login::LoginPage,
    logs::{AccessLogsPage, AttackLogsPage},
    protected_app_add::AddProtectedAppPage,
    protected_app_detail::ProtectedAppDetailPage,
    protected_apps::ProtectedAppsPage,
};
use crate::routes::LOGIN_PATH;
use crate::state::auth::SessionStore;
use crate::util::auth::install_route_guard;
use crate::util::storage::LocalStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session store and API client, then mounts the guarded router.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = SessionStore::new(LocalStorage);
    provide_context(session.clone());
    provide_context(ApiClient::for_browser(session));

    view! {
        <Stylesheet id="leptos" href="/pkg/wafboard.css"/>
        <Title text="WAF Console"/>

        <Router>
            <GuardedRoutes/>
        </Router>
    }
}

/// Whether the session guard has allowed the current path.
#[derive(Clone, Copy)]
struct RouteGate(Memo<bool>);

/// Route outlet. The table is always rendered so the server can discover
/// every path; each page is held back by [`Gate`] until the guard allows it.
#[component]
fn GuardedRoutes() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let allowed = install_route_guard(session, use_location().pathname, use_navigate());
    provide_context(RouteGate(allowed));

    view! {
        <Routes fallback=|| view! { <Redirect path=LOGIN_PATH/> }>
            <Route path=StaticSegment("login") view=|| view! { <Gate><LoginPage/></Gate> }/>
            <Route path=StaticSegment("") view=|| view! { <Gate><DashboardPage/></Gate> }/>
            <Route path=StaticSegment("access-logs") view=|| view! { <Gate><AccessLogsPage/></Gate> }/>
            <Route path=StaticSegment("attack-logs") view=|| view! { <Gate><AttackLogsPage/></Gate> }/>
            <Route path=StaticSegment("firewall-config") view=|| view! { <Gate><FirewallConfigPage/></Gate> }/>
            <Route path=StaticSegment("protected-apps") view=|| view! { <Gate><ProtectedAppsPage/></Gate> }/>
            <Route
                path=(StaticSegment("protected-apps"), StaticSegment("add"))
                view=|| view! { <Gate><AddProtectedAppPage/></Gate> }
            />
            <Route
                path=(StaticSegment("protected-apps"), ParamSegment("id"))
                view=|| view! { <Gate><ProtectedAppDetailPage/></Gate> }
            />
        </Routes>
    }
}

/// Render `children` only once the guard has allowed the current path.
#[component]
fn Gate(children: ChildrenFn) -> impl IntoView {
    let RouteGate(allowed) = expect_context::<RouteGate>();
    view! {
        <Show when=move || allowed.get() fallback=|| view! { <p class="route-pending">"Loading..."</p> }>
            {children()}
        </Show>
    }
}
