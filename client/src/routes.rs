//! Static route table and the navigation-time session guard.
//!
//! DESIGN
//! ======
//! The table is plain data so guard decisions can be computed (and tested)
//! without a router. `app.rs` mirrors these paths in its `<Routes>` block and
//! `util::auth::install_route_guard` feeds every location change through
//! [`on_navigate`].

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Lazily rendered view behind a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
    AccessLogs,
    AttackLogs,
    FirewallConfig,
    ProtectedApps,
    AddProtectedApp,
    ProtectedAppDetail,
}

/// Static metadata describing one navigable path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Pattern with `:name` parameter segments.
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub requires_auth: bool,
}

impl RouteDescriptor {
    const fn protected(path: &'static str, name: &'static str, view: View) -> Self {
        Self { path, name, view, requires_auth: true }
    }
}

/// Every known route. Only `/login` is public.
pub const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor { path: LOGIN_PATH, name: "Login", view: View::Login, requires_auth: false },
    RouteDescriptor::protected(HOME_PATH, "Dashboard", View::Dashboard),
    RouteDescriptor::protected("/access-logs", "AccessLogs", View::AccessLogs),
    RouteDescriptor::protected("/attack-logs", "AttackLogs", View::AttackLogs),
    RouteDescriptor::protected("/firewall-config", "FirewallConfig", View::FirewallConfig),
    RouteDescriptor::protected("/protected-apps", "ProtectedApps", View::ProtectedApps),
    RouteDescriptor::protected("/protected-apps/add", "AddProtectedApp", View::AddProtectedApp),
    RouteDescriptor::protected("/protected-apps/:id", "ProtectedAppDetail", View::ProtectedAppDetail),
];

/// Outcome of the guard for a single navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Redirect(&'static str),
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty())
}

/// Match `path` against a pattern. Returns the number of static segments
/// matched, used to rank static routes above parameter routes.
fn match_pattern(pattern: &str, path: &str) -> Option<usize> {
    let mut pat = segments(pattern);
    let mut actual = segments(path);
    let mut statics = 0;
    loop {
        match (pat.next(), actual.next()) {
            (None, None) => return Some(statics),
            (Some(p), Some(a)) => {
                if p.starts_with(':') {
                    continue;
                }
                if p != a {
                    return None;
                }
                statics += 1;
            }
            _ => return None,
        }
    }
}

/// Find the route serving `path`. Query strings, fragments and trailing
/// slashes are ignored; static segments win over parameters.
#[must_use]
pub fn resolve(path: &str) -> Option<&'static RouteDescriptor> {
    ROUTES
        .iter()
        .filter_map(|r| match_pattern(r.path, path).map(|score| (score, r)))
        .max_by_key(|(score, _)| *score)
        .map(|(_, r)| r)
}

/// Decide whether navigation to `target` may proceed.
///
/// `current` is the path being left (empty on first load). It does not
/// influence the outcome and is only logged.
#[must_use]
pub fn on_navigate(target: &str, current: &str, authenticated: bool) -> Decision {
    let decision = match resolve(target) {
        None => Decision::Redirect(LOGIN_PATH),
        Some(route) if route.requires_auth && !authenticated => Decision::Redirect(LOGIN_PATH),
        Some(route) if route.view == View::Login && authenticated => Decision::Redirect(HOME_PATH),
        Some(_) => Decision::Proceed,
    };
    leptos::logging::debug_warn!("route guard: {current:?} -> {target:?} = {decision:?}");
    decision
}
