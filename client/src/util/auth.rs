//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation goes through one guard so all routes apply identical
//! redirect behavior. The guard itself is the pure `routes::on_navigate`;
//! this module binds it to the router and to the browser location.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::routes::{Decision, on_navigate};
use crate::state::auth::SessionStore;

/// Guard redirects replace the history entry so "back" never lands on a
/// page the guard already refused.
#[must_use]
pub fn redirect_options() -> NavigateOptions {
    NavigateOptions { replace: true, ..NavigateOptions::default() }
}

/// True only when the guard's last approval is for the path now shown.
pub(crate) fn path_allowed(approved: Option<&str>, current: &str) -> bool {
    approved == Some(current)
}

/// Gate signal over the path the guard last approved. It turns false on
/// the same tick the location changes, before the guard has re-run.
pub(crate) fn approval_gate(approved: RwSignal<Option<String>>, pathname: Signal<String>) -> Memo<bool> {
    Memo::new(move |_| approved.with(|a| pathname.with(|p| path_allowed(a.as_deref(), p))))
}

/// Run the session guard whenever `pathname` changes.
///
/// Returns a signal that is `true` once the current path has been allowed.
/// It starts `false` on both server and client so hydration output matches.
pub fn install_route_guard<F>(session: SessionStore, pathname: Memo<String>, navigate: F) -> Memo<bool>
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let approved = RwSignal::new(None::<String>);
    let previous = StoredValue::new(String::new());
    Effect::new(move || {
        let target = pathname.get();
        let current = previous.get_value();
        match on_navigate(&target, &current, session.is_authenticated()) {
            Decision::Proceed => {
                previous.set_value(target.clone());
                approved.set(Some(target));
            }
            Decision::Redirect(to) => {
                approved.set(None);
                navigate(to, redirect_options());
            }
        }
    });
    approval_gate(approved, pathname.into())
}

/// Full session reset: leave the single-page app for `path`, dropping every
/// in-memory signal, cache and pending task.
pub fn hard_redirect(path: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = path;
    }
}
