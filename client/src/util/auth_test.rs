use super::*;

#[test]
fn guard_redirects_replace_history() {
    assert!(redirect_options().replace);
}

#[test]
fn guard_redirects_keep_scroll_default() {
    let defaults = NavigateOptions::default();
    assert_eq!(redirect_options().scroll, defaults.scroll);
    assert_eq!(redirect_options().resolve, defaults.resolve);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn hard_redirect_is_noop_outside_browser() {
    hard_redirect("/login");
}

#[test]
fn approval_only_covers_the_approved_path() {
    assert!(path_allowed(Some("/"), "/"));
    assert!(!path_allowed(Some("/"), "/access-logs"));
    assert!(!path_allowed(None, "/login"));
}

#[test]
fn gate_closes_as_soon_as_the_path_changes() {
    let owner = Owner::new();
    owner.with(|| {
        let approved = RwSignal::new(Some("/".to_owned()));
        let pathname = RwSignal::new("/".to_owned());
        let gate = approval_gate(approved, pathname.into());
        assert!(gate.get_untracked());

        pathname.set("/firewall-config".to_owned());
        assert!(!gate.get_untracked(), "new path must wait for the guard");

        approved.set(Some("/firewall-config".to_owned()));
        assert!(gate.get_untracked());
    });
}
