use super::*;

fn app(id: u64, status: &str, is_protected: bool) -> ProtectedApp {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": format!("app-{id}"),
        "backend": "10.0.0.5",
        "protocol": "http",
        "port": 8080,
        "status": status,
        "isProtected": is_protected,
    }))
    .unwrap()
}

fn list() -> ProtectedAppList {
    ProtectedAppList { apps: vec![app(1, "running", true), app(2, "stopped", false)], total: 2 }
}

#[test]
fn delete_removes_row_and_decrements_total() {
    let mut apps = list();
    apply_action(&mut apps, 1, AppAction::Delete, AppResponse::default());
    assert_eq!(apps.apps.len(), 1);
    assert_eq!(apps.apps[0].id, 2);
    assert_eq!(apps.total, 1);
}

#[test]
fn delete_of_unknown_id_keeps_total() {
    let mut apps = list();
    apply_action(&mut apps, 9, AppAction::Delete, AppResponse::default());
    assert_eq!(apps.total, 2);
}

#[test]
fn toggle_replaces_row_with_backend_copy() {
    let mut apps = list();
    let response = AppResponse { message: "ok".to_owned(), app: Some(app(2, "running", true)) };
    apply_action(&mut apps, 2, AppAction::ToggleStatus, response);
    assert_eq!(apps.apps[1].status, "running");
    assert!(apps.apps[1].is_protected);
    assert_eq!(apps.total, 2);
}

#[test]
fn toggle_without_app_in_response_changes_nothing() {
    let mut apps = list();
    apply_action(&mut apps, 1, AppAction::ToggleProtection, AppResponse::default());
    assert_eq!(apps, list());
}

#[test]
fn labels_render_status_and_endpoint() {
    let running = app(1, "running", true);
    assert_eq!(status_label(&running), "Running");
    assert_eq!(status_label(&app(1, "stopped", false)), "Stopped");
    assert_eq!(status_label(&app(1, "", false)), "-");
    assert_eq!(endpoint_label(&running), "http://10.0.0.5:8080");
}

#[test]
fn row_link_and_name_come_from_the_same_app() {
    let app = app(7, "running", true);
    let href = detail_href(app.id);
    let name = app.name.clone();
    assert_eq!(href, "/protected-apps/7");
    assert_eq!(name, "app-7");
    assert_eq!(endpoint_label(&app), "http://10.0.0.5:8080");
}
