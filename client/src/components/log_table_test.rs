use super::*;

fn entry(path: &str) -> LogEntry {
    serde_json::from_value(serde_json::json!({
        "timestamp": 0.0, "ip": "127.0.0.1", "method": "GET", "path": path
    }))
    .unwrap()
}

#[test]
fn row_class_flags_attacks_and_blacklist() {
    let mut e = entry("/");
    assert_eq!(row_class(&e), "log-row");
    e.is_blacklisted = true;
    assert_eq!(row_class(&e), "log-row log-row--blacklisted");
    e.is_attack = true;
    assert_eq!(row_class(&e), "log-row log-row--blocked");
}

#[test]
fn row_class_honors_blocked_status() {
    let mut e = entry("/");
    e.status = Some("blocked".to_owned());
    assert_eq!(row_class(&e), "log-row log-row--blocked");
}

#[test]
fn newest_first_reverses_backend_order() {
    let ordered = newest_first(vec![entry("/a"), entry("/b"), entry("/c")]);
    let paths: Vec<_> = ordered.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["/c", "/b", "/a"]);
}

#[test]
fn limit_choices_include_default() {
    assert!(LIMIT_CHOICES.contains(&crate::net::api::DEFAULT_LOG_LIMIT));
}
