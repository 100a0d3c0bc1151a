use super::*;

#[test]
fn parse_app_id_accepts_numbers_only() {
    assert_eq!(parse_app_id(Some("12")), Some(12));
    assert_eq!(parse_app_id(Some("add")), None);
    assert_eq!(parse_app_id(Some("-1")), None);
    assert_eq!(parse_app_id(None), None);
}

#[test]
fn feature_rows_follow_app_flags() {
    let app: ProtectedApp = serde_json::from_value(serde_json::json!({
        "id": 3,
        "name": "nas",
        "backend": "127.0.0.1",
        "protocol": "https",
        "port": 5001,
        "isProtected": true,
        "ccProtection": true,
        "dynamicProtection": true,
    }))
    .unwrap();
    let rows = feature_rows(&app);
    assert_eq!(rows[0], ("Protection active", true));
    assert_eq!(rows[2], ("Bot protection", false));
    assert_eq!(rows[4], ("Dynamic protection", true));
}
