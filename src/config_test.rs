use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_uses_defaults_when_unset() {
    let cfg = Config::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.backend_url, DEFAULT_BACKEND_URL);
    assert_eq!(cfg.proxy_timeout, Duration::from_secs(DEFAULT_PROXY_TIMEOUT_SECS));
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = Config::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("BACKEND_URL", "https://waf.internal:9000/"),
        ("PROXY_TIMEOUT_SECS", " 5 "),
    ]))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.backend_url, "https://waf.internal:9000");
    assert_eq!(cfg.proxy_timeout, Duration::from_secs(5));
}

#[test]
fn from_lookup_rejects_bad_port() {
    let err = Config::from_lookup(lookup(&[("PORT", "70000")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidPort("70000".to_owned()));
}

#[test]
fn from_lookup_rejects_non_http_backend() {
    let err = Config::from_lookup(lookup(&[("BACKEND_URL", "ftp://files.local")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBackendUrl { .. }));
    assert!(err.to_string().contains("scheme must be http or https"));
}

#[test]
fn from_lookup_rejects_unparseable_backend() {
    let err = Config::from_lookup(lookup(&[("BACKEND_URL", "localhost:8009")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBackendUrl { .. }));
}

#[test]
fn from_lookup_rejects_zero_timeout() {
    let err = Config::from_lookup(lookup(&[("PROXY_TIMEOUT_SECS", "0")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidTimeout("0".to_owned()));
}
