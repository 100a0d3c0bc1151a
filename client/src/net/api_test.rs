use std::sync::Mutex;

use super::*;
use crate::state::auth::{SESSION_KEYS, TOKEN_KEY, TOKEN_TYPE_KEY, USER_KEY};
use crate::util::storage::{KeyValueStore, MemoryStore};

/// Client over a fresh memory store that records every session reset.
fn client_with_resets() -> (ApiClient, MemoryStore, Arc<Mutex<Vec<String>>>) {
    let storage = MemoryStore::new();
    let resets = Arc::new(Mutex::new(Vec::new()));
    let sink = resets.clone();
    let reset: SessionReset = Arc::new(move |path: &str| sink.lock().unwrap().push(path.to_owned()));
    let client = ApiClient::new(ApiConfig::default(), SessionStore::new(storage.clone()), reset);
    (client, storage, resets)
}

type Sent = Arc<Mutex<Vec<PreparedRequest>>>;

/// Client whose transport answers from `respond` and records every request
/// it was handed.
fn scripted_client(
    respond: impl Fn(&PreparedRequest) -> Result<String, ApiError> + Send + Sync + 'static,
) -> (ApiClient, MemoryStore, Arc<Mutex<Vec<String>>>, Sent) {
    let (client, storage, resets) = client_with_resets();
    let sent: Sent = Arc::new(Mutex::new(Vec::new()));
    let log = sent.clone();
    let transport: Transport = Arc::new(move |request: PreparedRequest, _: Duration| -> TransportFuture {
        let result = respond(&request);
        log.lock().unwrap().push(request);
        Box::pin(async move { result })
    });
    (client.with_transport(transport), storage, resets, sent)
}

fn unauthorized() -> ApiError {
    ApiError::from_status(401, Some("Could not validate credentials".to_owned()))
}

const TOKEN_BODY: &str = r#"{"access_token":"abc","token_type":"bearer"}"#;
const USER_BODY: &str = r#"{"id":1,"username":"admin","role":"admin"}"#;
const STATUS_BODY: &str = r#"{
    "total_accesses": 10,
    "total_attacks": 2,
    "recent_accesses": 4,
    "recent_attacks": 1,
    "ipv6_stats": {"ipv6_count": 3, "total_count": 10, "ipv6_percentage": 30.0}
}"#;

fn sign_in_storage(storage: &MemoryStore, token: &str, kind: &str) {
    storage.set(TOKEN_KEY, token);
    storage.set(TOKEN_TYPE_KEY, kind);
    storage.set(USER_KEY, r#"{"id":1,"username":"admin","role":"admin"}"#);
}

fn credential(token: &str, kind: &str) -> Credential {
    Credential { token: token.to_owned(), kind: kind.to_owned() }
}

// =============================================================================
// Authorization header
// =============================================================================

#[test]
fn authorization_header_capitalizes_bearer() {
    assert_eq!(authorization_header(&credential("abc", "bearer")), "Bearer abc");
}

#[test]
fn authorization_header_recapitalizes_custom_kind() {
    assert_eq!(authorization_header(&credential("xyz", "CUSTOM")), "Custom xyz");
}

#[test]
fn authorization_header_keeps_already_capitalized_kind() {
    assert_eq!(authorization_header(&credential("t", "Bearer")), "Bearer t");
}

// =============================================================================
// URL + body shaping
// =============================================================================

#[test]
fn endpoint_url_joins_base_and_query() {
    assert_eq!(endpoint_url("/api", "/access-logs", &[("limit", "100")]), "/api/access-logs?limit=100");
    assert_eq!(endpoint_url("/api/", "status", &[]), "/api/status");
}

#[test]
fn form_body_encodes_reserved_characters() {
    assert_eq!(
        form_body(&[("username", "admin"), ("password", "a b&c=d")]),
        "username=admin&password=a+b%26c%3Dd"
    );
}

#[test]
fn prepared_request_json_sets_content_type() {
    let req = PreparedRequest::post("/api/blacklist".to_owned())
        .with_json(&serde_json::json!({"action": "clear"}))
        .unwrap();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.body.as_deref(), Some(r#"{"action":"clear"}"#));
}

#[test]
fn prepared_request_form_sets_content_type() {
    let req = PreparedRequest::post("/api/auth/login".to_owned()).with_form(&[("username", "admin")]);
    assert_eq!(req.header("Content-Type"), Some("application/x-www-form-urlencoded"));
    assert_eq!(req.body.as_deref(), Some("username=admin"));
}

// =============================================================================
// attach_credential
// =============================================================================

#[test]
fn attach_credential_sets_header_when_signed_in() {
    let (client, storage, _) = client_with_resets();
    sign_in_storage(&storage, "abc", "bearer");

    let req = client.attach_credential(PreparedRequest::get(client.url("/status", &[])));
    assert_eq!(req.header("Authorization"), Some("Bearer abc"));
    assert_eq!(req.url, "/api/status");
}

#[test]
fn attach_credential_leaves_anonymous_request_untouched() {
    let (client, _, _) = client_with_resets();
    let req = PreparedRequest::get("/api/status".to_owned());
    assert_eq!(client.attach_credential(req.clone()), req);
}

#[test]
fn attach_credential_replaces_stale_header() {
    let (client, storage, _) = client_with_resets();
    sign_in_storage(&storage, "new", "bearer");
    let mut req = PreparedRequest::get("/api/status".to_owned());
    req.headers.push(("authorization", "Bearer old".to_owned()));

    let req = client.attach_credential(req);
    let values: Vec<_> = req.headers.iter().filter(|(n, _)| n.eq_ignore_ascii_case("authorization")).collect();
    assert_eq!(values.len(), 1);
    assert_eq!(req.header("Authorization"), Some("Bearer new"));
}

// =============================================================================
// on_error / finish
// =============================================================================

#[test]
fn unauthorized_clears_all_keys_and_hard_redirects_to_login() {
    let (client, storage, resets) = client_with_resets();
    sign_in_storage(&storage, "abc", "bearer");

    let err = client.on_error(ApiError::from_status(401, None));
    assert!(err.is_unauthorized());
    for key in SESSION_KEYS {
        assert_eq!(storage.get(key), None, "{key} should be cleared");
    }
    assert!(!client.session().is_authenticated());
    assert_eq!(*resets.lock().unwrap(), vec!["/login".to_owned()]);
}

#[test]
fn forbidden_and_server_errors_keep_the_session() {
    for status in [403, 500] {
        let (client, storage, resets) = client_with_resets();
        sign_in_storage(&storage, "abc", "bearer");

        let err = client.on_error(ApiError::from_status(status, Some("denied".to_owned())));
        assert_eq!(err, ApiError::Status { status, detail: Some("denied".to_owned()) });
        assert_eq!(storage.len(), 3, "status {status} must not clear the session");
        assert!(resets.lock().unwrap().is_empty());
    }
}

#[test]
fn network_errors_and_timeouts_propagate_unchanged() {
    let (client, storage, resets) = client_with_resets();
    sign_in_storage(&storage, "abc", "bearer");

    let timeout = ApiError::Timeout(DEFAULT_TIMEOUT);
    assert_eq!(client.on_error(timeout.clone()), timeout);
    let network = ApiError::Network("connection refused".to_owned());
    assert_eq!(client.on_error(network.clone()), network);
    assert!(client.session().is_authenticated());
    assert!(resets.lock().unwrap().is_empty());
}

#[test]
fn finish_passes_success_through() {
    let (client, storage, resets) = client_with_resets();
    sign_in_storage(&storage, "abc", "bearer");
    assert_eq!(client.finish(Ok::<_, ApiError>(7)), Ok(7));
    assert!(client.session().is_authenticated());
    assert!(resets.lock().unwrap().is_empty());
}

#[test]
fn finish_routes_unauthorized_through_reset() {
    let (client, storage, resets) = client_with_resets();
    sign_in_storage(&storage, "abc", "bearer");
    let result: Result<(), _> = client.finish(Err(ApiError::Unauthorized { detail: None }));
    assert!(result.is_err());
    assert!(storage.is_empty());
    assert_eq!(resets.lock().unwrap().len(), 1);
}

// =============================================================================
// Operations outside the browser
// =============================================================================

#[cfg(not(feature = "hydrate"))]
#[test]
fn calls_outside_browser_fail_without_touching_session() {
    let (client, storage, resets) = client_with_resets();
    sign_in_storage(&storage, "abc", "bearer");

    let result = futures::executor::block_on(client.access_logs(None));
    assert_eq!(result, Err(ApiError::Unavailable));
    assert!(client.session().is_authenticated());
    assert!(resets.lock().unwrap().is_empty());
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn sign_in_failure_leaves_session_anonymous() {
    let (client, _, _) = client_with_resets();
    let result = futures::executor::block_on(client.sign_in("admin", "admin123"));
    assert_eq!(result, Err(ApiError::Unavailable));
    assert!(!client.session().is_authenticated());
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn sign_out_clears_session_even_when_logout_call_fails() {
    let (client, storage, _) = client_with_resets();
    sign_in_storage(&storage, "abc", "bearer");

    futures::executor::block_on(client.sign_out());
    assert!(!client.session().is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn default_config_matches_backend_contract() {
    let config = ApiConfig::default();
    assert_eq!(config.base_path, "/api");
    assert_eq!(config.timeout, Duration::from_secs(10));
}

// =============================================================================
// Full pipeline over a scripted transport
// =============================================================================

#[test]
fn status_call_carries_bearer_header_and_decodes_body() {
    let (client, storage, resets, sent) = scripted_client(|_| Ok(STATUS_BODY.to_owned()));
    sign_in_storage(&storage, "abc", "bearer");

    let status = futures::executor::block_on(client.status()).unwrap();
    assert_eq!(status.total_attacks, 2);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "/api/status");
    assert_eq!(sent[0].header("Authorization"), Some("Bearer abc"));
    assert!(resets.lock().unwrap().is_empty());
}

#[test]
fn status_unauthorized_clears_all_keys_and_resets_once() {
    let (client, storage, resets, _) = scripted_client(|_| Err(unauthorized()));
    sign_in_storage(&storage, "abc", "bearer");

    let result = futures::executor::block_on(client.status());
    assert!(result.unwrap_err().is_unauthorized());
    for key in SESSION_KEYS {
        assert_eq!(storage.get(key), None, "{key} should be cleared");
    }
    assert_eq!(*resets.lock().unwrap(), vec!["/login".to_owned()]);
}

#[test]
fn rejected_login_skips_reset_and_stays_anonymous() {
    let (client, _, resets, sent) = scripted_client(|_| Err(unauthorized()));

    let result = futures::executor::block_on(client.sign_in("admin", "wrong"));
    assert!(result.unwrap_err().is_unauthorized());
    assert!(!client.session().is_authenticated());
    assert!(resets.lock().unwrap().is_empty());

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1, "no profile fetch after a rejected login");
    assert_eq!(sent[0].url, "/api/auth/login");
    assert_eq!(sent[0].header("Authorization"), None);
    assert_eq!(sent[0].body.as_deref(), Some("username=admin&password=wrong"));
}

#[test]
fn sign_in_profile_unauthorized_drops_fresh_credential() {
    let (client, storage, resets, sent) = scripted_client(|request| {
        if request.url.ends_with("/auth/login") { Ok(TOKEN_BODY.to_owned()) } else { Err(unauthorized()) }
    });

    let result = futures::executor::block_on(client.sign_in("admin", "admin123"));
    assert!(result.unwrap_err().is_unauthorized());
    assert!(storage.is_empty());
    assert_eq!(*resets.lock().unwrap(), vec!["/login".to_owned()]);

    let sent = sent.lock().unwrap();
    assert_eq!(sent[1].url, "/api/auth/me");
    assert_eq!(sent[1].header("Authorization"), Some("Bearer abc"));
}

#[test]
fn sign_in_success_persists_credential_and_profile() {
    let (client, storage, resets, _) = scripted_client(|request| {
        if request.url.ends_with("/auth/login") { Ok(TOKEN_BODY.to_owned()) } else { Ok(USER_BODY.to_owned()) }
    });

    let user = futures::executor::block_on(client.sign_in("admin", "admin123")).unwrap();
    assert_eq!(user.map(|u| u.username), Some("admin".to_owned()));
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));
    assert_eq!(storage.get(TOKEN_TYPE_KEY).as_deref(), Some("bearer"));
    assert_eq!(client.session().profile().map(|u| u.id), Some(1));
    assert!(resets.lock().unwrap().is_empty());
}

#[test]
fn sign_in_keeps_credential_when_profile_fetch_fails_otherwise() {
    let (client, _, resets, _) = scripted_client(|request| {
        if request.url.ends_with("/auth/login") {
            Ok(TOKEN_BODY.to_owned())
        } else {
            Err(ApiError::from_status(500, None))
        }
    });

    let user = futures::executor::block_on(client.sign_in("admin", "admin123")).unwrap();
    assert_eq!(user, None);
    assert!(client.session().is_authenticated());
    assert!(resets.lock().unwrap().is_empty());
}

#[test]
fn logout_unauthorized_triggers_reset() {
    let (client, storage, resets, _) = scripted_client(|_| Err(unauthorized()));
    sign_in_storage(&storage, "abc", "bearer");

    let result = futures::executor::block_on(client.logout());
    assert!(result.unwrap_err().is_unauthorized());
    assert!(storage.is_empty());
    assert_eq!(*resets.lock().unwrap(), vec!["/login".to_owned()]);
}

#[test]
fn undecodable_body_is_a_decode_error_and_keeps_session() {
    let (client, storage, resets, _) = scripted_client(|_| Ok("<html>".to_owned()));
    sign_in_storage(&storage, "abc", "bearer");

    let result = futures::executor::block_on(client.status());
    assert!(matches!(result, Err(ApiError::Decode(_))));
    assert!(client.session().is_authenticated());
    assert!(resets.lock().unwrap().is_empty());
}
