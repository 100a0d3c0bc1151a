use super::*;
use crate::util::storage::MemoryStore;

fn issued(token: &str, kind: &str) -> TokenResponse {
    TokenResponse { access_token: token.to_owned(), token_type: kind.to_owned() }
}

fn admin() -> User {
    User { id: 1, username: "admin".to_owned(), role: "admin".to_owned() }
}

// =============================================================
// Session flag
// =============================================================

#[test]
fn fresh_store_is_anonymous() {
    let session = SessionStore::new(MemoryStore::new());
    assert!(!session.is_authenticated());
    assert_eq!(session.status(), SessionStatus::Anonymous);
    assert_eq!(session.credential(), None);
}

#[test]
fn authenticated_iff_token_present() {
    let storage = MemoryStore::new();
    let session = SessionStore::new(storage.clone());

    storage.set(TOKEN_TYPE_KEY, "bearer");
    assert!(!session.is_authenticated());

    storage.set(TOKEN_KEY, "abc");
    assert!(session.is_authenticated());

    storage.remove(TOKEN_TYPE_KEY);
    assert!(session.is_authenticated(), "kind is not part of the session flag");
    assert_eq!(session.credential(), None);
}

#[test]
fn initial_state_restored_from_persisted_storage() {
    let storage = MemoryStore::new();
    storage.set(TOKEN_KEY, "abc");
    storage.set(TOKEN_TYPE_KEY, "bearer");

    let session = SessionStore::new(storage);
    assert_eq!(session.status(), SessionStatus::Authenticated);
    assert_eq!(
        session.credential(),
        Some(Credential { token: "abc".to_owned(), kind: "bearer".to_owned() })
    );
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn store_credential_then_clear_cycles_states() {
    let storage = MemoryStore::new();
    let session = SessionStore::new(storage.clone());

    session.store_credential(&issued("abc", "bearer"));
    session.save_profile(&admin());
    assert_eq!(session.status(), SessionStatus::Authenticated);
    assert_eq!(session.profile(), Some(admin()));
    assert_eq!(storage.len(), 3);

    session.clear();
    assert_eq!(session.status(), SessionStatus::Anonymous);
    assert_eq!(session.profile(), None);
    assert!(storage.is_empty());

    session.store_credential(&issued("def", "bearer"));
    assert!(session.is_authenticated());
}

#[test]
fn clones_observe_the_same_session() {
    let session = SessionStore::new(MemoryStore::new());
    let other = session.clone();
    session.store_credential(&issued("abc", "bearer"));
    assert!(other.is_authenticated());
    other.clear();
    assert!(!session.is_authenticated());
}

// =============================================================
// Corrupt profile
// =============================================================

#[test]
fn corrupt_profile_at_startup_clears_session() {
    let storage = MemoryStore::new();
    storage.set(TOKEN_KEY, "abc");
    storage.set(TOKEN_TYPE_KEY, "bearer");
    storage.set(USER_KEY, "{not json");

    let session = SessionStore::new(storage.clone());
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn corrupt_profile_read_later_clears_session() {
    let storage = MemoryStore::new();
    let session = SessionStore::new(storage.clone());
    session.store_credential(&issued("abc", "bearer"));
    storage.set(USER_KEY, r#"{"username": 5}"#);

    assert_eq!(session.profile(), None);
    assert!(!session.is_authenticated());
}
