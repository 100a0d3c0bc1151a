use super::*;

#[test]
fn memory_store_set_get_remove() {
    let store = MemoryStore::new();
    assert_eq!(store.get("token"), None);

    store.set("token", "abc");
    assert_eq!(store.get("token").as_deref(), Some("abc"));

    store.remove("token");
    assert_eq!(store.get("token"), None);
    assert!(store.is_empty());
}

#[test]
fn memory_store_clones_share_entries() {
    let a = MemoryStore::new();
    let b = a.clone();
    a.set("k", "v");
    assert_eq!(b.get("k").as_deref(), Some("v"));
    assert_eq!(b.len(), 1);
}

#[test]
fn memory_store_set_overwrites() {
    let store = MemoryStore::new();
    store.set("k", "one");
    store.set("k", "two");
    assert_eq!(store.get("k").as_deref(), Some("two"));
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn local_storage_is_empty_outside_browser() {
    let store = LocalStorage;
    store.set("token", "abc");
    assert_eq!(store.get("token"), None);
}
