//! Dedup store durability across a simulated restart.

use reel_responder::DedupStore;

#[test]
fn reload_sees_exactly_the_last_flush() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let mut store = DedupStore::load(&path).unwrap();
        store.add("m1");
        store.add("m2");
        store.flush().unwrap();

        // Added after the last flush; lost when the process goes away.
        store.add("m3");
    }

    let reloaded = DedupStore::load(&path).unwrap();
    let ids: Vec<&str> = reloaded.ids().collect();
    assert_eq!(ids, vec!["m1", "m2"]);
}

#[test]
fn record_file_keeps_the_replied_to_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let mut store = DedupStore::load(&path).unwrap();
    store.add("340282366841710300949128137443944319108");
    store.flush().unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!({ "replied_to": ["340282366841710300949128137443944319108"] })
    );
}

#[test]
fn record_written_by_older_bot_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(
        &path,
        "{\n  \"replied_to\": [\n    \"30001\",\n    \"30002\"\n  ]\n}",
    )
    .unwrap();

    let store = DedupStore::load(&path).unwrap();

    assert_eq!(store.len(), 2);
    assert!(store.contains("30001"));
    assert!(store.contains("30002"));
    assert_eq!(store.path(), path.as_path());
}
