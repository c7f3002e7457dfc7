use bt_document::{
    load_access_keys, load_access_keys_from, load_tree_from, save_access_keys,
    save_access_keys_to, save_tree_to, DocumentStore, FileStore,
};
use bt_model::{AccessKey, AccessKeySet, AccessKeyType, BehaviorTree};

#[test]
fn keys_are_tagged_by_variant_name() {
    let mut set = AccessKeySet::new("Weapons");
    set.add(AccessKey::counter_limit("Reload", 2)).unwrap();
    set.add(AccessKey::time_limit("Grenade", 4.5)).unwrap();

    let text = save_access_keys(&set).expect("save");
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["Name"], "Weapons");
    assert_eq!(value["Count"], 2);
    assert_eq!(value["Keys"][0]["CounterLimit"]["Key"], "Reload");
    assert_eq!(value["Keys"][0]["CounterLimit"]["MaxAccessCount"], 2);
    assert_eq!(value["Keys"][1]["TimeLimit"]["TimeInterval"], 4.5);

    assert_eq!(load_access_keys(&text).expect("load"), set);
}

#[test]
fn missing_limits_default_to_one_and_unknown_keys_are_skipped() {
    let text = r#"{
        "Name": "Doors",
        "Count": 99,
        "Keys": [
            { "CounterLimit": { "Key": "Front" } },
            { "TimeLimit": { "Key": "Back" } },
            { "Semaphore": { "Key": "Side" } }
        ]
    }"#;

    let set = load_access_keys(text).expect("load");
    assert_eq!(set.len(), 2);
    assert_eq!(set.find("Front"), Some(&AccessKey::counter_limit("Front", 1)));
    assert_eq!(set.find("Back").map(AccessKey::key_type), Some(AccessKeyType::TimeLimit));
    assert_eq!(set.find("Back"), Some(&AccessKey::time_limit("Back", 1.0)));
}

#[test]
fn file_store_round_trips_documents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let tree_store = FileStore::new(dir.path().join("trees/Soldier.json"));
    let keys_store = FileStore::new(dir.path().join("access_keys/Weapons.json"));

    let tree = BehaviorTree::new("Soldier");
    save_tree_to(&tree_store, &tree).expect("save tree");
    let loaded = load_tree_from(&tree_store).expect("load tree");
    assert_eq!(loaded.tree.name(), "Soldier");
    assert!(loaded.report.is_clean());

    let mut set = AccessKeySet::new("Weapons");
    set.add(AccessKey::counter_limit("Reload", 1)).unwrap();
    save_access_keys_to(&keys_store, &set).expect("save keys");
    assert_eq!(load_access_keys_from(&keys_store).expect("load keys"), set);

    let missing = FileStore::new(dir.path().join("nope.json"));
    assert!(missing.load().is_err());
}
