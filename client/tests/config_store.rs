use std::{
    fs,
    path::PathBuf,
};

use recurring_payments_client::{
    config_store::{
        ConfigStore,
        DeploymentRecord,
        RECURRING_PAYMENTS_RECORD,
    },
    error::StoreError,
};
use serde_json::{
    json,
    Value,
};
use solana_sdk::pubkey::Pubkey;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rp-config-store-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn load_of_a_missing_record_is_not_found() {
    let store = ConfigStore::new(scratch_dir("missing"));
    let res = store.load::<Value>("nothing.json");
    assert!(matches!(res, Err(StoreError::NotFound { .. })));
    assert_eq!(store.load_optional::<Value>("nothing.json").unwrap(), None);
}

#[test]
fn save_creates_the_directory_and_load_returns_equal_json() {
    let dir = scratch_dir("values");
    let store = ConfigStore::new(&dir);
    assert!(!dir.exists());

    let values = [
        json!(null),
        json!(true),
        json!(42),
        json!("text"),
        json!([1, "two", { "three": 3.5 }]),
        json!({
            "programId": Pubkey::new_unique().to_string(),
            "accountId": Pubkey::new_unique().to_string(),
            "inStore": true,
            "nested": { "list": [], "empty": {} },
        }),
    ];
    for (i, value) in values.iter().enumerate() {
        let name = format!("value-{i}.json");
        store.save(&name, value).unwrap();
        assert_eq!(&store.load::<Value>(&name).unwrap(), value);
    }
    assert!(dir.is_dir());
}

#[test]
fn saving_again_replaces_the_record() {
    let store = ConfigStore::new(scratch_dir("replace"));
    store.save("status.json", &json!({ "deployed": false })).unwrap();
    store.save("status.json", &json!({ "deployed": true })).unwrap();
    assert_eq!(
        store.load::<Value>("status.json").unwrap(),
        json!({ "deployed": true })
    );

    // No staging files are left behind.
    let entries = fs::read_dir(store.dir()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn deployment_record_round_trips() {
    let store = ConfigStore::new(scratch_dir("deployment"));
    let record = DeploymentRecord {
        program_id: Pubkey::new_unique(),
        account_id: Pubkey::new_unique(),
    };
    store.save(RECURRING_PAYMENTS_RECORD, &record).unwrap();
    assert!(store.contains(RECURRING_PAYMENTS_RECORD));
    assert_eq!(
        store.load::<DeploymentRecord>(RECURRING_PAYMENTS_RECORD).unwrap(),
        record
    );
}

#[test]
fn mismatched_shapes_are_json_errors() {
    let store = ConfigStore::new(scratch_dir("shape"));
    store
        .save(RECURRING_PAYMENTS_RECORD, &json!({ "programId": 7 }))
        .unwrap();
    assert!(matches!(
        store.load::<DeploymentRecord>(RECURRING_PAYMENTS_RECORD),
        Err(StoreError::Json { .. })
    ));
}

#[test]
fn failed_rename_reports_the_target_and_cleans_up() {
    let store = ConfigStore::new(scratch_dir("rename"));
    // A non-empty directory in the record's place makes the final rename fail.
    let blocked = store.path_for(RECURRING_PAYMENTS_RECORD);
    fs::create_dir_all(blocked.join("occupied")).unwrap();

    let err = store
        .save(RECURRING_PAYMENTS_RECORD, &json!({ "deployed": true }))
        .unwrap_err();
    match err {
        StoreError::Io { path, .. } => assert_eq!(path, blocked),
        other => panic!("expected an i/o error on the record, got {other:?}"),
    }

    let leftovers = fs::read_dir(store.dir())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn remove_deletes_and_tolerates_missing_records() {
    let store = ConfigStore::new(scratch_dir("remove"));
    store.save("status.json", &json!({ "deployed": true })).unwrap();
    store.remove("status.json").unwrap();
    assert!(!store.contains("status.json"));
    store.remove("status.json").unwrap();
}
