// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Profile Store Tests

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::fixtures::{ann_lee, full_profile, FlakyStore};
use tapcard_core::storage::{CONTACTS_KEY, PROFILE_KEY};
use tapcard_core::{
    KeyValueStore, MemoryKeyValueStore, ProfileStore, SqliteKeyValueStore, StorageError,
    UserProfile,
};

fn memory_store() -> ProfileStore<MemoryKeyValueStore> {
    ProfileStore::new(MemoryKeyValueStore::new())
}

fn numbered(n: usize) -> UserProfile {
    UserProfile::new(&format!("Contact{}", n), "Test", "c@x.com", "+1")
}

// ============================================================
// Local Profile
// ============================================================

#[test]
fn test_set_profile_overwrites() {
    let store = memory_store();
    store.set_profile(&ann_lee()).unwrap();
    store.set_profile(&full_profile()).unwrap();

    assert_eq!(store.get_profile(), Some(full_profile()));
}

#[test]
fn test_profile_uses_named_slot() {
    let store = memory_store();
    store.set_profile(&ann_lee()).unwrap();

    let raw = store.backend().get(PROFILE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["firstName"], "Ann");
    assert_eq!(json["customLinks"], serde_json::json!([]));
}

#[test]
fn test_profile_read_failure_is_absent() {
    let store = ProfileStore::new(FlakyStore::new());
    store.set_profile(&ann_lee()).unwrap();

    store.backend().fail_reads(true);
    assert_eq!(store.get_profile(), None);
    assert!(!store.has_profile());

    store.backend().fail_reads(false);
    assert_eq!(store.get_profile(), Some(ann_lee()));
}

#[test]
fn test_profile_write_failure_is_surfaced() {
    let store = ProfileStore::new(FlakyStore::new());
    store.backend().fail_writes(true);

    let result = store.set_profile(&ann_lee());
    assert!(matches!(result, Err(StorageError::Backend(_))));
}

// ============================================================
// Saved Contacts
// ============================================================

#[test]
fn test_list_contacts_empty() {
    assert!(memory_store().list_contacts().is_empty());
}

#[test]
fn test_add_contacts_unique_ids_in_order() {
    let store = memory_store();
    let n = 25;

    let saved: Vec<_> = (0..n)
        .map(|i| store.add_contact(&numbered(i)).unwrap())
        .collect();
    let listed = store.list_contacts();

    assert_eq!(listed.len(), n);
    assert_eq!(listed, saved);

    let ids: HashSet<_> = listed.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids.len(), n);

    for (i, contact) in listed.iter().enumerate() {
        assert_eq!(contact.profile, numbered(i));
    }
}

#[test]
fn test_add_contact_sets_timestamp() {
    let store = memory_store();
    let before = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;

    let contact = store.add_contact(&ann_lee()).unwrap();

    assert!(contact.saved_at >= before);
    assert!(!contact.id.is_empty());
}

#[test]
fn test_same_profile_saved_twice_gets_two_records() {
    let store = memory_store();
    let a = store.add_contact(&ann_lee()).unwrap();
    let b = store.add_contact(&ann_lee()).unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(store.list_contacts().len(), 2);
}

#[test]
fn test_remove_contact_removes_exactly_one() {
    let store = memory_store();
    let a = store.add_contact(&numbered(0)).unwrap();
    let b = store.add_contact(&numbered(1)).unwrap();
    let c = store.add_contact(&numbered(2)).unwrap();

    store.remove_contact(&b.id).unwrap();

    assert_eq!(store.list_contacts(), vec![a, c]);
}

#[test]
fn test_remove_unknown_contact_is_noop() {
    let store = memory_store();
    store.add_contact(&ann_lee()).unwrap();
    let before = store.list_contacts();

    store.remove_contact("no-such-id").unwrap();
    store.remove_contact("no-such-id").unwrap();

    assert_eq!(store.list_contacts(), before);
}

#[test]
fn test_remove_from_empty_store_succeeds() {
    let store = memory_store();
    store.remove_contact("anything").unwrap();
    assert_eq!(store.backend().get(CONTACTS_KEY).unwrap(), None);
}

#[test]
fn test_failed_add_leaves_list_unchanged() {
    let store = ProfileStore::new(FlakyStore::new());
    let kept = store.add_contact(&numbered(0)).unwrap();

    store.backend().fail_writes(true);
    let result = store.add_contact(&numbered(1));
    assert!(matches!(result, Err(StorageError::Backend(_))));

    store.backend().fail_writes(false);
    assert_eq!(store.list_contacts(), vec![kept]);
}

#[test]
fn test_failed_remove_leaves_list_unchanged() {
    let store = ProfileStore::new(FlakyStore::new());
    let kept = store.add_contact(&numbered(0)).unwrap();

    store.backend().fail_writes(true);
    assert!(store.remove_contact(&kept.id).is_err());

    store.backend().fail_writes(false);
    assert_eq!(store.list_contacts(), vec![kept]);
}

#[test]
fn test_read_failure_lists_empty_but_blocks_add() {
    let store = ProfileStore::new(FlakyStore::new());
    let kept = store.add_contact(&numbered(0)).unwrap();

    store.backend().fail_reads(true);
    assert!(store.list_contacts().is_empty());
    assert!(store.add_contact(&numbered(1)).is_err());

    store.backend().fail_reads(false);
    assert_eq!(store.list_contacts(), vec![kept]);
}

#[test]
fn test_reads_legacy_contact_layout() {
    let store = memory_store();
    store
        .backend()
        .set(
            CONTACTS_KEY,
            r#"[{"firstName":"Ann","lastName":"Lee","email":"a@x.com","phone":"+1000","customLinks":[],"id":"1700000000000","savedAt":1700000000000}]"#,
        )
        .unwrap();

    let contacts = store.list_contacts();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].id, "1700000000000");
    assert_eq!(contacts[0].profile, ann_lee());

    store.add_contact(&full_profile()).unwrap();
    assert_eq!(store.list_contacts().len(), 2);
}

// ============================================================
// SQLite Backend
// ============================================================

#[test]
fn test_sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tapcard.db");

    let saved = {
        let store = ProfileStore::new(SqliteKeyValueStore::open(&path).unwrap());
        store.set_profile(&ann_lee()).unwrap();
        store.add_contact(&full_profile()).unwrap()
    };

    let store = ProfileStore::new(SqliteKeyValueStore::open(&path).unwrap());
    assert_eq!(store.get_profile(), Some(ann_lee()));
    assert_eq!(store.list_contacts(), vec![saved]);
}

#[test]
fn test_shared_backend_between_stores() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let writer = ProfileStore::new(Arc::clone(&kv));
    let reader = ProfileStore::new(Arc::clone(&kv));

    let saved = writer.add_contact(&ann_lee()).unwrap();
    assert_eq!(reader.get_contact(&saved.id), Some(saved));
}
