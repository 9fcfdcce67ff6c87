// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Concurrency Tests
//!
//! Contact mutations and tag sessions from several threads at once.

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::fixtures::ann_lee;
use tapcard_core::{
    MemoryKeyValueStore, MockNfcHardware, MockTag, ProfileStore, SqliteKeyValueStore,
    TagTransceiver, TransceiverError, UserProfile,
};

#[test]
fn test_concurrent_adds_lose_nothing() {
    let store = Arc::new(ProfileStore::new(MemoryKeyValueStore::new()));
    let threads = 8;
    let per_thread = 25;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..per_thread {
                    let profile =
                        UserProfile::new(&format!("T{}", t), &format!("N{}", i), "e@x", "+1");
                    store.add_contact(&profile).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let contacts = store.list_contacts();
    assert_eq!(contacts.len(), threads * per_thread);

    let ids: HashSet<_> = contacts.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), threads * per_thread);
}

#[test]
fn test_concurrent_add_and_remove_on_sqlite() {
    let store = Arc::new(ProfileStore::new(SqliteKeyValueStore::in_memory().unwrap()));
    let doomed: Vec<_> = (0..20)
        .map(|_| store.add_contact(&ann_lee()).unwrap())
        .collect();

    let remover = {
        let store = Arc::clone(&store);
        let ids: Vec<_> = doomed.iter().map(|c| c.id.clone()).collect();
        thread::spawn(move || {
            for id in ids {
                store.remove_contact(&id).unwrap();
            }
        })
    };
    let adder = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            (0..20)
                .map(|_| store.add_contact(&ann_lee()).unwrap().id)
                .collect::<Vec<_>>()
        })
    };

    remover.join().unwrap();
    let added: HashSet<_> = adder.join().unwrap().into_iter().collect();

    let remaining: HashSet<_> = store.list_contacts().into_iter().map(|c| c.id).collect();
    assert_eq!(remaining, added);
}

#[test]
fn test_sessions_are_serialized() {
    let hardware = Arc::new(MockNfcHardware::new());
    let transceiver = Arc::new(TagTransceiver::with_timeout(
        Arc::clone(&hardware),
        Duration::from_secs(5),
    ));
    assert!(transceiver.initialize());
    let tag = MockTag::blank();
    hardware.present_tag(tag.clone());

    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let transceiver = Arc::clone(&transceiver);
            thread::spawn(move || transceiver.write(&[i]))
        })
        .collect();

    for handle in handles {
        let result: Result<(), TransceiverError> = handle.join().unwrap();
        result.unwrap();
    }

    assert_eq!(tag.write_count(), 8);
    assert_eq!(hardware.sessions_opened(), 8);
    assert!(!hardware.is_session_active());
}
