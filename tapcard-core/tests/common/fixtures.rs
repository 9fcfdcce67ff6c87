// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Test Fixtures

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tapcard_core::exchange::{NdefMessage, NdefRecord};
use tapcard_core::{
    KeyValueStore, MemoryKeyValueStore, MockNfcHardware, StorageError, Tapcard, TapcardConfig,
    UserProfile,
};

/// Short timeout so tests that expect "no tag" finish quickly.
pub const TEST_TIMEOUT: Duration = Duration::from_millis(50);

/// The profile from the two-device walkthrough.
pub fn ann_lee() -> UserProfile {
    UserProfile::new("Ann", "Lee", "a@x.com", "+1000")
}

/// A profile using every optional field.
pub fn full_profile() -> UserProfile {
    UserProfile::new("Boris", "Ivanov", "boris@example.com", "+79990001122")
        .with_linkedin("https://linkedin.com/in/boris")
        .with_github("https://github.com/boris")
        .with_link("Blog", "https://boris.dev")
        .with_link("Blog", "https://boris.dev")
        .with_link("Talks", "https://talks.boris.dev")
}

/// An NDEF message holding one text record with the given JSON.
pub fn text_message(json: &str) -> Vec<u8> {
    NdefMessage::new(vec![NdefRecord::text("en", json).unwrap()]).to_bytes()
}

/// An exchange envelope from some other application.
pub fn foreign_message() -> Vec<u8> {
    text_message(
        r#"{"app":"com.other.app","profile":{"firstName":"Eve","lastName":"X","email":"e@x","phone":"1","customLinks":[]}}"#,
    )
}

/// A phone with NFC, in-memory storage and a short session timeout.
pub fn device() -> Tapcard<Arc<MockNfcHardware>, MemoryKeyValueStore> {
    let config = TapcardConfig::default().with_session_timeout(TEST_TIMEOUT);
    let app = Tapcard::with_store(
        config,
        Arc::new(MockNfcHardware::new()),
        MemoryKeyValueStore::new(),
    )
    .unwrap();
    assert!(app.initialize());
    app
}

/// Collects everything a callback receives.
pub fn collector<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(T) + Send + Sync + 'static)
{
    let items = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&items);
    (items, move |item| sink.lock().unwrap().push(item))
}

/// In-memory key-value store whose reads or writes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryKeyValueStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("read failed".into()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("disk full".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("disk full".into()));
        }
        self.inner.remove(key)
    }
}
