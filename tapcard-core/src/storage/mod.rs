// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persistent Storage Module
//!
//! Key-value slot storage for the local profile and received contacts.
//! Uses SQLite on disk, or memory for tests and ephemeral sessions.

mod error;
mod kv;
pub mod migration;
mod profile_store;
mod sqlite;

pub use error::StorageError;
pub use kv::{KeyValueStore, MemoryKeyValueStore};
pub use profile_store::{ProfileStore, CONTACTS_KEY, PROFILE_KEY};
pub use sqlite::SqliteKeyValueStore;
