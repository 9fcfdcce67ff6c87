// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Profile and saved-contact storage.
//!
//! Two slots in a [`KeyValueStore`]: the local user's profile and the
//! ordered list of contacts received from other devices, each stored as a
//! JSON blob.

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::kv::KeyValueStore;
use super::StorageError;
use crate::profile::{SavedContact, UserProfile};

/// Slot holding the local user's profile.
pub const PROFILE_KEY: &str = "@user_profile";

/// Slot holding the saved-contacts list.
pub const CONTACTS_KEY: &str = "@saved_contacts";

/// Local profile and received contacts.
///
/// Contact mutations rewrite the whole list, so they are serialized within
/// the process. The store assumes a single writing process.
pub struct ProfileStore<K: KeyValueStore> {
    kv: K,
    write_lock: Mutex<()>,
}

impl<K: KeyValueStore> ProfileStore<K> {
    /// Creates a profile store over the given key-value backend.
    pub fn new(kv: K) -> Self {
        ProfileStore {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the underlying key-value backend.
    pub fn backend(&self) -> &K {
        &self.kv
    }

    // === Local Profile ===

    /// Loads the local profile.
    ///
    /// Read failures and undecodable data are logged and reported as no
    /// profile.
    pub fn get_profile(&self) -> Option<UserProfile> {
        match self.kv.get(PROFILE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(error = %e, "stored profile is not decodable");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to load profile");
                None
            }
        }
    }

    /// Returns true if a local profile is stored and readable.
    pub fn has_profile(&self) -> bool {
        self.get_profile().is_some()
    }

    /// Replaces the local profile.
    ///
    /// Blank optional links are dropped before saving. Profiles missing a
    /// required field are rejected.
    pub fn set_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let profile = profile.normalized();
        profile.validate()?;

        let json = serde_json::to_string(&profile)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(PROFILE_KEY, &json)?;

        debug!("saved local profile");
        Ok(())
    }

    // === Saved Contacts ===

    /// Lists saved contacts in the order they were added.
    ///
    /// Read failures and undecodable data are logged and reported as an
    /// empty list.
    pub fn list_contacts(&self) -> Vec<SavedContact> {
        match self.load_contacts() {
            Ok(contacts) => contacts,
            Err(e) => {
                warn!(error = %e, "failed to load saved contacts");
                Vec::new()
            }
        }
    }

    /// Finds a saved contact by ID.
    pub fn get_contact(&self, id: &str) -> Option<SavedContact> {
        self.list_contacts().into_iter().find(|c| c.id == id)
    }

    /// Saves a received profile as a new contact and returns the record.
    ///
    /// The new contact gets a fresh random ID and the current time, and is
    /// appended to the end of the list. Fails while the stored list cannot
    /// be decoded; [`clear_contacts`](Self::clear_contacts) resets it.
    pub fn add_contact(&self, profile: &UserProfile) -> Result<SavedContact, StorageError> {
        let _guard = self.write_lock.lock();

        let mut contacts = self.load_contacts()?;
        let contact = SavedContact {
            id: uuid::Uuid::new_v4().to_string(),
            saved_at: now_millis(),
            profile: profile.clone(),
        };
        contacts.push(contact.clone());
        self.store_contacts(&contacts)?;

        debug!(contact_id = %contact.id, total = contacts.len(), "saved contact");
        Ok(contact)
    }

    /// Removes the contact with the given ID.
    ///
    /// Removing an unknown ID succeeds without touching storage.
    pub fn remove_contact(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();

        let mut contacts = self.load_contacts()?;
        let before = contacts.len();
        contacts.retain(|c| c.id != id);

        if contacts.len() == before {
            debug!(contact_id = %id, "contact not found, nothing to remove");
            return Ok(());
        }

        self.store_contacts(&contacts)?;
        debug!(contact_id = %id, "removed contact");
        Ok(())
    }

    /// Deletes every saved contact, including an undecodable list.
    pub fn clear_contacts(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        self.kv.remove(CONTACTS_KEY)?;
        warn!("cleared saved contacts");
        Ok(())
    }

    /// Strict read used inside mutations: a failed or undecodable read must
    /// not be mistaken for an empty list and written back.
    fn load_contacts(&self) -> Result<Vec<SavedContact>, StorageError> {
        match self.kv.get(CONTACTS_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn store_contacts(&self, contacts: &[SavedContact]) -> Result<(), StorageError> {
        let json = serde_json::to_string(contacts)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(CONTACTS_KEY, &json)
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    fn store() -> ProfileStore<MemoryKeyValueStore> {
        ProfileStore::new(MemoryKeyValueStore::new())
    }

    #[test]
    fn test_profile_roundtrip() {
        let store = store();
        assert!(store.get_profile().is_none());

        let profile = UserProfile::new("Ann", "Lee", "a@x.com", "+1000");
        store.set_profile(&profile).unwrap();
        assert_eq!(store.get_profile(), Some(profile));
    }

    #[test]
    fn test_set_profile_normalizes_blank_links() {
        let store = store();
        let mut profile = UserProfile::new("Ann", "Lee", "a@x.com", "+1000");
        profile.github = Some(String::new());

        store.set_profile(&profile).unwrap();
        assert_eq!(store.get_profile().unwrap().github, None);
    }

    #[test]
    fn test_set_invalid_profile_rejected() {
        let store = store();
        let profile = UserProfile::new("", "Lee", "a@x.com", "+1000");

        let result = store.set_profile(&profile);
        assert!(matches!(result, Err(StorageError::InvalidProfile(_))));
        assert!(store.get_profile().is_none());
    }

    #[test]
    fn test_corrupt_profile_reads_as_absent() {
        let store = store();
        store.backend().set(PROFILE_KEY, "{not json").unwrap();
        assert!(store.get_profile().is_none());
    }

    #[test]
    fn test_corrupt_contacts_blocks_mutation() {
        let store = store();
        store.backend().set(CONTACTS_KEY, "[{\"id\":").unwrap();

        assert!(store.list_contacts().is_empty());
        let result = store.add_contact(&UserProfile::new("Ann", "Lee", "a@x.com", "+1000"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));

        // The corrupt blob is left for inspection rather than overwritten.
        assert_eq!(
            store.backend().get(CONTACTS_KEY).unwrap().as_deref(),
            Some("[{\"id\":")
        );
    }

    #[test]
    fn test_clear_contacts_recovers_corrupt_list() {
        let store = store();
        store.backend().set(CONTACTS_KEY, "[{\"id\":").unwrap();

        store.clear_contacts().unwrap();
        let saved = store
            .add_contact(&UserProfile::new("Ann", "Lee", "a@x.com", "+1000"))
            .unwrap();

        assert_eq!(store.list_contacts(), vec![saved]);
    }

    #[test]
    fn test_get_contact_by_id() {
        let store = store();
        let saved = store
            .add_contact(&UserProfile::new("Ann", "Lee", "a@x.com", "+1000"))
            .unwrap();

        assert_eq!(store.get_contact(&saved.id), Some(saved));
        assert_eq!(store.get_contact("missing"), None);
    }
}
