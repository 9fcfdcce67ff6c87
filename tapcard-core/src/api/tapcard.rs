// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tapcard Orchestrator
//!
//! Main entry point for the Tapcard API.

use std::sync::Arc;

use crate::exchange::{NfcHardware, PayloadCodec, TagExchange, TagTransceiver};
use crate::profile::{SavedContact, UserProfile};
use crate::storage::{KeyValueStore, MemoryKeyValueStore, ProfileStore, SqliteKeyValueStore};

use super::config::TapcardConfig;
use super::error::{TapcardError, TapcardResult};

/// Main Tapcard orchestrator.
///
/// Wires the profile store, the tag transceiver and the exchange together
/// and exposes the operations the app screens use.
///
/// # Example
///
/// ```ignore
/// use tapcard_core::{Tapcard, TapcardConfig, UserProfile};
///
/// let app = Tapcard::open(TapcardConfig::default(), platform_nfc)?;
/// if !app.initialize() {
///     return Err("NFC not supported".into());
/// }
///
/// app.set_profile(&UserProfile::new("Ann", "Lee", "a@x.com", "+1000"))?;
/// app.send_own_profile()?;
///
/// app.begin_receiving(move |profile| {
///     ui.show_received_contact(profile);
/// })?;
/// ```
pub struct Tapcard<H: NfcHardware, K: KeyValueStore = SqliteKeyValueStore> {
    config: TapcardConfig,
    store: Arc<ProfileStore<K>>,
    exchange: TagExchange<H, K>,
}

impl<H: NfcHardware> Tapcard<H, SqliteKeyValueStore> {
    /// Opens or creates the database at `config.storage_path`.
    pub fn open(config: TapcardConfig, hardware: H) -> TapcardResult<Self> {
        if let Some(parent) = config.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| TapcardError::Configuration(e.to_string()))?;
            }
        }

        let kv = SqliteKeyValueStore::open(&config.storage_path)?;
        Self::with_store(config, hardware, kv)
    }
}

impl<H: NfcHardware> Tapcard<H, MemoryKeyValueStore> {
    /// Creates an instance with in-memory storage (for testing).
    pub fn in_memory(hardware: H) -> TapcardResult<Self> {
        Self::with_store(TapcardConfig::default(), hardware, MemoryKeyValueStore::new())
    }
}

impl<H: NfcHardware, K: KeyValueStore> Tapcard<H, K> {
    /// Creates an instance over a custom key-value backend.
    pub fn with_store(config: TapcardConfig, hardware: H, kv: K) -> TapcardResult<Self> {
        if config.app_identifier.trim().is_empty() {
            return Err(TapcardError::Configuration(
                "app identifier cannot be empty".into(),
            ));
        }

        let store = Arc::new(ProfileStore::new(kv));
        let transceiver = Arc::new(TagTransceiver::with_timeout(
            hardware,
            config.session_timeout,
        ));
        let codec =
            PayloadCodec::new(&config.app_identifier).with_language_code(&config.language_code);
        let exchange = TagExchange::new(transceiver, Arc::clone(&store), codec);

        Ok(Tapcard {
            config,
            store,
            exchange,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TapcardConfig {
        &self.config
    }

    /// Returns the profile store.
    pub fn store(&self) -> &ProfileStore<K> {
        &self.store
    }

    /// Returns the exchange.
    pub fn exchange(&self) -> &TagExchange<H, K> {
        &self.exchange
    }

    // === NFC ===

    /// Checks NFC support and starts the NFC manager.
    pub fn initialize(&self) -> bool {
        self.exchange.transceiver().initialize()
    }

    /// Checks whether NFC is switched on.
    pub fn is_nfc_enabled(&self) -> bool {
        self.exchange.transceiver().is_enabled()
    }

    // === Profile ===

    /// Loads the local profile.
    pub fn get_profile(&self) -> Option<UserProfile> {
        self.store.get_profile()
    }

    /// Replaces the local profile.
    pub fn set_profile(&self, profile: &UserProfile) -> TapcardResult<()> {
        Ok(self.store.set_profile(profile)?)
    }

    // === Contacts ===

    /// Lists saved contacts in insertion order.
    pub fn list_contacts(&self) -> Vec<SavedContact> {
        self.store.list_contacts()
    }

    /// Saves a received profile as a contact.
    pub fn add_contact(&self, profile: &UserProfile) -> TapcardResult<SavedContact> {
        Ok(self.store.add_contact(profile)?)
    }

    /// Deletes a saved contact.
    pub fn remove_contact(&self, id: &str) -> TapcardResult<()> {
        Ok(self.store.remove_contact(id)?)
    }

    /// Deletes all saved contacts.
    pub fn clear_contacts(&self) -> TapcardResult<()> {
        Ok(self.store.clear_contacts()?)
    }

    // === Exchange ===

    /// Writes a profile to the next tag.
    pub fn send_profile(&self, profile: &UserProfile) -> TapcardResult<()> {
        Ok(self.exchange.send_profile(profile)?)
    }

    /// Writes the local profile to the next tag.
    pub fn send_own_profile(&self) -> TapcardResult<()> {
        Ok(self.exchange.send_own_profile()?)
    }

    /// Reads a single tag.
    pub fn receive_once(&self) -> TapcardResult<Option<UserProfile>> {
        Ok(self.exchange.receive_once()?)
    }

    /// Stops receiving.
    pub fn end_receiving(&self) {
        self.exchange.end_receiving();
    }
}

impl<H: NfcHardware + 'static, K: KeyValueStore> Tapcard<H, K> {
    /// Listens for profiles from other devices.
    pub fn begin_receiving<F>(&self, on_contact: F) -> TapcardResult<()>
    where
        F: Fn(UserProfile) + Send + Sync + 'static,
    {
        Ok(self.exchange.begin_receiving(on_contact)?)
    }
}
