// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exchange Orchestrator
//!
//! Sequences a profile exchange: encode and write on the sending device;
//! listen, read, decode and hand off on the receiving one.

use std::sync::Arc;

use tracing::{debug, info};

use super::error::{ExchangeError, PreconditionError};
use super::hardware::NfcHardware;
use super::payload::PayloadCodec;
use super::transceiver::TagTransceiver;
use crate::profile::UserProfile;
use crate::storage::{KeyValueStore, ProfileStore};

/// Profile exchange over NFC tags.
pub struct TagExchange<H: NfcHardware, K: KeyValueStore> {
    transceiver: Arc<TagTransceiver<H>>,
    store: Arc<ProfileStore<K>>,
    codec: PayloadCodec,
}

impl<H: NfcHardware, K: KeyValueStore> TagExchange<H, K> {
    /// Creates an exchange over a transceiver and profile store.
    pub fn new(
        transceiver: Arc<TagTransceiver<H>>,
        store: Arc<ProfileStore<K>>,
        codec: PayloadCodec,
    ) -> Self {
        TagExchange {
            transceiver,
            store,
            codec,
        }
    }

    /// Returns the transceiver.
    pub fn transceiver(&self) -> &TagTransceiver<H> {
        &self.transceiver
    }

    /// Returns the payload codec.
    pub fn codec(&self) -> &PayloadCodec {
        &self.codec
    }

    /// Writes a profile to the next tag brought into range.
    pub fn send_profile(&self, profile: &UserProfile) -> Result<(), ExchangeError> {
        let bytes = self.codec.encode(profile)?;
        self.transceiver.write(&bytes)?;
        info!("sent profile");
        Ok(())
    }

    /// Writes the locally stored profile.
    pub fn send_own_profile(&self) -> Result<(), ExchangeError> {
        let profile = self
            .store
            .get_profile()
            .ok_or(PreconditionError::NoLocalProfile)?;
        self.send_profile(&profile)
    }

    /// Reads one tag and decodes a profile from it.
    ///
    /// Returns None if the tag is empty or not addressed to this app.
    pub fn receive_once(&self) -> Result<Option<UserProfile>, ExchangeError> {
        let bytes = self.transceiver.read_once()?;
        Ok(bytes.and_then(|bytes| self.codec.decode(&bytes)))
    }

    /// Stops receiving. Safe to call when not receiving.
    pub fn end_receiving(&self) {
        self.transceiver.stop_listening();
    }

    /// Returns true while receiving.
    pub fn is_receiving(&self) -> bool {
        self.transceiver.is_listening()
    }
}

impl<H: NfcHardware + 'static, K: KeyValueStore> TagExchange<H, K> {
    /// Listens for tags and calls `on_contact` with every profile addressed
    /// to this app.
    ///
    /// Requires a local profile and NFC switched on. Foreign and unreadable
    /// tags are skipped and listening continues. Callers should call
    /// [`end_receiving`](Self::end_receiving) before presenting a received
    /// contact, so a second detection cannot fire meanwhile.
    pub fn begin_receiving<F>(&self, on_contact: F) -> Result<(), ExchangeError>
    where
        F: Fn(UserProfile) + Send + Sync + 'static,
    {
        if !self.store.has_profile() {
            return Err(PreconditionError::NoLocalProfile.into());
        }
        if !self.transceiver.is_enabled() {
            return Err(PreconditionError::CapabilityDisabled.into());
        }

        let codec = self.codec.clone();
        self.transceiver
            .start_listening(Arc::new(move |bytes: Vec<u8>| {
                match codec.decode(&bytes) {
                    Some(profile) => {
                        info!("received profile");
                        on_contact(profile);
                    }
                    None => debug!(bytes = bytes.len(), "dropped tag without a profile for us"),
                }
            }))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::mock::{MockNfcHardware, MockTag};
    use crate::storage::MemoryKeyValueStore;
    use std::time::Duration;

    fn exchange() -> TagExchange<MockNfcHardware, MemoryKeyValueStore> {
        let transceiver =
            TagTransceiver::with_timeout(MockNfcHardware::new(), Duration::from_millis(20));
        transceiver.initialize();
        TagExchange::new(
            Arc::new(transceiver),
            Arc::new(ProfileStore::new(MemoryKeyValueStore::new())),
            PayloadCodec::default(),
        )
    }

    #[test]
    fn test_send_own_profile_requires_profile() {
        let exchange = exchange();
        assert!(matches!(
            exchange.send_own_profile(),
            Err(ExchangeError::Precondition(PreconditionError::NoLocalProfile))
        ));
    }

    #[test]
    fn test_receive_once_decodes_profile() {
        let exchange = exchange();
        let profile = UserProfile::new("Ann", "Lee", "a@x.com", "+1000");
        let bytes = exchange.codec().encode(&profile).unwrap();

        exchange
            .transceiver()
            .hardware()
            .present_tag(MockTag::with_message(bytes));
        assert_eq!(exchange.receive_once().unwrap(), Some(profile));
    }

    #[test]
    fn test_receive_once_without_tag_times_out() {
        let exchange = exchange();
        assert!(matches!(
            exchange.receive_once(),
            Err(ExchangeError::Transceiver(
                crate::exchange::TransceiverError::Timeout
            ))
        ));
    }
}
