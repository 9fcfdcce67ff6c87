// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! NFC Hardware Interface
//!
//! The platform NFC capability as seen by the transceiver. Mobile bindings
//! implement [`NfcHardware`] over the OS NFC manager; [`super::MockNfcHardware`]
//! implements it for tests.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Called by the platform every time a tag enters the field while a tag
/// event is registered.
pub type TagEventCallback = Arc<dyn Fn() + Send + Sync>;

/// Errors reported by the platform NFC layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NfcHardwareError {
    #[error("NFC is not supported on this device")]
    NotSupported,

    #[error("NFC manager has not been started")]
    NotStarted,

    #[error("NFC is disabled")]
    Disabled,

    #[error("Another NFC session is already active")]
    Busy,

    #[error("No tag was presented in time")]
    NoTag,

    #[error("No NFC session is active")]
    NoSession,

    #[error("Tag does not support NDEF")]
    Incompatible,

    #[error("Tag is read-only")]
    ReadOnly,

    #[error("Message does not fit on the tag ({size} > {capacity} bytes)")]
    CapacityExceeded { size: usize, capacity: usize },

    #[error("Tag was lost during the operation")]
    TagLost,

    #[error("Session was cancelled")]
    Cancelled,

    #[error("Platform error: {0}")]
    Platform(String),
}

/// Platform NFC capability.
///
/// A technology request opens the single exclusive session the platform
/// allows. Every successful or failed `request_technology` must be
/// followed by `cancel_technology_request`.
pub trait NfcHardware: Send + Sync {
    /// Checks whether the device has NFC at all.
    fn is_supported(&self) -> Result<bool, NfcHardwareError>;

    /// Starts the platform NFC manager.
    fn start(&self) -> Result<(), NfcHardwareError>;

    /// Checks whether NFC is switched on.
    fn is_enabled(&self) -> Result<bool, NfcHardwareError>;

    /// Opens an exclusive NDEF session, waiting up to `timeout` for a tag.
    fn request_technology(&self, timeout: Duration) -> Result<(), NfcHardwareError>;

    /// Closes the current session. Safe to call without one.
    fn cancel_technology_request(&self);

    /// Reads the NDEF message of the tag in the current session.
    ///
    /// Returns None if the tag holds no message.
    fn read_message(&self) -> Result<Option<Vec<u8>>, NfcHardwareError>;

    /// Writes an NDEF message to the tag in the current session.
    fn write_message(&self, message: &[u8]) -> Result<(), NfcHardwareError>;

    /// Registers for tag detection events, replacing any earlier callback.
    fn register_tag_event(&self, on_tag: TagEventCallback) -> Result<(), NfcHardwareError>;

    /// Unregisters tag detection events. Safe to call when not registered.
    fn unregister_tag_event(&self) -> Result<(), NfcHardwareError>;
}

impl<T: NfcHardware + ?Sized> NfcHardware for Arc<T> {
    fn is_supported(&self) -> Result<bool, NfcHardwareError> {
        (**self).is_supported()
    }

    fn start(&self) -> Result<(), NfcHardwareError> {
        (**self).start()
    }

    fn is_enabled(&self) -> Result<bool, NfcHardwareError> {
        (**self).is_enabled()
    }

    fn request_technology(&self, timeout: Duration) -> Result<(), NfcHardwareError> {
        (**self).request_technology(timeout)
    }

    fn cancel_technology_request(&self) {
        (**self).cancel_technology_request()
    }

    fn read_message(&self) -> Result<Option<Vec<u8>>, NfcHardwareError> {
        (**self).read_message()
    }

    fn write_message(&self, message: &[u8]) -> Result<(), NfcHardwareError> {
        (**self).write_message(message)
    }

    fn register_tag_event(&self, on_tag: TagEventCallback) -> Result<(), NfcHardwareError> {
        (**self).register_tag_event(on_tag)
    }

    fn unregister_tag_event(&self) -> Result<(), NfcHardwareError> {
        (**self).unregister_tag_event()
    }
}
