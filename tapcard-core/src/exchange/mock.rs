// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock NFC Hardware
//!
//! A scripted NFC reader for tests and desktop demos. Tags are shared
//! handles, so one tag can be written through one reader and read through
//! another.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::hardware::{NfcHardware, NfcHardwareError, TagEventCallback};

/// Capacity of a default mock tag, in bytes.
pub const DEFAULT_TAG_CAPACITY: usize = 8 * 1024;

struct TagState {
    message: Option<Vec<u8>>,
    read_only: bool,
    ndef: bool,
    capacity: usize,
    writes: usize,
}

/// A simulated NFC tag (or a phone emulating one).
#[derive(Clone)]
pub struct MockTag {
    inner: Arc<Mutex<TagState>>,
}

impl MockTag {
    /// Creates an empty, writable NDEF tag.
    pub fn blank() -> Self {
        MockTag {
            inner: Arc::new(Mutex::new(TagState {
                message: None,
                read_only: false,
                ndef: true,
                capacity: DEFAULT_TAG_CAPACITY,
                writes: 0,
            })),
        }
    }

    /// Creates a tag already holding a message.
    pub fn with_message(message: Vec<u8>) -> Self {
        let tag = MockTag::blank();
        tag.set_message(Some(message));
        tag
    }

    /// Makes the tag reject writes.
    pub fn read_only(self) -> Self {
        self.inner.lock().read_only = true;
        self
    }

    /// Makes the tag a non-NDEF tag.
    pub fn incompatible(self) -> Self {
        self.inner.lock().ndef = false;
        self
    }

    /// Limits how many bytes the tag can hold.
    pub fn with_capacity(self, capacity: usize) -> Self {
        self.inner.lock().capacity = capacity;
        self
    }

    /// Returns the stored message.
    pub fn message(&self) -> Option<Vec<u8>> {
        self.inner.lock().message.clone()
    }

    /// Replaces the stored message directly.
    pub fn set_message(&self, message: Option<Vec<u8>>) {
        self.inner.lock().message = message;
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes
    }
}

#[derive(Default)]
struct MockState {
    supported: bool,
    enabled: bool,
    started: bool,
    start_calls: usize,
    field: Option<MockTag>,
    session: bool,
    sessions_opened: usize,
    listener: Option<TagEventCallback>,
    request_failure: Option<NfcHardwareError>,
    read_failure: Option<NfcHardwareError>,
    write_failure: Option<NfcHardwareError>,
}

/// Scripted NFC hardware.
///
/// Enforces the platform rules the transceiver relies on: one session at a
/// time, and reads/writes only inside a session.
pub struct MockNfcHardware {
    state: Mutex<MockState>,
    tag_arrived: Condvar,
}

impl Default for MockNfcHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNfcHardware {
    /// Creates supported, enabled, not yet started hardware.
    pub fn new() -> Self {
        MockNfcHardware {
            state: Mutex::new(MockState {
                supported: true,
                enabled: true,
                ..MockState::default()
            }),
            tag_arrived: Condvar::new(),
        }
    }

    /// Creates hardware for a device without NFC.
    pub fn unsupported() -> Self {
        let hardware = Self::new();
        hardware.state.lock().supported = false;
        hardware
    }

    /// Switches NFC on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    /// Brings a tag into the field and fires the tag event, if registered.
    ///
    /// The event callback runs on the calling thread.
    pub fn present_tag(&self, tag: MockTag) {
        let listener = {
            let mut state = self.state.lock();
            state.field = Some(tag);
            self.tag_arrived.notify_all();
            state.listener.clone()
        };

        if let Some(on_tag) = listener {
            on_tag();
        }
    }

    /// Takes the tag out of the field.
    pub fn remove_tag(&self) {
        self.state.lock().field = None;
    }

    /// Makes the next technology request fail.
    pub fn fail_next_request(&self, error: NfcHardwareError) {
        self.state.lock().request_failure = Some(error);
    }

    /// Makes the next read fail.
    pub fn fail_next_read(&self, error: NfcHardwareError) {
        self.state.lock().read_failure = Some(error);
    }

    /// Makes the next write fail.
    pub fn fail_next_write(&self, error: NfcHardwareError) {
        self.state.lock().write_failure = Some(error);
    }

    pub fn is_started(&self) -> bool {
        self.state.lock().started
    }

    /// How many times `start` reached the platform.
    pub fn start_count(&self) -> usize {
        self.state.lock().start_calls
    }

    /// Whether an exclusive session is currently open.
    pub fn is_session_active(&self) -> bool {
        self.state.lock().session
    }

    /// Total number of sessions opened so far.
    pub fn sessions_opened(&self) -> usize {
        self.state.lock().sessions_opened
    }

    pub fn has_tag_listener(&self) -> bool {
        self.state.lock().listener.is_some()
    }

    fn tag_in_session(&self, state: &MockState) -> Result<MockTag, NfcHardwareError> {
        if !state.session {
            return Err(NfcHardwareError::NoSession);
        }
        state.field.clone().ok_or(NfcHardwareError::TagLost)
    }
}

impl NfcHardware for MockNfcHardware {
    fn is_supported(&self) -> Result<bool, NfcHardwareError> {
        Ok(self.state.lock().supported)
    }

    fn start(&self) -> Result<(), NfcHardwareError> {
        let mut state = self.state.lock();
        if !state.supported {
            return Err(NfcHardwareError::NotSupported);
        }
        state.started = true;
        state.start_calls += 1;
        Ok(())
    }

    fn is_enabled(&self) -> Result<bool, NfcHardwareError> {
        let state = self.state.lock();
        if !state.supported {
            return Err(NfcHardwareError::NotSupported);
        }
        Ok(state.enabled)
    }

    fn request_technology(&self, timeout: Duration) -> Result<(), NfcHardwareError> {
        let mut state = self.state.lock();
        if !state.supported {
            return Err(NfcHardwareError::NotSupported);
        }
        if !state.started {
            return Err(NfcHardwareError::NotStarted);
        }
        if !state.enabled {
            return Err(NfcHardwareError::Disabled);
        }
        if state.session {
            return Err(NfcHardwareError::Busy);
        }

        // From here on the request is pending and must be cancelled.
        state.session = true;
        state.sessions_opened += 1;

        if let Some(error) = state.request_failure.take() {
            return Err(error);
        }

        let deadline = Instant::now() + timeout;
        while state.field.is_none() {
            if self
                .tag_arrived
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                break;
            }
            if !state.session {
                return Err(NfcHardwareError::Cancelled);
            }
        }

        if state.field.is_none() {
            return Err(NfcHardwareError::NoTag);
        }
        Ok(())
    }

    fn cancel_technology_request(&self) {
        let mut state = self.state.lock();
        state.session = false;
        self.tag_arrived.notify_all();
    }

    fn read_message(&self) -> Result<Option<Vec<u8>>, NfcHardwareError> {
        let mut state = self.state.lock();
        let tag = self.tag_in_session(&state)?;
        if let Some(error) = state.read_failure.take() {
            return Err(error);
        }
        drop(state);

        let tag = tag.inner.lock();
        if !tag.ndef {
            return Err(NfcHardwareError::Incompatible);
        }
        Ok(tag.message.clone())
    }

    fn write_message(&self, message: &[u8]) -> Result<(), NfcHardwareError> {
        let mut state = self.state.lock();
        let tag = self.tag_in_session(&state)?;
        if let Some(error) = state.write_failure.take() {
            return Err(error);
        }
        drop(state);

        let mut tag = tag.inner.lock();
        if !tag.ndef {
            return Err(NfcHardwareError::Incompatible);
        }
        if tag.read_only {
            return Err(NfcHardwareError::ReadOnly);
        }
        if message.len() > tag.capacity {
            return Err(NfcHardwareError::CapacityExceeded {
                size: message.len(),
                capacity: tag.capacity,
            });
        }
        tag.message = Some(message.to_vec());
        tag.writes += 1;
        Ok(())
    }

    fn register_tag_event(&self, on_tag: TagEventCallback) -> Result<(), NfcHardwareError> {
        let mut state = self.state.lock();
        if !state.supported {
            return Err(NfcHardwareError::NotSupported);
        }
        if !state.started {
            return Err(NfcHardwareError::NotStarted);
        }
        state.listener = Some(on_tag);
        Ok(())
    }

    fn unregister_tag_event(&self) -> Result<(), NfcHardwareError> {
        self.state.lock().listener = None;
        Ok(())
    }
}
