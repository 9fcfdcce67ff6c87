// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tag Transceiver
//!
//! Owns the NFC capability lifecycle: one exclusive session per read or
//! write, always released on the way out, and a background listener that
//! performs one read per detected tag.
//!
//! ```text
//! Idle -> CapabilityRequested -> Active -> Idle
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::error::TransceiverError;
use super::hardware::{NfcHardware, TagEventCallback};

/// Default bound on waiting for a tag in a manual read or write.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Receives the raw message of every tag detected while listening.
pub type DetectionCallback = Arc<dyn Fn(Vec<u8>) + Send + Sync>;

/// Session state of the transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransceiverState {
    /// No session open.
    Idle,
    /// Waiting for the platform to grant a session.
    CapabilityRequested,
    /// Session open, reading or writing.
    Active,
}

struct Listener {
    generation: u64,
    on_detected: DetectionCallback,
}

struct Shared<H: NfcHardware> {
    hardware: H,
    session_timeout: Duration,
    initialized: Mutex<bool>,
    state: Mutex<TransceiverState>,
    /// Held for the lifetime of a session.
    session_lock: Mutex<()>,
    listener: Mutex<Option<Listener>>,
    /// Held while a detection is read and dispatched.
    dispatch_lock: Mutex<()>,
    generation: AtomicU64,
}

/// Releases the session when dropped.
struct SessionGuard<'a, H: NfcHardware> {
    shared: &'a Shared<H>,
    _serial: parking_lot::MutexGuard<'a, ()>,
}

impl<H: NfcHardware> Drop for SessionGuard<'_, H> {
    fn drop(&mut self) {
        self.shared.hardware.cancel_technology_request();
        *self.shared.state.lock() = TransceiverState::Idle;
        debug!("released NFC session");
    }
}

impl<H: NfcHardware> Shared<H> {
    fn open_session(&self) -> Result<SessionGuard<'_, H>, TransceiverError> {
        let serial = self
            .session_lock
            .try_lock_for(self.session_timeout)
            .ok_or(TransceiverError::SessionBusy)?;

        *self.state.lock() = TransceiverState::CapabilityRequested;
        // Created before the request so a failed request is cancelled too.
        let guard = SessionGuard {
            shared: self,
            _serial: serial,
        };

        debug!(timeout_ms = self.session_timeout.as_millis() as u64, "requesting NFC session");
        self.hardware.request_technology(self.session_timeout)?;

        *self.state.lock() = TransceiverState::Active;
        Ok(guard)
    }

    fn read_once(&self) -> Result<Option<Vec<u8>>, TransceiverError> {
        let _session = self.open_session()?;
        let message = self.hardware.read_message()?;

        match message {
            Some(bytes) if !bytes.is_empty() => {
                debug!(bytes = bytes.len(), "read message from tag");
                Ok(Some(bytes))
            }
            _ => {
                debug!("tag carries no message");
                Ok(None)
            }
        }
    }

    fn current_listener(&self, generation: u64) -> Option<DetectionCallback> {
        self.listener
            .lock()
            .as_ref()
            .filter(|l| l.generation == generation)
            .map(|l| Arc::clone(&l.on_detected))
    }

    fn handle_tag_event(&self, generation: u64) {
        let _dispatch = self.dispatch_lock.lock();

        if self.current_listener(generation).is_none() {
            debug!(generation, "ignoring detection for stopped listener");
            return;
        }

        match self.read_once() {
            Ok(Some(bytes)) => {
                // The listener may have been stopped while reading.
                if let Some(on_detected) = self.current_listener(generation) {
                    on_detected(bytes);
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "reading detected tag failed"),
        }
    }
}

/// NFC tag reader/writer over platform hardware.
///
/// Manual [`write`](Self::write) and [`read_once`](Self::read_once) calls
/// and listener reads share one session slot; a call that cannot get it
/// within the session timeout fails with [`TransceiverError::SessionBusy`].
pub struct TagTransceiver<H: NfcHardware> {
    shared: Arc<Shared<H>>,
}

impl<H: NfcHardware> TagTransceiver<H> {
    /// Creates a transceiver with the default session timeout.
    pub fn new(hardware: H) -> Self {
        Self::with_timeout(hardware, DEFAULT_SESSION_TIMEOUT)
    }

    /// Creates a transceiver that waits at most `session_timeout` for a tag.
    pub fn with_timeout(hardware: H, session_timeout: Duration) -> Self {
        TagTransceiver {
            shared: Arc::new(Shared {
                hardware,
                session_timeout,
                initialized: Mutex::new(false),
                state: Mutex::new(TransceiverState::Idle),
                session_lock: Mutex::new(()),
                listener: Mutex::new(None),
                dispatch_lock: Mutex::new(()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the hardware.
    pub fn hardware(&self) -> &H {
        &self.shared.hardware
    }

    /// Returns the session timeout.
    pub fn session_timeout(&self) -> Duration {
        self.shared.session_timeout
    }

    /// Returns the current session state.
    pub fn state(&self) -> TransceiverState {
        *self.shared.state.lock()
    }

    /// Checks NFC support and starts the platform NFC manager.
    ///
    /// Returns whether NFC is usable. Once it has succeeded, later calls
    /// return true without touching the platform again.
    pub fn initialize(&self) -> bool {
        let mut initialized = self.shared.initialized.lock();
        if *initialized {
            return true;
        }

        let hardware = &self.shared.hardware;
        match hardware.is_supported() {
            Ok(true) => {}
            Ok(false) => {
                info!("NFC is not supported on this device");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "NFC support check failed");
                return false;
            }
        }

        if let Err(e) = hardware.start() {
            warn!(error = %e, "failed to start NFC manager");
            return false;
        }

        *initialized = true;
        info!("NFC initialized");
        true
    }

    /// Checks whether NFC is switched on. Errors count as off.
    pub fn is_enabled(&self) -> bool {
        match self.shared.hardware.is_enabled() {
            Ok(enabled) => enabled,
            Err(e) => {
                warn!(error = %e, "NFC enabled check failed");
                false
            }
        }
    }

    /// Writes an NDEF message to the next tag brought into range.
    ///
    /// Not retried on failure.
    pub fn write(&self, message: &[u8]) -> Result<(), TransceiverError> {
        let _session = self.shared.open_session()?;
        self.shared
            .hardware
            .write_message(message)
            .map_err(TransceiverError::from_write)?;

        info!(bytes = message.len(), "wrote message to tag");
        Ok(())
    }

    /// Reads the NDEF message of the next tag brought into range.
    ///
    /// Returns None if the tag holds no message.
    pub fn read_once(&self) -> Result<Option<Vec<u8>>, TransceiverError> {
        self.shared.read_once()
    }

    /// Returns true while a listener is registered.
    pub fn is_listening(&self) -> bool {
        self.shared.listener.lock().is_some()
    }

    /// Stops listening. Safe to call when not listening.
    ///
    /// Also releases any session that is still open.
    pub fn stop_listening(&self) {
        let previous = self.shared.listener.lock().take();

        if let Err(e) = self.shared.hardware.unregister_tag_event() {
            warn!(error = %e, "failed to unregister tag event");
        }
        {
            // Held across the check so a session opening meanwhile is not
            // cancelled. A cancel that reaches the platform before it has
            // registered the request is lost; that request runs to its
            // timeout.
            let state = self.shared.state.lock();
            if *state != TransceiverState::Idle {
                self.shared.hardware.cancel_technology_request();
            }
        }

        if let Some(listener) = previous {
            debug!(generation = listener.generation, "stopped listening");
        }
    }
}

impl<H: NfcHardware + 'static> TagTransceiver<H> {
    /// Starts reading every tag that comes into range.
    ///
    /// `on_detected` gets the raw message of each tag that carries one.
    /// Invocations are serialized, in detection order. Registering again
    /// replaces the previous callback.
    pub fn start_listening(&self, on_detected: DetectionCallback) -> Result<(), TransceiverError> {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.shared.listener.lock() = Some(Listener {
            generation,
            on_detected,
        });

        let weak: Weak<Shared<H>> = Arc::downgrade(&self.shared);
        let on_tag: TagEventCallback = Arc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.handle_tag_event(generation);
            }
        });

        if let Err(e) = self.shared.hardware.register_tag_event(on_tag) {
            let mut listener = self.shared.listener.lock();
            if listener.as_ref().map(|l| l.generation) == Some(generation) {
                *listener = None;
            }
            warn!(error = %e, "failed to register tag event");
            return Err(e.into());
        }

        info!(generation, "listening for tags");
        Ok(())
    }
}

impl<H: NfcHardware> Drop for TagTransceiver<H> {
    fn drop(&mut self) {
        if self.is_listening() {
            self.stop_listening();
        }
    }
}
