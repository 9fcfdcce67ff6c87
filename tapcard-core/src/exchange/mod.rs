// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact Exchange Module
//!
//! Profile exchange over NFC tags: the NDEF wire format, the application
//! envelope, the hardware session lifecycle and the exchange flow on top.

mod error;
mod hardware;
mod mock;
pub mod ndef;
mod payload;
mod tag_exchange;
mod transceiver;

pub use error::{ExchangeError, PreconditionError, TransceiverError};
pub use hardware::{NfcHardware, NfcHardwareError, TagEventCallback};
pub use mock::{MockNfcHardware, MockTag, DEFAULT_TAG_CAPACITY};
pub use ndef::{NdefError, NdefMessage, NdefRecord, Tnf};
pub use payload::{
    ExchangePayload, PayloadCodec, PayloadError, DEFAULT_APP_IDENTIFIER, DEFAULT_LANGUAGE_CODE,
    PAYLOAD_VERSION,
};
pub use tag_exchange::TagExchange;
pub use transceiver::{
    DetectionCallback, TagTransceiver, TransceiverState, DEFAULT_SESSION_TIMEOUT,
};
