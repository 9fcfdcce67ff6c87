// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tapcard Core Library
//!
//! Contact profile exchange between phones over NFC tags, and local
//! storage of the profiles received.

pub mod api;
pub mod exchange;
pub mod profile;
pub mod storage;

pub use api::{Tapcard, TapcardConfig, TapcardError, TapcardResult};
pub use exchange::{
    ExchangeError, ExchangePayload, MockNfcHardware, MockTag, NfcHardware, NfcHardwareError,
    PayloadCodec, PreconditionError, TagExchange, TagTransceiver, TransceiverError,
    TransceiverState, DEFAULT_APP_IDENTIFIER,
};
pub use profile::{CustomLink, SavedContact, UserProfile, ValidationError};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, ProfileStore, SqliteKeyValueStore, StorageError,
};
