// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exchange Payload Codec
//!
//! A profile travels as one NDEF text record holding a JSON envelope:
//!
//! ```text
//! {"app": "com.nfccontactshare.app", "version": 1, "profile": {...}}
//! ```
//!
//! Readers only accept envelopes carrying their own application identifier.
//! Anything else found on a tag (other apps' records, broken JSON, newer
//! envelope versions) is skipped, never reported as an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::ndef::{NdefError, NdefMessage, NdefRecord};
use crate::profile::UserProfile;

/// Application identifier written into every envelope.
pub const DEFAULT_APP_IDENTIFIER: &str = "com.nfccontactshare.app";

/// Envelope version written by this codec. Envelopes without a version
/// field are treated as version 1.
pub const PAYLOAD_VERSION: u32 = 1;

/// Default NDEF text record language.
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Errors producing a payload.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("NDEF encoding failed: {0}")]
    Ndef(#[from] NdefError),
}

/// The JSON envelope inside the text record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangePayload {
    /// Application identifier; must match exactly.
    pub app: String,
    #[serde(default = "default_version")]
    pub version: u32,
    /// Absent in some foreign envelopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

fn default_version() -> u32 {
    1
}

/// Encodes profiles to tag bytes and decodes them back.
#[derive(Debug, Clone)]
pub struct PayloadCodec {
    app_identifier: String,
    language_code: String,
}

impl Default for PayloadCodec {
    fn default() -> Self {
        PayloadCodec::new(DEFAULT_APP_IDENTIFIER)
    }
}

impl PayloadCodec {
    /// Creates a codec for the given application identifier.
    pub fn new(app_identifier: &str) -> Self {
        PayloadCodec {
            app_identifier: app_identifier.to_string(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
        }
    }

    /// Sets the language code of written text records.
    pub fn with_language_code(mut self, language_code: &str) -> Self {
        self.language_code = language_code.to_string();
        self
    }

    /// Returns the application identifier.
    pub fn app_identifier(&self) -> &str {
        &self.app_identifier
    }

    /// Encodes a profile as an NDEF message with a single text record.
    pub fn encode(&self, profile: &UserProfile) -> Result<Vec<u8>, PayloadError> {
        let envelope = ExchangePayload {
            app: self.app_identifier.clone(),
            version: PAYLOAD_VERSION,
            profile: Some(profile.clone()),
        };
        let json = serde_json::to_string(&envelope)
            .map_err(|e| PayloadError::Serialization(e.to_string()))?;

        let record = NdefRecord::text(&self.language_code, &json)?;
        Ok(NdefMessage::new(vec![record]).to_bytes())
    }

    /// Decodes the first profile addressed to this application.
    ///
    /// Returns None for foreign, malformed or empty payloads.
    pub fn decode(&self, bytes: &[u8]) -> Option<UserProfile> {
        let message = match NdefMessage::parse(bytes) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "tag message is not valid NDEF");
                return None;
            }
        };

        let found = message
            .records
            .iter()
            .enumerate()
            .find_map(|(index, record)| self.decode_record(index, record));

        if found.is_none() {
            debug!(
                records = message.records.len(),
                "no record addressed to this app"
            );
        }
        found
    }

    fn decode_record(&self, index: usize, record: &NdefRecord) -> Option<UserProfile> {
        if !record.is_text() {
            return None;
        }

        let content = match record.text_content() {
            Ok(content) => content,
            Err(e) => {
                warn!(record = index, error = %e, "unreadable text record");
                return None;
            }
        };

        let envelope: ExchangePayload = match serde_json::from_str(&content.text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(record = index, error = %e, "text record is not an exchange envelope");
                return None;
            }
        };

        if envelope.app != self.app_identifier {
            debug!(record = index, app = %envelope.app, "ignoring foreign envelope");
            return None;
        }
        if envelope.version > PAYLOAD_VERSION {
            warn!(
                record = index,
                version = envelope.version,
                "envelope version not supported"
            );
            return None;
        }

        envelope.profile
    }
}
