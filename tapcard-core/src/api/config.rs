// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration for a Tapcard instance

use std::path::PathBuf;
use std::time::Duration;

use crate::exchange::{DEFAULT_APP_IDENTIFIER, DEFAULT_LANGUAGE_CODE, DEFAULT_SESSION_TIMEOUT};

/// Configuration for a Tapcard instance
#[derive(Debug, Clone)]
pub struct TapcardConfig {
    /// SQLite database holding the profile and saved contacts
    pub storage_path: PathBuf,

    /// Identifier written into, and required on, exchanged payloads
    pub app_identifier: String,

    /// How long a manual read or write waits for a tag
    pub session_timeout: Duration,

    /// Language code of written NDEF text records
    pub language_code: String,
}

impl Default for TapcardConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("tapcard.db"),
            app_identifier: DEFAULT_APP_IDENTIFIER.to_string(),
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
        }
    }
}

impl TapcardConfig {
    /// Store data at the given path
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Exchange payloads under a different application identifier
    pub fn with_app_identifier(mut self, app_identifier: &str) -> Self {
        self.app_identifier = app_identifier.to_string();
        self
    }

    /// Wait at most `timeout` for a tag
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Write text records in a different language
    pub fn with_language_code(mut self, language_code: &str) -> Self {
        self.language_code = language_code.to_string();
        self
    }
}
