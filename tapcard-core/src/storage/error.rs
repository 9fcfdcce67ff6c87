// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Storage error types.

use thiserror::Error;

use crate::profile::ValidationError;

/// Storage error types.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ValidationError),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}
