// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! API Error Types
//!
//! Unified error type for the Tapcard API layer.

use thiserror::Error;

use crate::exchange::{ExchangeError, PreconditionError, TransceiverError};
use crate::profile::ValidationError;
use crate::storage::StorageError;

/// Unified error type for Tapcard operations.
#[derive(Error, Debug)]
pub enum TapcardError {
    /// Profile validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// Exchange failed.
    #[error("exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<StorageError> for TapcardError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidProfile(e) => TapcardError::Validation(e),
            other => TapcardError::Storage(other),
        }
    }
}

impl From<TransceiverError> for TapcardError {
    fn from(err: TransceiverError) -> Self {
        TapcardError::Exchange(err.into())
    }
}

impl From<PreconditionError> for TapcardError {
    fn from(err: PreconditionError) -> Self {
        TapcardError::Exchange(err.into())
    }
}

/// Result type for Tapcard operations.
pub type TapcardResult<T> = Result<T, TapcardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_profile_surfaces_as_validation() {
        let err: TapcardError = StorageError::InvalidProfile(ValidationError::EmptyValue {
            field: "firstName",
        })
        .into();
        assert!(matches!(err, TapcardError::Validation(_)));

        let err: TapcardError = StorageError::Backend("disk full".into()).into();
        assert!(matches!(err, TapcardError::Storage(_)));
    }
}
