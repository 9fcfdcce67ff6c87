// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exchange Error Types

use thiserror::Error;

use super::hardware::NfcHardwareError;
use super::payload::PayloadError;

/// Errors from a tag read, write or listener registration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransceiverError {
    #[error("NFC is unavailable: {0}")]
    Unavailable(String),

    #[error("An NFC session is already active")]
    SessionBusy,

    #[error("Timed out waiting for a tag")]
    Timeout,

    #[error("Tag is not compatible")]
    IncompatibleTag,

    #[error("Tag rejected the write: {0}")]
    WriteRejected(String),

    #[error("Tag read failed: {0}")]
    ReadFailed(String),

    #[error("Tag write failed: {0}")]
    WriteFailed(String),

    #[error("NFC session was cancelled")]
    Cancelled,
}

impl TransceiverError {
    /// Maps a hardware error raised while writing. Plain `From` treats
    /// failures as read failures.
    pub(crate) fn from_write(err: NfcHardwareError) -> Self {
        match err {
            NfcHardwareError::ReadOnly | NfcHardwareError::CapacityExceeded { .. } => {
                TransceiverError::WriteRejected(err.to_string())
            }
            NfcHardwareError::TagLost | NfcHardwareError::Platform(_) => {
                TransceiverError::WriteFailed(err.to_string())
            }
            other => other.into(),
        }
    }
}

impl From<NfcHardwareError> for TransceiverError {
    fn from(err: NfcHardwareError) -> Self {
        match err {
            NfcHardwareError::NotSupported
            | NfcHardwareError::NotStarted
            | NfcHardwareError::Disabled
            | NfcHardwareError::NoSession => TransceiverError::Unavailable(err.to_string()),
            NfcHardwareError::Busy => TransceiverError::SessionBusy,
            NfcHardwareError::NoTag => TransceiverError::Timeout,
            NfcHardwareError::Incompatible => TransceiverError::IncompatibleTag,
            NfcHardwareError::Cancelled => TransceiverError::Cancelled,
            NfcHardwareError::ReadOnly | NfcHardwareError::CapacityExceeded { .. } => {
                TransceiverError::WriteRejected(err.to_string())
            }
            NfcHardwareError::TagLost | NfcHardwareError::Platform(_) => {
                TransceiverError::ReadFailed(err.to_string())
            }
        }
    }
}

/// Conditions checked before an exchange starts.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Create your profile before exchanging contacts")]
    NoLocalProfile,

    #[error("NFC is switched off")]
    CapabilityDisabled,
}

/// Errors that can occur during a contact exchange.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("{0}")]
    Precondition(#[from] PreconditionError),

    #[error("NFC error: {0}")]
    Transceiver(#[from] TransceiverError),

    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),
}
