// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tapcard API Layer
//!
//! High-level API for exchanging contact profiles over NFC.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for the API layer
//! - [`config`] - Configuration types
//! - [`tapcard`] - Main Tapcard orchestrator

pub mod config;
pub mod error;
pub mod tapcard;

pub use config::TapcardConfig;
pub use error::{TapcardError, TapcardResult};
pub use tapcard::Tapcard;
