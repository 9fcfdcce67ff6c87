// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Profile Validation

use thiserror::Error;

use super::UserProfile;

/// Maximum length of any single profile value, in characters.
pub const MAX_FIELD_LENGTH: usize = 1024;

/// Validation error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyValue { field: &'static str },
    #[error("{field} is too long (max {max} characters)")]
    ValueTooLong { field: &'static str, max: usize },
    #[error("Custom link {index} needs both a label and a URL")]
    IncompleteLink { index: usize },
}

pub(super) fn validate_profile(profile: &UserProfile) -> Result<(), ValidationError> {
    required("first name", &profile.first_name)?;
    required("last name", &profile.last_name)?;
    required("email", &profile.email)?;
    required("phone", &profile.phone)?;

    if let Some(linkedin) = &profile.linkedin {
        bounded("linkedin", linkedin)?;
    }
    if let Some(github) = &profile.github {
        bounded("github", github)?;
    }

    for (index, link) in profile.custom_links.iter().enumerate() {
        if link.label.trim().is_empty() || link.url.trim().is_empty() {
            return Err(ValidationError::IncompleteLink { index });
        }
        bounded("link label", &link.label)?;
        bounded("link url", &link.url)?;
    }

    Ok(())
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyValue { field });
    }
    bounded(field, value)
}

fn bounded(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::ValueTooLong {
            field,
            max: MAX_FIELD_LENGTH,
        });
    }
    Ok(())
}
