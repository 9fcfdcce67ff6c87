// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact Profile Model
//!
//! The profile a user shares over a tag, and the record kept for every
//! profile received from someone else.

mod validation;

pub use validation::{ValidationError, MAX_FIELD_LENGTH};

use serde::{Deserialize, Serialize};

/// A labelled link on a profile ("Portfolio", "Blog", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLink {
    pub label: String,
    pub url: String,
}

impl CustomLink {
    /// Creates a new custom link.
    pub fn new(label: &str, url: &str) -> Self {
        CustomLink {
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

/// A personal contact profile.
///
/// Field names on the wire and on disk are camelCase (`firstName`,
/// `customLinks`, ...). Optional links are omitted when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// Ordered; duplicates are allowed.
    #[serde(default)]
    pub custom_links: Vec<CustomLink>,
}

impl UserProfile {
    /// Creates a profile with the required fields and no links.
    pub fn new(first_name: &str, last_name: &str, email: &str, phone: &str) -> Self {
        UserProfile {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            linkedin: None,
            github: None,
            custom_links: Vec::new(),
        }
    }

    /// Sets the LinkedIn URL.
    pub fn with_linkedin(mut self, url: &str) -> Self {
        self.linkedin = Some(url.to_string());
        self
    }

    /// Sets the GitHub URL.
    pub fn with_github(mut self, url: &str) -> Self {
        self.github = Some(url.to_string());
        self
    }

    /// Appends a custom link.
    pub fn with_link(mut self, label: &str, url: &str) -> Self {
        self.custom_links.push(CustomLink::new(label, url));
        self
    }

    /// "First Last", trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Returns a copy with blank optional links turned into `None`.
    ///
    /// The profile editor submits empty text boxes as empty strings.
    pub fn normalized(&self) -> Self {
        let mut profile = self.clone();
        profile.linkedin = non_blank(profile.linkedin);
        profile.github = non_blank(profile.github);
        profile
    }

    /// Checks the invariants of a saved profile.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_profile(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A profile received from another device and saved locally.
///
/// Persisted flat: all profile fields plus `id` and `savedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedContact {
    /// Unique within the saved-contacts collection.
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub saved_at: u64,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl SavedContact {
    /// Returns the contact ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the saved profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }
}
