// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies
//!
//! Reusable proptest strategies for property-based testing.

use proptest::prelude::*;

use tapcard_core::{CustomLink, UserProfile};

/// Strategy for generating names, including non-ASCII ones.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof!["[A-Z][a-z]{1,15}", "[А-Я][а-я]{1,15}", ".{1,30}"]
}

/// Strategy for generating email addresses.
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{3,10}", "[a-z]{2,8}", "[a-z]{2,4}")
        .prop_map(|(user, domain, tld)| format!("{}@{}.{}", user, domain, tld))
}

/// Strategy for generating phone numbers.
pub fn phone_strategy() -> impl Strategy<Value = String> {
    "[0-9]{10,15}".prop_map(|n| format!("+{}", n))
}

/// Strategy for generating URLs.
pub fn url_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{3,10}", "[a-z]{2,4}")
        .prop_map(|(domain, tld)| format!("https://{}.{}", domain, tld))
}

/// Strategy for generating custom links.
pub fn link_strategy() -> impl Strategy<Value = CustomLink> {
    (".{1,20}", url_strategy()).prop_map(|(label, url)| CustomLink { label, url })
}

/// Strategy for generating complete profiles.
pub fn profile_strategy() -> impl Strategy<Value = UserProfile> {
    (
        name_strategy(),
        name_strategy(),
        email_strategy(),
        phone_strategy(),
        proptest::option::of(url_strategy()),
        proptest::option::of(url_strategy()),
        prop::collection::vec(link_strategy(), 0..8),
    )
        .prop_map(
            |(first_name, last_name, email, phone, linkedin, github, custom_links)| UserProfile {
                first_name,
                last_name,
                email,
                phone,
                linkedin,
                github,
                custom_links,
            },
        )
}

/// Strategy for generating application identifiers.
pub fn app_identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z]{2,6}\\.[a-z]{2,10}\\.[a-z]{2,10}"
}
