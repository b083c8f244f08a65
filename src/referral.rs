// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::User;

/// `{origin}/register/?ref={code}`, or an empty string when there is no code.
pub fn referral_link(origin: &str, code: Option<&str>) -> String {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => format!("{}/register/?ref={}", origin.trim_end_matches('/'), code),
        None => String::new(),
    }
}

pub fn link_for_user(origin: &str, user: Option<&User>) -> String {
    referral_link(origin, user.and_then(|u| u.referral_code.as_deref()))
}
