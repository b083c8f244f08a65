// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use lendclip::commands::referrals::paged_summary;
use lendclip::models::{ReferralSummary, User};
use lendclip::referral::{link_for_user, referral_link};
use serde_json::json;

#[test]
fn link_embeds_code() {
    assert_eq!(
        referral_link("https://example.com", Some("ABC123")),
        "https://example.com/register/?ref=ABC123"
    );
    assert_eq!(
        referral_link("https://example.com/", Some("ABC123")),
        "https://example.com/register/?ref=ABC123"
    );
}

#[test]
fn no_user_or_code_gives_empty_link() {
    assert_eq!(link_for_user("https://example.com", None), "");
    let user: User = serde_json::from_value(json!({"username": "amina"})).unwrap();
    assert_eq!(link_for_user("https://example.com", Some(&user)), "");
    assert_eq!(referral_link("https://example.com", Some("  ")), "");
}

#[test]
fn history_rows_fall_back_sensibly() {
    let summary: ReferralSummary = serde_json::from_value(json!({
        "total_referrals": 2,
        "total_earnings": "150.50",
        "referral_history": [
            {"created_at": "2025-07-01T10:00:00Z", "referred": {"username": "brian"},
             "amount_invested": 1000, "bonus_earned": 50, "status": "pending"},
            {"date": "2025-07-02", "username": "chao", "amount_invested": 0, "status": "pending"}
        ],
        "referred_users": [{"id": 4, "username": "brian", "is_active": true}]
    }))
    .unwrap();
    let h = &summary.referral_history;
    assert_eq!(h[0].display_username(), "brian");
    assert_eq!(h[0].display_status(), "Pending");
    assert_eq!(h[1].display_status(), "No Investment");
    assert_eq!(h[1].display_date(), "2025-07-02");
    assert_eq!(summary.referred_users[0].display_status(), "Active");
    assert_eq!(summary.available_bonus, rust_decimal::Decimal::ZERO);
}

#[test]
fn json_summary_pages_history_like_the_table() {
    let history: Vec<_> = (1..=23)
        .map(|i| {
            json!({"username": format!("user{}", i), "amount_invested": 100, "status": "paired"})
        })
        .collect();
    let summary: ReferralSummary = serde_json::from_value(json!({
        "total_referrals": 23,
        "referral_history": history,
        "referred_users": [{"username": "user1", "is_active": true}]
    }))
    .unwrap();

    let first = paged_summary(&summary, 1);
    assert_eq!(first.referral_history.len(), 10);
    assert_eq!(first.referral_history[0].display_username(), "user1");
    assert_eq!(first.total_referrals, 23);
    assert_eq!(first.referred_users.len(), 1);

    let last = paged_summary(&summary, 3);
    assert_eq!(last.referral_history.len(), 3);
    assert_eq!(last.referral_history[0].display_username(), "user21");

    let clamped = paged_summary(&summary, 99);
    assert_eq!(clamped.referral_history.len(), 3);
}
