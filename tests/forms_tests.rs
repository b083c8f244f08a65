// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use lendclip::forms::{BidForm, FieldErrors, RegistrationForm};
use rust_decimal::Decimal;
use serde_json::json;

fn form() -> RegistrationForm {
    RegistrationForm {
        username: "amina".into(),
        email: "amina@example.com".into(),
        phone_number: "0712345678".into(),
        password: "secretpw12".into(),
        confirm_password: "secretpw12".into(),
        referral_code: Some(" ABC123 ".into()),
    }
}

#[test]
fn valid_registration_passes() {
    assert!(form().validate().is_ok());
    let req = form().to_request();
    assert_eq!(req.referral_code.as_deref(), Some("ABC123"));
}

#[test]
fn registration_rules() {
    let mut f = form();
    f.phone_number = "+254712345678".into();
    f.email = "amina.example.com".into();
    f.password = "short".into();
    f.confirm_password = "short".into();
    let errs = f.validate().unwrap_err();
    assert_eq!(
        errs.get("phone_number"),
        Some("Phone number must be in format 07XXXXXXXX")
    );
    assert_eq!(errs.get("email"), Some("Email is invalid"));
    assert_eq!(
        errs.get("password"),
        Some("Password must be at least 8 characters")
    );
    assert!(errs.get("confirm_password").is_none());

    let mut f = form();
    f.phone_number = "071234567".into();
    f.username = "  ".into();
    let errs = f.validate().unwrap_err();
    assert!(errs.get("phone_number").is_some());
    assert_eq!(errs.get("username"), Some("Username is required"));
}

#[test]
fn blank_referral_code_is_omitted() {
    let mut f = form();
    f.referral_code = Some("   ".into());
    assert!(f.to_request().referral_code.is_none());
}

#[test]
fn payload_mapping() {
    let f = FieldErrors::from_payload(
        &json!({"password2": ["Mismatch", "ignored"], "email": "Taken", "x": null}),
        "fallback",
    );
    assert_eq!(f.get("confirm_password"), Some("Mismatch"));
    assert_eq!(f.get("email"), Some("Taken"));
    assert_eq!(f.len(), 2);

    let f = FieldErrors::from_payload(&json!({"error": "Nope"}), "fallback");
    assert_eq!(f.summary(), "Nope");

    let f = FieldErrors::from_payload(&json!("plain text"), "fallback");
    assert_eq!(f.get("submit"), Some("fallback"));
    let f = FieldErrors::from_payload(&json!({}), "fallback");
    assert_eq!(f.get("submit"), Some("fallback"));
}

#[test]
fn bid_estimate_is_two_percent_per_day() {
    let bid = BidForm::new(Decimal::from(1000), 5);
    assert!(bid.validate().is_ok());
    assert_eq!(bid.estimated_return(), Decimal::from(1100));
    let bid = BidForm::new(Decimal::new(25050, 2), 40);
    assert_eq!(bid.estimated_return(), Decimal::new(45090, 2));
}

#[test]
fn bid_bounds() {
    assert!(BidForm::new(Decimal::from(100), 30).validate().is_ok());
    let errs = BidForm::new(Decimal::new(9999, 2), 5).validate().unwrap_err();
    assert_eq!(errs.get("amount"), Some("Minimum loan bid amount is Ksh 100"));
    let errs = BidForm::new(Decimal::from(500), 15).validate().unwrap_err();
    assert!(errs.get("maturity_period").unwrap().contains("5, 10, 20, 30, 40"));
}
