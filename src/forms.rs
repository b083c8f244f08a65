// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::{CreateBidRequest, RegisterRequest};

pub const MIN_BID_AMOUNT: i64 = 100;
pub const MATURITY_PERIODS: [u32; 5] = [5, 10, 20, 30, 40];
pub const DEFAULT_MATURITY_PERIOD: u32 = 5;
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^07\d{8}$").expect("phone regex"));

/// Field name -> first error message. `submit` holds form-level errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(msg: impl Into<String>) -> Self {
        let mut f = Self::new();
        f.insert("submit", msg);
        f
    }

    pub fn insert(&mut self, field: &str, msg: impl Into<String>) {
        self.0.insert(field.to_string(), msg.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn summary(&self) -> String {
        if let Some(s) = self.get("submit") {
            if self.len() == 1 {
                return s.to_string();
            }
        }
        self.iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Map a server error payload onto form fields.
    ///
    /// `{"error": ".."}` becomes a `submit` error. Otherwise every key is a
    /// field (Django's `password1`/`password2` are renamed), list values
    /// contribute their first element. A payload with nothing usable yields
    /// `fallback` as the `submit` error.
    pub fn from_payload(payload: &Value, fallback: &str) -> Self {
        let Some(obj) = payload.as_object() else {
            return Self::submit(fallback);
        };
        if let Some(msg) = obj.get("error").and_then(Value::as_str) {
            return Self::submit(msg);
        }
        let mut out = Self::new();
        for (key, val) in obj {
            let field = match key.as_str() {
                "password1" => "password",
                "password2" => "confirm_password",
                other => other,
            };
            let msg = match val {
                Value::Array(items) => items.first().map(value_text),
                Value::Null => None,
                other => Some(value_text(other)),
            };
            if let Some(m) = msg {
                out.insert(field, m);
            }
        }
        if out.is_empty() {
            return Self::submit(fallback);
        }
        out
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
    pub referral_code: Option<String>,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errs = FieldErrors::new();
        if self.username.trim().is_empty() {
            errs.insert("username", "Username is required");
        }
        if self.email.trim().is_empty() {
            errs.insert("email", "Email is required");
        } else if !EMAIL_RE.is_match(&self.email) {
            errs.insert("email", "Email is invalid");
        }
        if self.phone_number.trim().is_empty() {
            errs.insert("phone_number", "Phone number is required");
        } else if !PHONE_RE.is_match(&self.phone_number) {
            errs.insert("phone_number", "Phone number must be in format 07XXXXXXXX");
        }
        if self.password.is_empty() {
            errs.insert("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errs.insert("password", "Password must be at least 8 characters");
        }
        if self.password != self.confirm_password {
            errs.insert("confirm_password", "Passwords do not match");
        }
        if errs.is_empty() { Ok(()) } else { Err(errs) }
    }

    /// The payload sent to `/api/register/`; `confirm_password` never leaves the client.
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.clone(),
            password: self.password.clone(),
            referral_code: self
                .referral_code
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BidForm {
    pub amount: Decimal,
    pub maturity_period: u32,
}

impl BidForm {
    pub fn new(amount: Decimal, maturity_period: u32) -> Self {
        Self {
            amount,
            maturity_period,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errs = FieldErrors::new();
        if self.amount < Decimal::from(MIN_BID_AMOUNT) {
            errs.insert("amount", "Minimum loan bid amount is Ksh 100");
        }
        if !MATURITY_PERIODS.contains(&self.maturity_period) {
            errs.insert(
                "maturity_period",
                format!(
                    "Maturity period must be one of {} days",
                    MATURITY_PERIODS.map(|d| d.to_string()).join(", ")
                ),
            );
        }
        if errs.is_empty() { Ok(()) } else { Err(errs) }
    }

    /// Display-only preview at 2% per day. The server computes the real `return_amount`.
    pub fn estimated_return(&self) -> Decimal {
        let daily = Decimal::new(2, 2);
        self.amount + self.amount * daily * Decimal::from(self.maturity_period)
    }

    pub fn to_request(&self) -> CreateBidRequest {
        CreateBidRequest {
            amount: self.amount,
            maturity_period: self.maturity_period,
        }
    }
}
