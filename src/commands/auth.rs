// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Transport};
use crate::errors::ApiError;
use crate::forms::{FieldErrors, RegistrationForm};
use crate::utils::pretty_table;
use anyhow::{Result, anyhow};

pub fn login<T: Transport>(client: &ApiClient<T>, sub: &clap::ArgMatches) -> Result<()> {
    let phone = sub.get_one::<String>("phone").unwrap().trim().to_string();
    let password = sub.get_one::<String>("password").unwrap();
    let auth = client.login(&phone, password).map_err(|e| match e {
        ApiError::Unauthorized(msg) => anyhow!(msg),
        other => anyhow!(super::inline_error(&other, "Login failed. Please try again.")),
    })?;
    match auth.access {
        Some(_) => {
            let name = auth
                .user
                .map(|u| u.username)
                .unwrap_or_else(|| phone.clone());
            println!("Signed in as {}", name);
            Ok(())
        }
        None => Err(anyhow!("Login failed: no access token received")),
    }
}

pub fn form_from_matches(sub: &clap::ArgMatches) -> RegistrationForm {
    let get = |k: &str| sub.get_one::<String>(k).cloned().unwrap_or_default();
    RegistrationForm {
        username: get("username"),
        email: get("email"),
        phone_number: get("phone").trim().to_string(),
        password: get("password"),
        confirm_password: get("confirm"),
        referral_code: sub.get_one::<String>("ref").cloned(),
    }
}

fn field_error_table(errs: &FieldErrors) -> String {
    let rows = errs
        .iter()
        .map(|(k, v)| vec![k.to_string(), v.to_string()])
        .collect();
    pretty_table(&["Field", "Error"], rows).to_string()
}

pub fn register<T: Transport>(client: &ApiClient<T>, sub: &clap::ArgMatches) -> Result<()> {
    let form = form_from_matches(sub);
    if let Err(errs) = form.validate() {
        eprintln!("{}", field_error_table(&errs));
        return Err(anyhow!(errs.summary()));
    }

    if let Some(code) = form.to_request().referral_code {
        match client.verify_referral_code(&code) {
            Ok(info) => {
                if let Some(name) = info.referrer_name {
                    println!("Referred by {}", name);
                }
            }
            Err(_) => {
                let mut errs = FieldErrors::new();
                errs.insert("referral_code", "Invalid referral code");
                eprintln!("{}", field_error_table(&errs));
                return Err(anyhow!(errs.summary()));
            }
        }
    }

    match client.register(&form) {
        Ok(auth) if auth.access.is_some() => {
            println!("Registered and signed in as {}", form.username.trim());
            Ok(())
        }
        Ok(_) => Err(anyhow!(
            "Registration successful but no access token received"
        )),
        Err(ApiError::Validation(errs)) => {
            eprintln!("{}", field_error_table(&errs));
            Err(anyhow!(errs.summary()))
        }
        Err(e) => Err(anyhow!(super::inline_error(
            &e,
            "Registration failed. Please try again."
        ))),
    }
}

pub fn logout<T: Transport>(client: &ApiClient<T>) -> Result<()> {
    client.logout()?;
    println!("Signed out");
    Ok(())
}

pub fn whoami<T: Transport>(client: &ApiClient<T>) -> Result<()> {
    let user = client
        .current_user()
        .map_err(|e| anyhow!(super::inline_error(&e, "Could not verify your session.")))?;
    let na = |v: Option<String>| v.unwrap_or_else(|| "N/A".to_string());
    let role = if user.is_admin() { "admin" } else { "member" };
    let rows = vec![
        vec!["Username".into(), user.username.clone()],
        vec!["Email".into(), na(user.email.clone())],
        vec!["Phone".into(), na(user.phone_number.clone())],
        vec!["Referral code".into(), na(user.referral_code.clone())],
        vec!["Role".into(), role.into()],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}
