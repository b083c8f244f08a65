// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Transport};
use crate::config::Config;
use crate::models::ReferralSummary;
use crate::referral::link_for_user;
use crate::utils::{fmt_ksh, maybe_print_json, pretty_table, short_date};
use anyhow::{Result, anyhow};

pub fn handle<T: Transport>(
    client: &ApiClient<T>,
    config: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("link", _)) => {
            let link = link_for_user(&config.origin, client.session().user().as_ref());
            if link.is_empty() {
                println!("No referral link: sign in first.");
            } else {
                println!("{}", link);
            }
        }
        Some(("list", sub)) => list(client, sub)?,
        Some(("verify", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let info = client
                .verify_referral_code(code)
                .map_err(|_| anyhow!("Invalid referral code"))?;
            match info.referrer_name {
                Some(name) => println!("Valid code; referred by {}", name),
                None => println!("Valid code"),
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn print_summary(s: &ReferralSummary) {
    println!(
        "{}",
        pretty_table(
            &["Total Referrals", "Total Earnings", "Available Bonus"],
            vec![vec![
                s.total_referrals.to_string(),
                fmt_ksh(&s.total_earnings),
                fmt_ksh(&s.available_bonus),
            ]],
        )
    );
}

/// `summary` with `referral_history` cut down to page `requested`, as the
/// table view shows it.
pub fn paged_summary(summary: &ReferralSummary, requested: usize) -> ReferralSummary {
    let page = super::requested_page(&summary.referral_history, requested);
    ReferralSummary {
        referral_history: page.items.to_vec(),
        ..summary.clone()
    }
}

fn list<T: Transport>(client: &ApiClient<T>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let requested = *sub.get_one::<usize>("page").unwrap_or(&1);

    let summary = client
        .referrals()
        .map_err(|e| anyhow!(super::inline_error(&e, "Failed to fetch referral data")))?;
    if maybe_print_json(json_flag, jsonl_flag, &paged_summary(&summary, requested))? {
        return Ok(());
    }

    print_summary(&summary);

    println!("Referred Users");
    if summary.referred_users.is_empty() {
        println!("No referred users yet");
    } else {
        let users = summary
            .referred_users
            .iter()
            .map(|u| {
                vec![
                    u.username.clone().unwrap_or_else(|| "Unknown".into()),
                    u.phone_number.clone().unwrap_or_else(|| "N/A".into()),
                    short_date(u.date_joined.as_deref()),
                    u.display_status().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Username", "Phone Number", "Date Joined", "Status"], users)
        );
    }

    println!("Referral History");
    let page = super::requested_page(&summary.referral_history, requested);
    if page.items.is_empty() {
        println!("No referral history yet");
    } else {
        let rows = page
            .items
            .iter()
            .map(|h| {
                vec![
                    short_date(Some(h.display_date())),
                    h.display_username().to_string(),
                    fmt_ksh(&h.amount_invested),
                    fmt_ksh(&h.bonus_earned),
                    h.display_status(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Referred User", "Amount Lent", "Bonus Earned", "Status"],
                rows
            )
        );
        super::print_caption(&page);
    }
    Ok(())
}
