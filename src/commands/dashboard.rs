// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Transport};
use crate::config::Config;
use crate::referral::link_for_user;
use crate::utils::{fmt_ksh, maybe_print_json, pretty_table, short_date};
use anyhow::{Result, anyhow};

pub fn handle<T: Transport>(
    client: &ApiClient<T>,
    config: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");

    let data = client
        .dashboard()
        .map_err(|e| anyhow!(super::inline_error(&e, "Failed to load dashboard data")))?;
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }

    let s = &data.statistics;
    let stats = vec![
        vec!["Total Loan lent".to_string(), fmt_ksh(&s.total_investment)],
        vec!["Total Loan Returns".to_string(), fmt_ksh(&s.total_returns)],
        vec!["Active Investments".to_string(), s.active_investments.to_string()],
        vec!["Due Earnings".to_string(), fmt_ksh(&s.due_earnings)],
        vec!["Pending Payments".to_string(), s.pending_payments.to_string()],
        vec!["Referral Earnings".to_string(), fmt_ksh(&data.referral.total_earnings)],
    ];
    println!("{}", pretty_table(&["Statistic", "Value"], stats));

    super::referrals::print_summary(&data.referral);
    let link = link_for_user(&config.origin, client.session().user().as_ref());
    if !link.is_empty() {
        println!("Your referral link: {}", link);
    }

    if data.payments.is_empty() {
        println!("No pending payments");
    } else {
        let rows = data
            .payments
            .iter()
            .map(|p| {
                vec![
                    p.id.map(|i| i.to_string()).unwrap_or_default(),
                    p.from_username.clone().unwrap_or_else(|| "Unknown".into()),
                    p.from_phone.clone().unwrap_or_else(|| "N/A".into()),
                    fmt_ksh(&p.amount),
                    short_date(p.created_at.as_deref()),
                    p.status.clone().unwrap_or_default(),
                    p.action().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Investor", "Phone", "Amount", "Date", "Status", "Action"],
                rows
            )
        );
    }
    Ok(())
}
