// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Transport};
use crate::errors::{ApiError, NO_PERMISSION};
use crate::models::InvestmentStatus;
use crate::utils::{fmt_ksh, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle<T: Transport>(client: &ApiClient<T>, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");

    let overview = client.system_overview().map_err(|e| match e {
        ApiError::Forbidden(_) => anyhow!(NO_PERMISSION),
        other => anyhow!(super::inline_error(
            &other,
            "Failed to fetch audit data. Please try again later."
        )),
    })?;
    if maybe_print_json(json_flag, jsonl_flag, &overview)? {
        return Ok(());
    }

    let inv = &overview.investment_statistics;
    println!(
        "Users: {}   Investments: {}",
        overview.user_statistics.total_users, inv.total_investments
    );

    let mut buckets = Vec::new();
    for (name, bucket) in [
        ("Matured investments", &inv.matured_investments),
        ("Waiting investors", &inv.waiting_investors),
        ("New investors pending", &inv.new_investors_pending),
    ] {
        if let Some(b) = bucket {
            buckets.push(vec![name.to_string(), b.count.to_string(), fmt_ksh(&b.total)]);
        }
    }
    for s in &inv.status_breakdown {
        buckets.push(vec![
            InvestmentStatus::from(s.status.as_str()).label().to_string(),
            s.count.to_string(),
            fmt_ksh(&s.total_amount.unwrap_or_default()),
        ]);
    }
    if !buckets.is_empty() {
        println!("{}", pretty_table(&["Bucket", "Count", "Total"], buckets));
    }

    let statuses = [
        InvestmentStatus::Pending,
        InvestmentStatus::Matured,
        InvestmentStatus::Paired,
        InvestmentStatus::Completed,
    ];
    let rows = overview
        .user_details
        .iter()
        .map(|u| {
            let mut row = vec![
                u.username.clone(),
                u.phone_number.clone().unwrap_or_default(),
                u.total_investments.to_string(),
            ];
            row.extend(statuses.iter().map(|s| fmt_ksh(&u.total_for(s))));
            row
        })
        .collect::<Vec<_>>();
    if rows.is_empty() {
        println!("No user activity yet");
    } else {
        println!(
            "{}",
            pretty_table(
                &["Username", "Phone", "Investments", "Pending", "Matured", "Paired", "Completed"],
                rows
            )
        );
    }
    Ok(())
}
