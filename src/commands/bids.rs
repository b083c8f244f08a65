// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Transport};
use crate::forms::{BidForm, DEFAULT_MATURITY_PERIOD};
use crate::utils::{fmt_ksh, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle<T: Transport>(client: &ApiClient<T>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("place", sub)) => place(client, sub)?,
        Some(("estimate", sub)) => estimate(sub)?,
        _ => {}
    }
    Ok(())
}

pub fn form_from_matches(sub: &clap::ArgMatches) -> Result<BidForm> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let days = *sub.get_one::<u32>("days").unwrap_or(&DEFAULT_MATURITY_PERIOD);
    Ok(BidForm::new(amount, days))
}

fn preview(form: &BidForm) -> String {
    let rows = vec![
        vec!["Amount".to_string(), fmt_ksh(&form.amount)],
        vec![
            "Daily interest (2%)".to_string(),
            fmt_ksh(&(form.amount * rust_decimal::Decimal::new(2, 2))),
        ],
        vec![
            format!("Estimated return ({} days)", form.maturity_period),
            fmt_ksh(&form.estimated_return()),
        ],
    ];
    pretty_table(&["", "Estimate"], rows).to_string()
}

fn estimate(sub: &clap::ArgMatches) -> Result<()> {
    let form = form_from_matches(sub)?;
    form.validate().map_err(|e| anyhow!(e.summary()))?;
    println!("{}", preview(&form));
    Ok(())
}

fn place<T: Transport>(client: &ApiClient<T>, sub: &clap::ArgMatches) -> Result<()> {
    let form = form_from_matches(sub)?;
    form.validate().map_err(|e| anyhow!(e.summary()))?;
    println!("{}", preview(&form));
    let created = client
        .place_bid(&form)
        .map_err(|e| anyhow!(super::inline_error(&e, "Failed to create loan bid")))?;
    println!(
        "Loan bid #{} placed: {} for {} days ({})",
        created.id,
        fmt_ksh(&created.amount),
        created.maturity_period.unwrap_or(form.maturity_period),
        created.status.label()
    );
    Ok(())
}
