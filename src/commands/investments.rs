// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Transport};
use crate::countdown::{LocalPhase, project};
use crate::errors::{ApiError, SESSION_EXPIRED};
use crate::models::{Investment, InvestmentStatus};
use crate::ticker::{RowTimers, TICK_INTERVAL, Ticker};
use crate::utils::{fmt_ksh, maybe_print_json, pretty_table, short_date};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::{Duration, Instant};

pub fn handle<T: Transport>(client: &ApiClient<T>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(client, sub)?,
        Some(("watch", sub)) => watch(client, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct InvestmentRow {
    pub id: i64,
    pub created: String,
    pub amount: Decimal,
    pub return_amount: Decimal,
    pub maturity_period: Option<u32>,
    pub reported_status: InvestmentStatus,
    pub local_phase: LocalPhase,
    pub time_to_maturity: String,
    pub awaiting_server: bool,
}

pub fn build_rows(records: &[Investment], now: DateTime<Utc>) -> Vec<InvestmentRow> {
    records
        .iter()
        .map(|r| {
            let p = project(r.matured_at.as_deref(), &r.status, now);
            InvestmentRow {
                id: r.id,
                created: short_date(r.created_at.as_deref()),
                amount: r.amount,
                return_amount: r.return_amount,
                maturity_period: r.maturity_period,
                time_to_maturity: p.label(),
                awaiting_server: p.diverges(),
                reported_status: p.reported_status,
                local_phase: p.local_phase,
            }
        })
        .collect()
}

/// View-level message for a failed investments fetch.
pub fn fetch_error(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized(_) => SESSION_EXPIRED.to_string(),
        ApiError::NotFound(_) => {
            "The investments endpoint could not be found. Please contact support.".to_string()
        }
        other => super::inline_error(
            other,
            "Failed to fetch investments. Please try again later.",
        ),
    }
}

fn fetch<T: Transport>(client: &ApiClient<T>) -> Result<Vec<Investment>> {
    client.my_investments().map_err(|e| anyhow!(fetch_error(&e)))
}

fn time_cell(row: &InvestmentRow) -> String {
    if row.awaiting_server {
        format!("{} (server: {})", row.time_to_maturity, row.reported_status.label())
    } else {
        row.time_to_maturity.clone()
    }
}

fn print_table(rows: &[InvestmentRow]) {
    if rows.is_empty() {
        println!("No investments found");
        return;
    }
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.created.clone(),
                fmt_ksh(&r.amount),
                fmt_ksh(&r.return_amount),
                r.maturity_period
                    .map(|d| format!("{} days", d))
                    .unwrap_or_default(),
                r.reported_status.label().to_string(),
                time_cell(r),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID",
                "Date",
                "Amount",
                "Return Amount",
                "Maturity Period",
                "Status",
                "Time to Maturity",
            ],
            data,
        )
    );
}

fn list<T: Transport>(client: &ApiClient<T>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let requested = *sub.get_one::<usize>("page").unwrap_or(&1);

    let records = fetch(client)?;
    let page = super::requested_page(&records, requested);
    let rows = build_rows(page.items, Utc::now());
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        print_table(&rows);
        super::print_caption(&page);
    }
    Ok(())
}

fn watch<T: Transport>(client: &ApiClient<T>, sub: &clap::ArgMatches) -> Result<()> {
    let requested = *sub.get_one::<usize>("page").unwrap_or(&1);
    let max_ticks = sub.get_one::<u64>("ticks").copied();
    let refresh = sub
        .get_one::<u64>("refresh")
        .copied()
        .filter(|s| *s > 0)
        .map(Duration::from_secs);

    let records = fetch(client)?;
    let mut visible = super::requested_page(&records, requested).items.to_vec();
    print_table(&build_rows(&visible, Utc::now()));

    let ticker = Ticker::new();
    let mut timers = RowTimers::new();
    timers.sync(&ticker, &visible);
    if timers.is_empty() {
        println!("No running countdowns on this page.");
        return Ok(());
    }

    let mut last_fetch = Instant::now();
    let mut failure: Option<String> = None;
    ticker.run(TICK_INTERVAL, max_ticks, |n, updates| {
        for (id, p) in &updates {
            let note = if p.diverges() {
                format!(" (server: {})", p.reported_status.label())
            } else {
                String::new()
            };
            println!("[{:>4}] #{:<6} {}{}", n, id, p.label(), note);
        }
        if let Some(every) = refresh {
            if last_fetch.elapsed() >= every {
                last_fetch = Instant::now();
                match client.my_investments() {
                    Ok(fresh) => {
                        visible = super::requested_page(&fresh, requested).items.to_vec();
                        timers.sync(&ticker, &visible);
                    }
                    Err(e) => {
                        failure = Some(fetch_error(&e));
                        return false;
                    }
                }
            }
        }
        // Keep going while something is still counting down or a refresh may change it.
        refresh.is_some() || updates.iter().any(|(_, p)| p.local_phase.is_live())
    });
    timers.clear();

    match failure {
        Some(msg) => Err(anyhow!(msg)),
        None => Ok(()),
    }
}
