// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Transport};
use crate::models::SellShare;
use crate::payments::PaymentBoard;
use crate::utils::{fmt_ksh, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::warn;

const FETCH_FALLBACK: &str = "Failed to fetch investments";
const CONFIRM_FALLBACK: &str = "Failed to confirm payment. Please try again.";

pub fn handle<T: Transport>(client: &ApiClient<T>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(client, sub)?,
        Some(("confirm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let board = confirm(client, id)?;
            print_board(&board, board.rows());
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct SellRow<'a> {
    #[serde(flatten)]
    share: &'a SellShare,
    action: &'static str,
}

fn fetch<T: Transport>(client: &ApiClient<T>) -> Result<Vec<SellShare>> {
    client
        .sell_shares()
        .map_err(|e| anyhow!(super::inline_error(&e, FETCH_FALLBACK)))
}

fn print_board(board: &PaymentBoard, rows: &[SellShare]) {
    if rows.is_empty() {
        println!("No investments available for selling");
        return;
    }
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.user_name.clone().unwrap_or_else(|| "Unknown".into()),
                r.user_phone.clone().unwrap_or_else(|| "N/A".into()),
                fmt_ksh(&r.amount),
                r.status.clone().unwrap_or_default(),
                r.payment_status.clone().unwrap_or_default(),
                board.action(r).to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID",
                "Paired To User",
                "Phone Number",
                "Amount",
                "Status",
                "Payment Status",
                "Action",
            ],
            data,
        )
    );
}

fn list<T: Transport>(client: &ApiClient<T>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let requested = *sub.get_one::<usize>("page").unwrap_or(&1);

    let board = PaymentBoard::new(fetch(client)?);
    let page = super::requested_page(board.rows(), requested);
    let out: Vec<SellRow<'_>> = page
        .items
        .iter()
        .map(|share| SellRow {
            share,
            action: board.action(share),
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &out)? {
        print_board(&board, page.items);
        super::print_caption(&page);
    }
    Ok(())
}

/// Confirm repayment for pairing `id`, relabel it locally, then refetch so
/// the board reflects the server.
pub fn confirm<T: Transport>(client: &ApiClient<T>, id: i64) -> Result<PaymentBoard> {
    let mut board = PaymentBoard::new(fetch(client)?);
    if board.get(id).is_some() && !board.can_confirm(id) {
        return Err(anyhow!("Pairing #{} is not awaiting your confirmation", id));
    }
    let resp = client
        .confirm_payment(id)
        .map_err(|e| anyhow!(super::inline_error(&e, CONFIRM_FALLBACK)))?;
    board.mark_confirmed(id);
    println!(
        "{}",
        resp.message
            .as_deref()
            .unwrap_or("Payment confirmed successfully")
    );
    if let Some(remaining) = resp.remaining_amount {
        println!("Remaining to be paired: {}", fmt_ksh(&remaining));
    }
    match client.sell_shares() {
        Ok(fresh) => board.reconcile(fresh),
        Err(e) => warn!(error = %e, "refetch after confirmation failed; showing local state"),
    }
    Ok(board)
}
