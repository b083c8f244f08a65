// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use lendclip::countdown::LocalPhase;
use lendclip::models::{Investment, InvestmentStatus};
use lendclip::ticker::{RowTimers, Ticker};
use std::time::{Duration, Instant};

fn inv(id: i64, status: &str, matured_at: Option<&str>) -> Investment {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "amount": 1000,
        "return_amount": 1100,
        "status": status,
        "matured_at": matured_at,
    }))
    .unwrap()
}

#[test]
fn dropping_a_subscription_cancels_it() {
    let ticker = Ticker::new();
    let a = ticker.subscribe(1, Some("2025-08-02 00:00:00"), InvestmentStatus::Paired);
    let b = ticker.subscribe(2, Some("2025-08-03 00:00:00"), InvestmentStatus::Paired);
    assert_eq!(ticker.active(), 2);
    drop(a);
    assert_eq!(ticker.active(), 1);
    let now = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
    let fanout = ticker.tick(now);
    assert_eq!(fanout.len(), 1);
    assert_eq!(fanout[0].0, 2);
    drop(b);
    assert!(ticker.tick(now).is_empty());
}

#[test]
fn subscription_outliving_ticker_is_harmless() {
    let ticker = Ticker::new();
    let sub = ticker.subscribe(1, None, InvestmentStatus::Pending);
    drop(ticker);
    sub.set_status(InvestmentStatus::Paired);
    drop(sub);
}

#[test]
fn sync_skips_rows_that_never_tick() {
    let ticker = Ticker::new();
    let mut timers = RowTimers::new();
    let rows = vec![
        inv(1, "paired", Some("2025-08-05 00:00:00")),
        inv(2, "completed", Some("2025-08-05 00:00:00")),
        inv(3, "matured", Some("2025-08-05 00:00:00")),
        inv(4, "pending", None),
    ];
    timers.sync(&ticker, &rows);
    assert_eq!(timers.len(), 1);
    assert!(timers.contains(1));
    assert_eq!(ticker.active(), 1);
}

#[test]
fn changed_deadline_replaces_the_timer() {
    let ticker = Ticker::new();
    let mut timers = RowTimers::new();
    timers.sync(&ticker, &[inv(1, "paired", Some("2025-08-05 00:00:00"))]);
    timers.sync(&ticker, &[inv(1, "paired", Some("2025-08-09 00:00:00"))]);
    assert_eq!(ticker.active(), 1);

    let now = Utc.with_ymd_and_hms(2025, 8, 8, 0, 0, 0).unwrap();
    let fanout = ticker.tick(now);
    match &fanout[0].1.local_phase {
        LocalPhase::Counting { remaining } => assert_eq!(remaining.days, 1),
        other => panic!("expected countdown, got {:?}", other),
    }
}

#[test]
fn settled_or_vanished_rows_are_released() {
    let ticker = Ticker::new();
    let mut timers = RowTimers::new();
    timers.sync(
        &ticker,
        &[
            inv(1, "paired", Some("2025-08-05 00:00:00")),
            inv(2, "paired", Some("2025-08-06 00:00:00")),
        ],
    );
    assert_eq!(ticker.active(), 2);
    timers.sync(&ticker, &[inv(1, "completed", Some("2025-08-05 00:00:00"))]);
    assert!(timers.is_empty());
    assert_eq!(ticker.active(), 0);
}

#[test]
fn run_stops_after_max_ticks() {
    let ticker = Ticker::new();
    let _sub = ticker.subscribe(1, Some("2099-01-01 00:00:00"), InvestmentStatus::Paired);
    let mut seen = Vec::new();
    ticker.run(Duration::from_millis(1), Some(3), |n, rows| {
        seen.push((n, rows.len()));
        true
    });
    assert_eq!(seen, vec![(1, 1), (2, 1), (3, 1)]);
}

#[test]
fn run_returns_without_sleeping_after_the_last_tick() {
    let ticker = Ticker::new();
    let _sub = ticker.subscribe(1, Some("2099-01-01 00:00:00"), InvestmentStatus::Paired);
    let started = Instant::now();
    let mut ticks = 0;
    ticker.run(Duration::from_secs(5), Some(1), |_, _| {
        ticks += 1;
        true
    });
    assert_eq!(ticks, 1);
    assert!(started.elapsed() < Duration::from_secs(2));

    let mut ticks = 0;
    ticker.run(Duration::from_secs(5), Some(0), |_, _| {
        ticks += 1;
        true
    });
    assert_eq!(ticks, 0);
}

#[test]
fn run_ends_when_nothing_is_subscribed() {
    let ticker = Ticker::new();
    let mut calls = 0;
    ticker.run(Duration::from_millis(1), None, |_, _| {
        calls += 1;
        true
    });
    assert_eq!(calls, 0);
}
