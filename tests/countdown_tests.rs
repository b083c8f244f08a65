// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, TimeZone, Utc};
use lendclip::countdown::{
    AWAITING_PAIRING_LABEL, LocalPhase, Remaining, UNREADABLE_LABEL, parse_maturity, project,
};
use lendclip::models::InvestmentStatus;
use proptest::prelude::*;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap()
}

#[test]
fn completed_always_wins() {
    let status = InvestmentStatus::Completed;
    for raw in [None, Some("2025-08-09 12:00:00"), Some("2020-01-01 00:00:00"), Some("garbage")] {
        let p = project(raw, &status, now());
        assert_eq!(p.local_phase, LocalPhase::Completed);
        assert_eq!(p.label(), "Completed");
        assert!(!p.diverges());
    }
}

#[test]
fn matured_status_is_labelled_without_timer() {
    let p = project(Some("2030-01-01 00:00:00"), &InvestmentStatus::Matured, now());
    assert_eq!(p.label(), "Matured");
    assert!(!p.local_phase.is_live());
}

#[test]
fn paired_future_deadline_counts_down() {
    let p = project(Some("2025-08-03 15:04:05"), &InvestmentStatus::Paired, now());
    match &p.local_phase {
        LocalPhase::Counting { remaining } => {
            assert_eq!(remaining.to_string(), "2d 3h 4m 5s");
            assert_eq!(remaining.total_seconds(), 2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
        }
        other => panic!("expected countdown, got {:?}", other),
    }
    assert!(p.local_phase.is_live());
}

#[test]
fn deadline_now_or_past_reads_matured_but_diverges() {
    for raw in ["2025-08-01 12:00:00", "2025-07-31 09:00:00"] {
        let p = project(Some(raw), &InvestmentStatus::Paired, now());
        assert_eq!(p.label(), "Matured");
        assert_eq!(p.local_phase, LocalPhase::DeadlinePassed);
        assert!(p.diverges());
        assert_eq!(p.reported_status, InvestmentStatus::Paired);
    }
}

#[test]
fn absent_deadline_shows_pairing_placeholder() {
    let p = project(None, &InvestmentStatus::Pending, now());
    assert_eq!(p.label(), AWAITING_PAIRING_LABEL);
    let p = project(Some(""), &InvestmentStatus::Pending, now());
    assert_eq!(p.local_phase, LocalPhase::AwaitingPairing);
}

#[test]
fn malformed_deadline_degrades_to_error_label() {
    for raw in ["not a date", "2025-13-40 99:99:99", "2025-08-01"] {
        let p = project(Some(raw), &InvestmentStatus::Paired, now());
        assert_eq!(p.label(), UNREADABLE_LABEL);
    }
}

#[test]
fn unknown_status_still_counts_down() {
    let status = InvestmentStatus::from("confirmed");
    let p = project(Some("2025-08-01 12:00:30"), &status, now());
    assert_eq!(p.label(), "0d 0h 0m 30s");
    assert_eq!(status.label(), "confirmed");
}

#[test]
fn accepts_iso_and_rfc3339() {
    let a = parse_maturity("2025-08-02T00:00:00").unwrap();
    let b = parse_maturity("2025-08-02T03:00:00+03:00").unwrap();
    let c = parse_maturity("2025-08-02 00:00:00").unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn sub_second_remainder_is_floored() {
    assert_eq!(Remaining::from_millis(1_999).total_seconds(), 1);
    assert_eq!(Remaining::from_millis(999).to_string(), "0d 0h 0m 0s");
}

proptest! {
    #[test]
    fn breakdown_matches_floor_of_difference(ms in 1_i64..(400_i64 * 86_400_000)) {
        let deadline = now() + Duration::milliseconds(ms);
        let raw = deadline.format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let p = project(Some(&raw), &InvestmentStatus::Paired, now());
        match p.local_phase {
            LocalPhase::Counting { remaining } => {
                prop_assert_eq!(remaining.total_seconds(), ms / 1000);
                prop_assert!(remaining.hours < 24);
                prop_assert!(remaining.minutes < 60 && remaining.seconds < 60);
            }
            other => prop_assert!(false, "unexpected phase {:?}", other),
        }
    }
}
