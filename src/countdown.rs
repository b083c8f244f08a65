// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Maturity countdown projection.
//!
//! The server owns the lifecycle status. The client only derives a phase
//! from `matured_at` and the wall clock, and keeps the two apart so a row
//! whose deadline has passed locally but is still `paired` on the server is
//! visible as such.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::models::InvestmentStatus;

pub const COMPLETED_LABEL: &str = "Completed";
pub const MATURED_LABEL: &str = "Matured";
pub const AWAITING_PAIRING_LABEL: &str = "Awaiting pairing";
pub const UNREADABLE_LABEL: &str = "Error calculating time";

/// Whole-unit breakdown of a positive remaining duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    /// Floors sub-second precision.
    pub fn from_millis(ms: i64) -> Self {
        let total = ms.div_euclid(1000);
        Self {
            days: total / 86_400,
            hours: (total / 3_600) % 24,
            minutes: (total / 60) % 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum LocalPhase {
    /// Server reported `completed`.
    Completed,
    /// Server reported `matured`.
    Matured,
    /// No `matured_at` yet: the record has not been paired.
    AwaitingPairing,
    Counting { remaining: Remaining },
    /// `matured_at` is now or in the past while the server still reports an
    /// earlier status.
    DeadlinePassed,
    /// `matured_at` could not be parsed.
    Unreadable,
}

impl LocalPhase {
    pub fn label(&self) -> String {
        match self {
            LocalPhase::Completed => COMPLETED_LABEL.to_string(),
            LocalPhase::Matured | LocalPhase::DeadlinePassed => MATURED_LABEL.to_string(),
            LocalPhase::AwaitingPairing => AWAITING_PAIRING_LABEL.to_string(),
            LocalPhase::Counting { remaining } => remaining.to_string(),
            LocalPhase::Unreadable => UNREADABLE_LABEL.to_string(),
        }
    }

    /// Phases that change with the clock and therefore need a tick.
    pub fn is_live(&self) -> bool {
        matches!(self, LocalPhase::Counting { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub reported_status: InvestmentStatus,
    pub local_phase: LocalPhase,
}

impl Projection {
    pub fn label(&self) -> String {
        self.local_phase.label()
    }

    /// True when the client already shows "Matured" but the server has not said so.
    pub fn diverges(&self) -> bool {
        self.local_phase == LocalPhase::DeadlinePassed
    }
}

/// Server statuses whose display never depends on the clock.
pub fn is_settled(status: &InvestmentStatus) -> bool {
    matches!(
        status,
        InvestmentStatus::Completed | InvestmentStatus::Matured
    )
}

/// Parses the server's `YYYY-MM-DD HH:MM:SS` (UTC) format, with RFC 3339 and
/// `T`-separated naive timestamps accepted as well.
pub fn parse_maturity(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Project a record onto its displayed phase at `now`.
pub fn project(
    matured_at: Option<&str>,
    status: &InvestmentStatus,
    now: DateTime<Utc>,
) -> Projection {
    let local_phase = match status {
        InvestmentStatus::Completed => LocalPhase::Completed,
        InvestmentStatus::Matured => LocalPhase::Matured,
        _ => match matured_at.filter(|s| !s.trim().is_empty()) {
            None => LocalPhase::AwaitingPairing,
            Some(raw) => match parse_maturity(raw) {
                None => LocalPhase::Unreadable,
                Some(deadline) => {
                    let ms = (deadline - now).num_milliseconds();
                    if ms <= 0 {
                        LocalPhase::DeadlinePassed
                    } else {
                        LocalPhase::Counting {
                            remaining: Remaining::from_millis(ms),
                        }
                    }
                }
            },
        },
    };
    Projection {
        reported_status: status.clone(),
        local_phase,
    }
}
