// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One shared tick for every live countdown row.
//!
//! Rows hold a [`Subscription`]; dropping it removes the row from the next
//! fan-out. [`RowTimers`] keeps at most one subscription per record and
//! replaces it when the record's `matured_at` changes.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::debug;

use crate::countdown::{Projection, is_settled, project};
use crate::models::{Investment, InvestmentStatus};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Slot {
    record_id: i64,
    matured_at: Option<String>,
    status: InvestmentStatus,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    slots: BTreeMap<u64, Slot>,
}

fn lock(reg: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    reg.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Default)]
pub struct Ticker {
    registry: Arc<Mutex<Registry>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        record_id: i64,
        matured_at: Option<&str>,
        status: InvestmentStatus,
    ) -> Subscription {
        let mut reg = lock(&self.registry);
        reg.next_id += 1;
        let id = reg.next_id;
        reg.slots.insert(
            id,
            Slot {
                record_id,
                matured_at: matured_at.map(str::to_string),
                status,
            },
        );
        debug!(record_id, slot = id, "countdown subscribed");
        Subscription {
            id,
            record_id,
            matured_at: matured_at.map(str::to_string),
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn active(&self) -> usize {
        lock(&self.registry).slots.len()
    }

    /// Recompute every live row at `now`, in subscription order.
    pub fn tick(&self, now: DateTime<Utc>) -> Vec<(i64, Projection)> {
        lock(&self.registry)
            .slots
            .values()
            .map(|s| (s.record_id, project(s.matured_at.as_deref(), &s.status, now)))
            .collect()
    }

    /// Drives ticks every `interval` until `on_tick` returns false, `max_ticks`
    /// is reached, or no subscriptions remain.
    pub fn run<F>(&self, interval: Duration, max_ticks: Option<u64>, mut on_tick: F)
    where
        F: FnMut(u64, Vec<(i64, Projection)>) -> bool,
    {
        let limit_reached = |n: u64| max_ticks.is_some_and(|m| n >= m);
        let mut n = 0u64;
        while !limit_reached(n) && self.active() > 0 {
            n += 1;
            if !on_tick(n, self.tick(Utc::now())) || limit_reached(n) {
                break;
            }
            std::thread::sleep(interval);
        }
    }
}

/// Disposal handle for one row's countdown.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    record_id: i64,
    matured_at: Option<String>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn record_id(&self) -> i64 {
        self.record_id
    }

    pub fn matured_at(&self) -> Option<&str> {
        self.matured_at.as_deref()
    }

    /// Status changes keep the same timer; only `matured_at` defines identity.
    pub fn set_status(&self, status: InvestmentStatus) {
        if let Some(reg) = self.registry.upgrade() {
            if let Some(slot) = lock(&reg).slots.get_mut(&self.id) {
                slot.status = status;
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(reg) = self.registry.upgrade() {
            lock(&reg).slots.remove(&self.id);
            debug!(record_id = self.record_id, slot = self.id, "countdown cancelled");
        }
    }
}

/// Rows currently on screen and their subscriptions.
#[derive(Debug, Default)]
pub struct RowTimers {
    rows: HashMap<i64, Subscription>,
}

impl RowTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, record_id: i64) -> bool {
        self.rows.contains_key(&record_id)
    }

    /// Bring subscriptions in line with `records`. Records that vanished or
    /// settled are dropped, a changed `matured_at` replaces the timer, and
    /// rows that can never tick (no deadline) are not subscribed.
    pub fn sync(&mut self, ticker: &Ticker, records: &[Investment]) {
        let mut keep = HashMap::with_capacity(records.len());
        for rec in records {
            let needs_tick = !is_settled(&rec.status)
                && rec
                    .matured_at
                    .as_deref()
                    .is_some_and(|s| !s.trim().is_empty());
            if !needs_tick {
                continue;
            }
            let reuse = self
                .rows
                .remove(&rec.id)
                .filter(|sub| sub.matured_at() == rec.matured_at.as_deref());
            let sub = match reuse {
                Some(sub) => {
                    sub.set_status(rec.status.clone());
                    sub
                }
                None => ticker.subscribe(rec.id, rec.matured_at.as_deref(), rec.status.clone()),
            };
            keep.insert(rec.id, sub);
        }
        // Whatever is left in `rows` is dropped here, cancelling those timers.
        self.rows = keep;
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
