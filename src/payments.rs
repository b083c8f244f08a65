// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use crate::models::SellShare;

pub const PAYMENT_CONFIRMED: &str = "Payment Confirmed";
pub const CONFIRM_PAYMENT: &str = "Confirm Payment";
pub const AWAITING_CONFIRMATION: &str = "Waiting for payment confirmation";

/// Sell-side rows plus the confirmations made locally since the last fetch.
///
/// A local confirmation only changes the action shown for a row; the
/// reported `payment_status` is left alone until [`PaymentBoard::reconcile`].
#[derive(Debug, Clone, Default)]
pub struct PaymentBoard {
    rows: Vec<SellShare>,
    confirmed_locally: HashSet<i64>,
}

impl PaymentBoard {
    pub fn new(rows: Vec<SellShare>) -> Self {
        Self {
            rows,
            confirmed_locally: HashSet::new(),
        }
    }

    pub fn rows(&self) -> &[SellShare] {
        &self.rows
    }

    pub fn get(&self, id: i64) -> Option<&SellShare> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn can_confirm(&self, id: i64) -> bool {
        self.get(id).is_some_and(|r| {
            r.is_matured_investor && !r.is_paid() && !self.confirmed_locally.contains(&id)
        })
    }

    pub fn action(&self, row: &SellShare) -> &'static str {
        if row.is_paid() || self.confirmed_locally.contains(&row.id) {
            PAYMENT_CONFIRMED
        } else if row.is_matured_investor {
            CONFIRM_PAYMENT
        } else {
            AWAITING_CONFIRMATION
        }
    }

    pub fn is_pending_sync(&self, id: i64) -> bool {
        self.confirmed_locally.contains(&id)
    }

    /// Relabel after a successful confirm call, ahead of the refetch.
    pub fn mark_confirmed(&mut self, id: i64) {
        self.confirmed_locally.insert(id);
    }

    /// Replace rows with a fresh fetch; the server's view wins.
    pub fn reconcile(&mut self, fresh: Vec<SellShare>) {
        self.rows = fresh;
        self.confirmed_locally.clear();
    }
}
