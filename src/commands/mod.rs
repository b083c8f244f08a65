// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{ApiError, SESSION_EXPIRED};
use crate::pagination::{Page, page_of};
use tracing::warn;

pub mod audit;
pub mod auth;
pub mod bids;
pub mod config;
pub mod dashboard;
pub mod investments;
pub mod referrals;
pub mod sell;

/// The message a view shows for `err`, with `fallback` for failures that
/// carry nothing worth showing.
pub fn inline_error(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Unauthorized(_) => SESSION_EXPIRED.to_string(),
        ApiError::NotAuthenticated | ApiError::Validation(_) | ApiError::Forbidden(_) => {
            err.to_string()
        }
        ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Store(_) => {
            warn!(error = %err, "request failed");
            fallback.to_string()
        }
        other => other
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
    }
}

/// Page `requested` of `items`, warning when the request had to be clamped.
pub fn requested_page<T>(items: &[T], requested: usize) -> Page<'_, T> {
    let page = page_of(items, requested);
    if page.pager.current() != requested && !items.is_empty() {
        warn!(
            requested,
            shown = page.pager.current(),
            total_pages = page.pager.total_pages(),
            "page out of range"
        );
    }
    page
}

pub fn print_caption<T>(page: &Page<'_, T>) {
    if page.pager.has_navigation() {
        println!(
            "{} (page {} of {})",
            page.pager.caption(),
            page.pager.current(),
            page.pager.total_pages()
        );
    }
}
