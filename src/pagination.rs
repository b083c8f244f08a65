// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Page views over an already-fetched list. Nothing here re-fetches.

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    total: usize,
    page_size: usize,
    current: usize,
}

impl Pager {
    pub fn new(total: usize) -> Self {
        Self::with_page_size(total, PAGE_SIZE)
    }

    pub fn with_page_size(total: usize, page_size: usize) -> Self {
        Self {
            total,
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Controls are only shown when there is somewhere to go.
    pub fn has_navigation(&self) -> bool {
        self.total_pages() > 1
    }

    /// Moves to `page` (1-based). Out-of-range requests are rejected and leave
    /// the pager where it was.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            return false;
        }
        self.current = page;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn prev(&mut self) -> bool {
        self.current > 1 && self.go_to(self.current - 1)
    }

    fn bounds(&self) -> (usize, usize) {
        let start = ((self.current - 1) * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        (start, end)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let (start, end) = self.bounds();
        let end = end.min(items.len());
        &items[start.min(end)..end]
    }

    /// 1-based inclusive display range, `None` for an empty list.
    pub fn display_range(&self) -> Option<(usize, usize)> {
        let (start, end) = self.bounds();
        if start == end {
            return None;
        }
        Some((start + 1, end))
    }

    pub fn caption(&self) -> String {
        match self.display_range() {
            Some((from, to)) => format!("Showing {} to {} of {} entries", from, to, self.total),
            None => format!("Showing 0 to 0 of {} entries", self.total),
        }
    }
}

#[derive(Debug)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub pager: Pager,
}

/// Slice out `page` of `items`, clamping the request into range.
pub fn page_of<T>(items: &[T], page: usize) -> Page<'_, T> {
    let mut pager = Pager::new(items.len());
    let last = pager.total_pages().max(1);
    pager.go_to(page.clamp(1, last));
    Page {
        items: pager.slice(items),
        pager,
    }
}
