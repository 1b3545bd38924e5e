//! Per-year pagination window.
//!
//! # Invariants
//! - A year shows at most `page_size` cards eagerly.
//! - Each reveal advances the cursor by at most `page_size`.
//! - Revealing past the end is a no-op, not an error.

use std::collections::HashMap;
use std::ops::Range;

/// Cursor over one year's ordered cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    total: usize,
    shown: usize,
    page_size: usize,
}

impl PageWindow {
    /// Opens a window showing the eager first page.
    pub fn new(total: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            total,
            shown: total.min(page_size),
            page_size,
        }
    }

    /// Indexes rendered without any reveal.
    pub fn eager_range(&self) -> Range<usize> {
        0..self.total.min(self.page_size)
    }

    /// Advances by one page and returns the newly revealed indexes.
    ///
    /// Returns `None` once everything is shown.
    pub fn advance(&mut self) -> Option<Range<usize>> {
        if self.shown >= self.total {
            return None;
        }
        let start = self.shown;
        let end = (start + self.page_size).min(self.total);
        self.shown = end;
        Some(start..end)
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Cards still hidden behind the affordance.
    pub fn remaining(&self) -> usize {
        self.total - self.shown
    }

    pub fn has_more(&self) -> bool {
        self.remaining() > 0
    }
}

/// Revealed counts for every year of the current layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealState {
    windows: HashMap<String, PageWindow>,
}

impl RevealState {
    pub fn open(&mut self, year: impl Into<String>, total: usize, page_size: usize) -> PageWindow {
        let window = PageWindow::new(total, page_size);
        self.windows.insert(year.into(), window);
        window
    }

    pub fn window(&self, year: &str) -> Option<&PageWindow> {
        self.windows.get(year)
    }

    pub fn window_mut(&mut self, year: &str) -> Option<&mut PageWindow> {
        self.windows.get_mut(year)
    }

    /// Cards currently shown for `year`, 0 for unknown years.
    pub fn revealed_count(&self, year: &str) -> usize {
        self.windows.get(year).map_or(0, PageWindow::shown)
    }

    pub fn clear(&mut self) {
        self.windows.clear();
    }
}
