//! Page navigation over the page directory.
//!
//! [`Navigator`] tracks the current (page, sub-page) position, the visit
//! history, and the digit accumulator for direct page entry. Movement is
//! split in two: `target_*` methods compute where a key press wants to go
//! without touching state, and [`Navigator::commit`] records the move once
//! the page has actually been fetched. A failed fetch therefore leaves the
//! position (and the displayed page) unchanged.
//!
//! Gaps in the page range are skipped: stepping or dialing into a number
//! the directory does not list lands on the nearest existing page instead
//! of resetting to the start page.

use crate::models::PageDirectory;

/// Number of digits in a page number.
const PAGE_DIGITS: usize = 3;

#[derive(Debug)]
pub struct Navigator {
    directory: PageDirectory,
    page: u16,
    sub_page: u8,
    history: Vec<(u16, u8)>,
    pending: Vec<u8>,
}

impl Navigator {
    /// Position on the page nearest to `start_page`. `None` when the
    /// directory is empty.
    pub fn new(directory: PageDirectory, start_page: u16) -> Option<Self> {
        let page = directory.resolve(start_page)?;
        Some(Navigator {
            directory,
            page,
            sub_page: 1,
            history: Vec::new(),
            pending: Vec::new(),
        })
    }

    pub fn page(&self) -> u16 {
        self.page
    }

    pub fn sub_page(&self) -> u8 {
        self.sub_page
    }

    /// Sub-page count of the current page.
    pub fn sub_page_count(&self) -> u8 {
        self.directory.sub_pages(self.page).unwrap_or(1)
    }

    /// Where a direct page request lands, after gap skipping.
    pub fn target_page(&self, requested: u16) -> Option<(u16, u8)> {
        self.directory.resolve(requested).map(|page| (page, 1))
    }

    /// Next existing page, wrapping at the end of the directory.
    pub fn target_next_page(&self) -> Option<(u16, u8)> {
        self.directory.next_after(self.page).map(|page| (page, 1))
    }

    /// Previous existing page, wrapping at the start of the directory.
    pub fn target_prev_page(&self) -> Option<(u16, u8)> {
        self.directory.prev_before(self.page).map(|page| (page, 1))
    }

    /// Next sub-page, or the next page when already on the last sub-page.
    pub fn target_next_sub(&self) -> Option<(u16, u8)> {
        if self.sub_page < self.sub_page_count() {
            Some((self.page, self.sub_page + 1))
        } else {
            self.target_next_page()
        }
    }

    /// Previous sub-page, or the previous page when already on the first.
    pub fn target_prev_sub(&self) -> Option<(u16, u8)> {
        if self.sub_page > 1 {
            Some((self.page, self.sub_page - 1))
        } else {
            self.target_prev_page()
        }
    }

    /// Accumulate one digit of a page number. Returns the completed number
    /// after the third digit and clears the accumulator.
    pub fn push_digit(&mut self, digit: u8) -> Option<u16> {
        debug_assert!(digit < 10);
        self.pending.push(digit);
        if self.pending.len() < PAGE_DIGITS {
            return None;
        }
        let number = self
            .pending
            .drain(..)
            .fold(0u16, |acc, d| acc * 10 + u16::from(d));
        Some(number)
    }

    /// The digit accumulator rendered for the status bar, e.g. `1__`.
    /// Empty when no entry is in progress.
    pub fn pending_display(&self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let mut out = String::with_capacity(PAGE_DIGITS);
        for d in &self.pending {
            out.push(char::from(b'0' + d));
        }
        for _ in self.pending.len()..PAGE_DIGITS {
            out.push('_');
        }
        out
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Record a completed move. `remember` pushes the old position onto the
    /// visit history; history pops pass `false`. The sub-page is clamped
    /// into the page's valid range.
    pub fn commit(&mut self, page: u16, sub_page: u8, remember: bool) {
        if remember {
            self.history.push((self.page, self.sub_page));
        }
        self.page = page;
        let count = self.directory.sub_pages(page).unwrap_or(1);
        self.sub_page = sub_page.clamp(1, count);
    }

    /// Pop the last visited position, if any.
    pub fn pop_history(&mut self) -> Option<(u16, u8)> {
        self.history.pop()
    }
}
