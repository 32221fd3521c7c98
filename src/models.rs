//! Data model for teletext pages.
//!
//! This module defines the transient per-page state described by the remote
//! service:
//! - [`TtxColor`]: the eight-entry teletext palette
//! - [`Cell`] and [`PageGrid`]: the fixed 40×24 character grid with color
//!   attributes, rebuilt on every fetch
//! - [`TeletextPage`]: one fetched (page, sub-page) pair plus the page
//!   numbers it links to
//! - [`PageDirectory`]: the page → sub-page-count map served by `pages.js`
//!
//! Page numbers are small integers defined by the remote site; anything the
//! server does not recognize is simply absent from the directory.

use std::collections::BTreeMap;

/// Width of the teletext character grid.
pub const GRID_WIDTH: usize = 40;
/// Height of the teletext character grid, including the header row.
pub const GRID_HEIGHT: usize = 24;

/// Lowest page number the service serves.
pub const MIN_PAGE: u16 = 100;
/// Highest page number the service serves.
pub const MAX_PAGE: u16 = 899;

/// The classic teletext palette.
///
/// CSS classes `f0`..`f7` and `b0`..`b7` on the remote page select the
/// foreground and background from this palette by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtxColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl TtxColor {
    /// Map a palette index digit (`'0'`..`'7'`) to its color.
    pub fn from_class_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(TtxColor::Black),
            '1' => Some(TtxColor::Red),
            '2' => Some(TtxColor::Green),
            '3' => Some(TtxColor::Yellow),
            '4' => Some(TtxColor::Blue),
            '5' => Some(TtxColor::Magenta),
            '6' => Some(TtxColor::Cyan),
            '7' => Some(TtxColor::White),
            _ => None,
        }
    }
}

/// One character cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: TtxColor,
    pub bg: TtxColor,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            fg: TtxColor::White,
            bg: TtxColor::Black,
        }
    }
}

/// The fixed-size character grid rendered to the terminal.
///
/// Row 0 is the header row; rows 1.. hold page content. Writes outside the
/// grid bounds are silently dropped, which is how content overflow is
/// clipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGrid {
    rows: Vec<Vec<Cell>>,
}

impl PageGrid {
    pub fn new() -> Self {
        PageGrid {
            rows: vec![vec![Cell::default(); GRID_WIDTH]; GRID_HEIGHT],
        }
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if row < GRID_HEIGHT && col < GRID_WIDTH {
            self.rows[row][col] = cell;
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
}

impl Default for PageGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// One fetched teletext page, ready for display.
///
/// Created on each fetch and replaced wholesale by the next one; nothing
/// here outlives the page it was scraped from.
#[derive(Debug, Clone)]
pub struct TeletextPage {
    pub page: u16,
    pub sub_page: u8,
    pub grid: PageGrid,
    /// Page numbers referenced by the page text, in document order,
    /// deduplicated, excluding the page itself.
    pub links: Vec<u16>,
}

/// The set of pages the service currently serves, with their sub-page
/// counts, as published by `pages.js`.
#[derive(Debug, Clone, Default)]
pub struct PageDirectory {
    inner: BTreeMap<u16, u8>,
}

impl PageDirectory {
    /// Build a directory, dropping entries outside [`MIN_PAGE`]..=[`MAX_PAGE`]
    /// and entries with a zero sub-page count.
    pub fn from_entries(entries: impl IntoIterator<Item = (u16, u8)>) -> Self {
        let inner = entries
            .into_iter()
            .filter(|(page, count)| (MIN_PAGE..=MAX_PAGE).contains(page) && *count > 0)
            .collect();
        PageDirectory { inner }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn contains(&self, page: u16) -> bool {
        self.inner.contains_key(&page)
    }

    /// Number of sub-pages of `page`, if the page exists.
    pub fn sub_pages(&self, page: u16) -> Option<u8> {
        self.inner.get(&page).copied()
    }

    pub fn first(&self) -> Option<u16> {
        self.inner.keys().next().copied()
    }

    pub fn last(&self) -> Option<u16> {
        self.inner.keys().next_back().copied()
    }

    /// Next existing page strictly after `page`, wrapping to the first.
    pub fn next_after(&self, page: u16) -> Option<u16> {
        self.inner
            .range(page.saturating_add(1)..)
            .next()
            .map(|(p, _)| *p)
            .or_else(|| self.first())
    }

    /// Previous existing page strictly before `page`, wrapping to the last.
    pub fn prev_before(&self, page: u16) -> Option<u16> {
        self.inner
            .range(..page)
            .next_back()
            .map(|(p, _)| *p)
            .or_else(|| self.last())
    }

    /// Resolve a requested page number to the page actually served: the
    /// page itself when present, otherwise the nearest following page,
    /// otherwise the nearest preceding one. Skips over gaps in the page
    /// range instead of falling back to the start page.
    pub fn resolve(&self, requested: u16) -> Option<u16> {
        self.inner
            .range(requested..)
            .next()
            .map(|(p, _)| *p)
            .or_else(|| self.inner.range(..requested).next_back().map(|(p, _)| *p))
    }
}
