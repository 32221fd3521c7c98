//! HTML extraction for the teletext frontend.
//!
//! The remote service renders each page as a `<div>` holding two `<pre>`
//! elements: the first is the header row, the second a flat sequence of
//! `<b>` runs whose CSS classes (`f0`..`f7`, `b0`..`b7`) carry the color
//! attributes. This module turns that structure into a [`PageGrid`], and
//! parses the `pages.js` directory blob.
//!
//! The parsing is tied to the site's current output on purpose. When the
//! frontend changes, [`parse_page`] fails with a typed error instead of
//! guessing.

use crate::error::{Error, Result};
use crate::models::{
    Cell, GRID_WIDTH, MAX_PAGE, MIN_PAGE, PageDirectory, PageGrid, TeletextPage, TtxColor,
};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

static PRE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body div pre").expect("static selector"));
static RUN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("b").expect("static selector"));
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[1-8][0-9]{2}\b").expect("static regex"));
static DIRECTORY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*:\s*(\d+)").expect("static regex"));

/// Parse one fetched page into its character grid.
///
/// Row 0 is the header `<pre>`, white on black. The `<b>` runs of the
/// content `<pre>` flow into rows 1.. with greedy line breaking: a run that
/// would overflow the 40-column row starts the next row, and runs are never
/// split. Content past the last grid row is clipped.
pub fn parse_page(page: u16, sub_page: u8, html: &str) -> Result<TeletextPage> {
    let document = Html::parse_document(html);
    let mut pres = document.select(&PRE_SELECTOR);
    let header = pres.next().ok_or(Error::MalformedPage { page, sub_page })?;
    let content = pres.next().ok_or(Error::MalformedPage { page, sub_page })?;

    let mut grid = PageGrid::new();
    let header_text: String = header.text().collect();
    for (col, ch) in header_text
        .chars()
        .filter(|c| !c.is_control())
        .take(GRID_WIDTH)
        .enumerate()
    {
        grid.set(
            0,
            col,
            Cell {
                ch,
                ..Cell::default()
            },
        );
    }

    let mut row = 1usize;
    let mut col = 0usize;
    let mut content_text = String::new();
    for element in content.select(&RUN_SELECTOR) {
        let (fg, bg) = color_pair(element.value().classes());
        let run: Vec<char> = element
            .text()
            .collect::<String>()
            .chars()
            .filter(|c| !c.is_control())
            .collect();
        if run.is_empty() {
            continue;
        }

        content_text.extend(run.iter());
        content_text.push('\n');

        if col > 0 && col + run.len() > GRID_WIDTH {
            row += 1;
            col = 0;
        }
        for ch in run {
            // set() drops writes past the grid edges, clipping long runs
            // and overflowing rows
            grid.set(row, col, Cell { ch, fg, bg });
            col += 1;
        }
    }

    let links = extract_links(&content_text, page);
    debug!(page, sub_page, rows = row, links = links.len(), "Parsed teletext page");

    Ok(TeletextPage {
        page,
        sub_page,
        grid,
        links,
    })
}

/// Fold CSS classes into a (foreground, background) pair.
///
/// Classes other than `f0`..`f7` and `b0`..`b7` are ignored; the last
/// foreground and last background class win. Defaults are white on black.
fn color_pair<'a>(classes: impl Iterator<Item = &'a str>) -> (TtxColor, TtxColor) {
    let mut fg = TtxColor::White;
    let mut bg = TtxColor::Black;
    for class in classes {
        let mut chars = class.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('f'), Some(digit), None) => {
                if let Some(color) = TtxColor::from_class_digit(digit) {
                    fg = color;
                }
            }
            (Some('b'), Some(digit), None) => {
                if let Some(color) = TtxColor::from_class_digit(digit) {
                    bg = color;
                }
            }
            _ => {}
        }
    }
    (fg, bg)
}

/// Collect the page numbers mentioned in the page text: three-digit numbers
/// in the served range, in document order, deduplicated, excluding the page
/// itself.
fn extract_links(text: &str, own_page: u16) -> Vec<u16> {
    let mut links = Vec::new();
    for found in LINK_RE.find_iter(text) {
        let Ok(number) = found.as_str().parse::<u16>() else {
            continue;
        };
        if (MIN_PAGE..=MAX_PAGE).contains(&number) && number != own_page && !links.contains(&number)
        {
            links.push(number);
        }
    }
    links
}

/// Parse the `pages.js` blob into the page directory.
///
/// The blob is a JavaScript object literal like `var pages = {100:1,101:3};`
/// mapping page number to sub-page count. Everything between the first `{`
/// and the following `}` is scanned for `number:number` pairs; entries
/// outside the served page range are dropped.
pub fn parse_directory(blob: &str) -> Result<PageDirectory> {
    let start = blob.find('{').ok_or(Error::MalformedDirectory)?;
    let end = blob[start..]
        .find('}')
        .map(|i| start + i)
        .ok_or(Error::MalformedDirectory)?;
    let body = &blob[start + 1..end];

    let entries = DIRECTORY_RE.captures_iter(body).filter_map(|caps| {
        let page = caps[1].parse::<u16>().ok()?;
        let count = caps[2].parse::<u8>().ok()?;
        Some((page, count))
    });
    let directory = PageDirectory::from_entries(entries);
    if directory.is_empty() {
        return Err(Error::MalformedDirectory);
    }
    debug!(pages = directory.len(), "Parsed page directory");
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"<html><body><div class="ttx">
<pre>100.01  NDR TEXT        Mo 24.08. 20:15</pre>
<pre><b class="f3 b4">Tagesschau                              </b><b class="f7">Nachrichten ......... </b><b class="f6 b0">104</b><b class="f7">Wetter .............. </b><b class="f6">400</b></pre>
</div></body></html>"#;

    #[test]
    fn test_sample_page_grid_is_deterministic() {
        let page = parse_page(100, 1, SAMPLE_PAGE).unwrap();

        // header row, white on black
        let h = page.grid.cell(0, 0).unwrap();
        assert_eq!(h.ch, '1');
        assert_eq!(h.fg, TtxColor::White);
        assert_eq!(h.bg, TtxColor::Black);

        // first content run fills row 1, yellow on blue
        let c = page.grid.cell(1, 0).unwrap();
        assert_eq!(c.ch, 'T');
        assert_eq!(c.fg, TtxColor::Yellow);
        assert_eq!(c.bg, TtxColor::Blue);

        // second run starts a fresh row because the first one filled row 1
        let c = page.grid.cell(2, 0).unwrap();
        assert_eq!(c.ch, 'N');
        assert_eq!(c.fg, TtxColor::White);
        assert_eq!(c.bg, TtxColor::Black);

        // the page number run follows on the same row, cyan
        let c = page.grid.cell(2, 22).unwrap();
        assert_eq!(c.ch, '1');
        assert_eq!(c.fg, TtxColor::Cyan);
    }

    #[test]
    fn test_sample_page_links() {
        let page = parse_page(100, 1, SAMPLE_PAGE).unwrap();
        assert_eq!(page.links, vec![104, 400]);
    }

    #[test]
    fn test_links_exclude_own_page_and_dedupe() {
        assert_eq!(extract_links("104 200 104 999 042", 104), vec![200]);
        assert_eq!(extract_links("110\n110\n120", 100), vec![110, 120]);
    }

    #[test]
    fn test_run_longer_than_grid_width_is_clipped() {
        let long = "x".repeat(60);
        let html = format!(
            "<html><body><div><pre>hdr</pre><pre><b class=\"f2\">{long}</b><b class=\"f1\">y</b></pre></div></body></html>"
        );
        let page = parse_page(100, 1, &html).unwrap();
        assert_eq!(page.grid.cell(1, 39).unwrap().ch, 'x');
        // the following run wraps to the next row
        assert_eq!(page.grid.cell(2, 0).unwrap().ch, 'y');
        assert_eq!(page.grid.cell(2, 0).unwrap().fg, TtxColor::Red);
    }

    #[test]
    fn test_missing_pre_structure_is_an_error() {
        let html = "<html><body><div><pre>only a header</pre></div></body></html>";
        let err = parse_page(104, 2, html).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedPage {
                page: 104,
                sub_page: 2
            }
        ));
    }

    #[test]
    fn test_color_pair_last_class_wins() {
        let (fg, bg) = color_pair(["f1", "ttx", "f2", "b4", "b0"].into_iter());
        assert_eq!(fg, TtxColor::Green);
        assert_eq!(bg, TtxColor::Black);
    }

    #[test]
    fn test_color_pair_defaults() {
        let (fg, bg) = color_pair(["ttx", "row"].into_iter());
        assert_eq!(fg, TtxColor::White);
        assert_eq!(bg, TtxColor::Black);
    }

    #[test]
    fn test_parse_directory_blob() {
        let blob = "var pages = {100:1,101:3,544:2};";
        let dir = parse_directory(blob).unwrap();
        assert_eq!(dir.len(), 3);
        assert_eq!(dir.sub_pages(101), Some(3));
    }

    #[test]
    fn test_parse_directory_drops_out_of_range() {
        let blob = "{99:1,100:2,900:1}";
        let dir = parse_directory(blob).unwrap();
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.sub_pages(100), Some(2));
    }

    #[test]
    fn test_parse_directory_rejects_garbage() {
        assert!(matches!(
            parse_directory("not a blob"),
            Err(Error::MalformedDirectory)
        ));
        assert!(matches!(
            parse_directory("{}"),
            Err(Error::MalformedDirectory)
        ));
    }
}
