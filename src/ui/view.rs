//! Terminal painting.
//!
//! The 40×24 grid is centered in the terminal with a one-line status bar
//! underneath. The clock is overlaid onto the header row from local system
//! time right before painting, so it ticks even when the page does not
//! change.

use crate::error::Result;
use crate::models::{Cell, GRID_HEIGHT, GRID_WIDTH, PageGrid};
use crate::ui::styles;
use crate::utils::CLOCK_COLUMN;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    text::{Line, Span, Text},
    widgets::Paragraph,
};
use std::io::Stdout;

/// Everything one frame needs, detached from the app state.
pub struct ViewSnap<'a> {
    pub grid: &'a PageGrid,
    pub clock: String,
    pub page: u16,
    pub sub_page: u8,
    pub sub_page_count: u8,
    pub pending: String,
    pub highlighted_link: Option<u16>,
    pub notice: Option<&'a str>,
}

pub fn draw(term: &mut Terminal<CrosstermBackend<Stdout>>, snap: &ViewSnap) -> Result<()> {
    term.draw(|frame| {
        let area = frame.area();
        let grid_w = GRID_WIDTH as u16;
        let grid_h = GRID_HEIGHT as u16;

        let x = area.x + area.width.saturating_sub(grid_w) / 2;
        let y = area.y + area.height.saturating_sub(grid_h + 1) / 2;
        let grid_rect = Rect::new(x, y, grid_w, grid_h).intersection(area);
        let status_rect = Rect::new(x, y.saturating_add(grid_h), grid_w, 1).intersection(area);

        let lines = grid_lines(snap.grid, &snap.clock);
        frame.render_widget(Paragraph::new(Text::from(lines)), grid_rect);

        if status_rect.height > 0 {
            frame.render_widget(Paragraph::new(status_line(snap)), status_rect);
        }
    })?;

    Ok(())
}

/// Render the grid rows, with the clock overlaid onto the header row.
fn grid_lines(grid: &PageGrid, clock: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(GRID_HEIGHT);
    for (index, row) in grid.rows().iter().enumerate() {
        if index == 0 {
            let mut header = row.clone();
            for (offset, ch) in clock.chars().enumerate() {
                let col = CLOCK_COLUMN + offset;
                if col < header.len() {
                    header[col] = Cell {
                        ch,
                        ..Cell::default()
                    };
                }
            }
            lines.push(Line::from(row_spans(&header)));
        } else {
            lines.push(Line::from(row_spans(row)));
        }
    }
    lines
}

/// Merge runs of identically-colored cells into spans.
fn row_spans(cells: &[Cell]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = None;

    for cell in cells {
        let style = styles::cell_style(cell);
        if run_style != Some(style) {
            if let Some(prev) = run_style {
                spans.push(Span::styled(std::mem::take(&mut run), prev));
            }
            run_style = Some(style);
        }
        run.push(cell.ch);
    }
    if let Some(style) = run_style {
        spans.push(Span::styled(run, style));
    }
    spans
}

fn status_line(snap: &ViewSnap) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(
            " {page}.{sub}/{count} ",
            page = snap.page,
            sub = snap.sub_page,
            count = snap.sub_page_count
        ),
        styles::status(),
    )];

    if !snap.pending.is_empty() {
        spans.push(Span::styled(
            format!("{} ", snap.pending),
            styles::pending_input(),
        ));
    }
    if let Some(link) = snap.highlighted_link {
        spans.push(Span::styled(format!("→{link} "), styles::link()));
    }
    if let Some(notice) = snap.notice {
        spans.push(Span::styled(notice.to_string(), styles::error()));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TtxColor;

    fn cell(ch: char, fg: TtxColor, bg: TtxColor) -> Cell {
        Cell { ch, fg, bg }
    }

    #[test]
    fn test_row_spans_merge_same_style_runs() {
        let row = [
            cell('a', TtxColor::White, TtxColor::Black),
            cell('b', TtxColor::White, TtxColor::Black),
            cell('c', TtxColor::Red, TtxColor::Black),
            cell('d', TtxColor::Red, TtxColor::Blue),
        ];
        let spans = row_spans(&row);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].content, "ab");
        assert_eq!(spans[1].content, "c");
        assert_eq!(spans[2].content, "d");
    }

    #[test]
    fn test_clock_overlays_header_row() {
        let grid = PageGrid::new();
        let lines = grid_lines(&grid, "24.08. 20:15:07");
        let header: String = lines[0]
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(&header[CLOCK_COLUMN..], "24.08. 20:15:07");
        assert_eq!(header.len(), GRID_WIDTH);
    }

    #[test]
    fn test_status_line_shows_pending_and_notice() {
        let grid = PageGrid::new();
        let snap = ViewSnap {
            grid: &grid,
            clock: String::new(),
            page: 104,
            sub_page: 2,
            sub_page_count: 3,
            pending: "1__".into(),
            highlighted_link: Some(110),
            notice: Some("request failed"),
        };
        let line = status_line(&snap);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("104.2/3"));
        assert!(text.contains("1__"));
        assert!(text.contains("→110"));
        assert!(text.contains("request failed"));
    }
}
