//! The interactive reader.
//!
//! A single sequential loop: paint the current page, wait up to one second
//! for a key, act on it, repeat. A page fetch blocks the interface until
//! the page is ready; on a failed fetch the previous page stays up and the
//! error lands in the status bar.

use crate::client::TeletextClient;
use crate::error::{Error, Result};
use crate::models::TeletextPage;
use crate::nav::Navigator;
use crate::ui::view::{self, ViewSnap};
use crate::utils::format_clock;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::task;
use tracing::{info, warn};

/// How long one loop iteration waits for a key before repainting the clock.
const INPUT_POLL: Duration = Duration::from_secs(1);

enum Flow {
    Continue,
    Quit,
}

pub struct App {
    client: TeletextClient,
    nav: Navigator,
    current: TeletextPage,
    link_cursor: Option<usize>,
    notice: Option<String>,
}

impl App {
    /// Fetch the page directory and the start page, then build the app.
    pub async fn init(client: TeletextClient, start_page: u16) -> Result<Self> {
        let directory = client.fetch_directory().await?;
        let nav = Navigator::new(directory, start_page).ok_or(Error::MalformedDirectory)?;
        let current = client.fetch_page(nav.page(), nav.sub_page()).await?;
        info!(page = nav.page(), "Initial page loaded");
        Ok(App {
            client,
            nav,
            current,
            link_cursor: None,
            notice: None,
        })
    }

    /// Run the event loop inside the alternate screen, restoring the
    /// terminal on the way out even when the loop failed.
    pub async fn run(mut self) -> Result<()> {
        let mut term = setup_terminal()?;
        let result = self.event_loop(&mut term).await;
        let restored = restore_terminal(&mut term);
        result.and(restored)
    }

    async fn event_loop(&mut self, term: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            self.draw(term)?;

            // Crossterm reads block, so they run on the blocking pool. A
            // poll timeout just falls through to the next clock repaint.
            let ready = task::spawn_blocking(|| event::poll(INPUT_POLL)).await??;
            if !ready {
                continue;
            }
            let ev = task::spawn_blocking(event::read).await??;
            match ev {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Flow::Quit = self.handle_key(key).await? {
                        break;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn draw(&mut self, term: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let snap = ViewSnap {
            grid: &self.current.grid,
            clock: format_clock(Local::now().naive_local()),
            page: self.nav.page(),
            sub_page: self.nav.sub_page(),
            sub_page_count: self.nav.sub_page_count(),
            pending: self.nav.pending_display(),
            highlighted_link: self.highlighted_link(),
            notice: self.notice.as_deref(),
        };
        view::draw(term, &snap)
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<Flow> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Ok(Flow::Quit),
            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => return Ok(Flow::Quit),
            (KeyCode::Char(ch), _) if ch.is_ascii_digit() => {
                self.link_cursor = None;
                if let Some(number) = self.nav.push_digit(ch as u8 - b'0') {
                    if let Some((page, sub_page)) = self.nav.target_page(number) {
                        self.load(page, sub_page, true).await;
                    }
                }
            }
            (KeyCode::Right, _) => self.go(self.nav.target_next_page()).await,
            (KeyCode::Left, _) => self.go(self.nav.target_prev_page()).await,
            (KeyCode::Up, _) | (KeyCode::Char('+'), _) => {
                self.go(self.nav.target_next_sub()).await
            }
            (KeyCode::Down, _) | (KeyCode::Char('-'), _) => {
                self.go(self.nav.target_prev_sub()).await
            }
            (KeyCode::Backspace, _) => {
                if let Some((page, sub_page)) = self.nav.pop_history() {
                    self.load(page, sub_page, false).await;
                }
            }
            (KeyCode::Tab, _) => self.cycle_link(),
            (KeyCode::Enter, _) => {
                if let Some(link) = self.highlighted_link() {
                    if let Some((page, sub_page)) = self.nav.target_page(link) {
                        self.load(page, sub_page, true).await;
                    }
                }
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    async fn go(&mut self, target: Option<(u16, u8)>) {
        self.nav.clear_pending();
        if let Some((page, sub_page)) = target {
            self.load(page, sub_page, true).await;
        }
    }

    fn highlighted_link(&self) -> Option<u16> {
        self.link_cursor
            .and_then(|index| self.current.links.get(index).copied())
    }

    fn cycle_link(&mut self) {
        if self.current.links.is_empty() {
            self.link_cursor = None;
            return;
        }
        self.link_cursor = Some(match self.link_cursor {
            Some(index) => (index + 1) % self.current.links.len(),
            None => 0,
        });
    }

    /// Fetch a page and commit the move. A failed fetch leaves the position
    /// and the displayed page unchanged.
    async fn load(&mut self, page: u16, sub_page: u8, remember: bool) {
        match self.client.fetch_page(page, sub_page).await {
            Ok(fetched) => {
                info!(page, sub_page, links = fetched.links.len(), "Loaded page");
                self.nav.commit(page, sub_page, remember);
                self.current = fetched;
                self.link_cursor = None;
                self.notice = None;
            }
            Err(e) => {
                warn!(page, sub_page, error = %e, "Page load failed");
                self.notice = Some(e.to_string());
            }
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut term = Terminal::new(CrosstermBackend::new(stdout))?;
    term.clear()?;
    term.hide_cursor()?;
    Ok(term)
}

fn restore_terminal(term: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    term.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PageDirectory, PageGrid};

    fn app_with_links(links: Vec<u16>) -> App {
        let directory = PageDirectory::from_entries([(100, 1), (110, 1)]);
        let nav = Navigator::new(directory, 100).unwrap();
        App {
            client: TeletextClient::new("http://example.com/ttx", Duration::from_secs(1)).unwrap(),
            current: TeletextPage {
                page: nav.page(),
                sub_page: nav.sub_page(),
                grid: PageGrid::new(),
                links,
            },
            nav,
            link_cursor: None,
            notice: None,
        }
    }

    #[test]
    fn test_link_cycling_wraps() {
        let mut app = app_with_links(vec![110, 120]);
        assert_eq!(app.highlighted_link(), None);
        app.cycle_link();
        assert_eq!(app.highlighted_link(), Some(110));
        app.cycle_link();
        assert_eq!(app.highlighted_link(), Some(120));
        app.cycle_link();
        assert_eq!(app.highlighted_link(), Some(110));
    }

    #[test]
    fn test_link_cycling_with_no_links() {
        let mut app = app_with_links(Vec::new());
        app.cycle_link();
        assert_eq!(app.highlighted_link(), None);
    }
}
