//! # turbotext
//!
//! A terminal reader for a broadcaster's teletext web frontend. It scrapes
//! the numbered HTML pages the frontend serves and renders them as a
//! navigable text-mode display with the classic teletext palette and a
//! locally computed clock.
//!
//! ## Usage
//!
//! ```sh
//! turbotext
//! turbotext --start-page 200
//! ```
//!
//! ## Keys
//!
//! - `0`-`9`: dial a three-digit page number
//! - Left/Right: previous/next existing page (gaps are skipped)
//! - Up/Down, `+`/`-`: next/previous sub-page
//! - Tab, Enter: cycle and follow the page's links
//! - Backspace: back through the visit history
//! - `q`, Esc, Ctrl-C: quit
//!
//! The parsing is tied to the frontend's current HTML output and breaks
//! loudly when that output changes.

use clap::Parser;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod client;
mod error;
mod models;
mod nav;
mod parse;
mod ui;
mod utils;

use cli::Cli;
use client::TeletextClient;
use error::Result;
use ui::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the alternate screen stays clean; quiet unless
    // RUST_LOG says otherwise.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    info!(base_url = %args.base_url, start_page = args.start_page, "turbotext starting up");

    let client = TeletextClient::new(&args.base_url, Duration::from_secs(args.timeout_secs))?;
    let app = App::init(client, args.start_page).await?;
    app.run().await
}
