//! Error type shared across the application.
//!
//! Parsing is deliberately brittle: the remote HTML schema is owned by the
//! broadcaster, and a changed layout surfaces as [`Error::MalformedPage`]
//! rather than being papered over.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("base url is invalid: {0}")]
    BadBaseUrl(#[from] url::ParseError),

    #[error("pages.js did not contain a usable page directory")]
    MalformedDirectory,

    #[error("page {page}_{sub_page:02} does not have the expected <pre> structure")]
    MalformedPage { page: u16, sub_page: u8 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
}
