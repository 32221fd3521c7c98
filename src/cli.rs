//! Command-line interface definitions.
//!
//! All options have defaults; the reader starts straight into the service's
//! front page when invoked bare.

use clap::Parser;

/// Command-line arguments for the teletext reader.
///
/// # Examples
///
/// ```sh
/// # Read the default frontend, starting at page 100
/// turbotext
///
/// # Start on the sports pages of a different frontend
/// turbotext --base-url https://example.org/teletext --start-page 200
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL of the teletext web frontend
    #[arg(
        long,
        env = "TTX_BASE_URL",
        default_value = "https://www.ndr.de/public/teletext"
    )]
    pub base_url: String,

    /// Page shown at startup
    #[arg(short, long, env = "TTX_START_PAGE", default_value_t = 100)]
    pub start_page: u16,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["turbotext"]);
        assert_eq!(cli.base_url, "https://www.ndr.de/public/teletext");
        assert_eq!(cli.start_page, 100);
        assert_eq!(cli.timeout_secs, 10);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "turbotext",
            "--base-url",
            "http://localhost:8080/ttx",
            "--start-page",
            "200",
            "--timeout-secs",
            "3",
        ]);
        assert_eq!(cli.base_url, "http://localhost:8080/ttx");
        assert_eq!(cli.start_page, 200);
        assert_eq!(cli.timeout_secs, 3);
    }

    #[test]
    fn test_cli_short_start_page_flag() {
        let cli = Cli::parse_from(["turbotext", "-s", "544"]);
        assert_eq!(cli.start_page, 544);
    }
}
