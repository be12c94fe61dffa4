//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Client id scraped when none is given.
pub const DEFAULT_CLIENT_ID: &str = "36-67";

/// Scrape a client's projects from the project tracker.
///
/// Walks the client's project list, follows every project to its summary and
/// closeout pages, and writes the extracted records as a JSON workbook.
///
/// Unset options fall back to `~/.config/tracker-scraper/config.toml`, then to
/// built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "tracker-scraper")]
#[command(author, version, about)]
pub struct Args {
    /// Client id to scrape (default 36-67)
    #[arg(value_name = "CLIENT_ID", conflicts_with = "client_id")]
    pub client: Option<String>,

    /// Client id to scrape, as a flag
    #[arg(long = "client-id", value_name = "CLIENT_ID")]
    pub client_id: Option<String>,

    /// Directory the export is written to (default: current directory)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Courtesy delay before every request in milliseconds (0-60000)
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub delay_ms: Option<u64>,

    /// Maximum attempts per request, including the first (1-10)
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_retries: Option<u32>,

    /// Tracker root URL (must end with '/')
    #[arg(long)]
    pub base_url: Option<String>,

    /// Add an Addresses sheet with normalized addresses
    #[arg(long)]
    pub addresses: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// The client id to scrape: positional, then `--client-id`, then the default.
    #[must_use]
    pub fn client_id(&self) -> &str {
        self.client
            .as_deref()
            .or(self.client_id.as_deref())
            .unwrap_or(DEFAULT_CLIENT_ID)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["tracker-scraper"]).unwrap();
        assert_eq!(args.client_id(), DEFAULT_CLIENT_ID);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.addresses);
        assert!(!args.no_progress);
        assert!(args.delay_ms.is_none());
        assert!(args.max_retries.is_none());
        assert!(args.output_dir.is_none());
    }

    #[test]
    fn test_cli_client_id_positional_and_flag() {
        let args = Args::try_parse_from(["tracker-scraper", "01-23"]).unwrap();
        assert_eq!(args.client_id(), "01-23");

        let args = Args::try_parse_from(["tracker-scraper", "--client-id", "45-67"]).unwrap();
        assert_eq!(args.client_id(), "45-67");
    }

    #[test]
    fn test_cli_client_id_positional_conflicts_with_flag() {
        let err = Args::try_parse_from(["tracker-scraper", "01-23", "--client-id", "45-67"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["tracker-scraper", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["tracker-scraper", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["tracker-scraper", "--quiet"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["tracker-scraper", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["tracker-scraper", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["tracker-scraper", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_delay_bounds() {
        let args = Args::try_parse_from(["tracker-scraper", "-d", "0"]).unwrap();
        assert_eq!(args.delay_ms, Some(0));

        let args = Args::try_parse_from(["tracker-scraper", "--delay-ms", "60000"]).unwrap();
        assert_eq!(args.delay_ms, Some(60_000));

        let err = Args::try_parse_from(["tracker-scraper", "-d", "60001"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_max_retries_bounds() {
        let args = Args::try_parse_from(["tracker-scraper", "-r", "10"]).unwrap();
        assert_eq!(args.max_retries, Some(10));

        let err = Args::try_parse_from(["tracker-scraper", "-r", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let err = Args::try_parse_from(["tracker-scraper", "-r", "11"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_output_and_switches() {
        let args = Args::try_parse_from([
            "tracker-scraper",
            "-o",
            "/tmp/out",
            "--addresses",
            "--no-progress",
            "--base-url",
            "http://localhost:8080/tracker/",
        ])
        .unwrap();
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/out")));
        assert!(args.addresses);
        assert!(args.no_progress);
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:8080/tracker/"));
    }
}
