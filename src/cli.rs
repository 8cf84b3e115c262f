use crate::credential;
use crate::github::{GraphQlClient, DEFAULT_API_URL};
use crate::model::WindowBoundary;
use crate::stats::{self, ReportOptions};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "orgstats")]
#[command(about = "Per-author commit and review statistics for every repository of a GitHub organization")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Which GitHub organization to collect statistics for")]
    pub org: String,

    #[arg(long, help = "Show the all time stats along with the last year")]
    pub show_totals: bool,

    #[arg(long, help = "Output the data in CSV format")]
    pub csv: bool,

    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub API token (defaults to the 'github-read-org' keyring entry)"
    )]
    pub token: Option<String>,

    #[arg(long, env = "ORGSTATS_API_URL", default_value = DEFAULT_API_URL, help = "GraphQL endpoint")]
    pub api_url: String,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let boundary = WindowBoundary::trailing_year(Utc::now());
        init_logging(self.verbose);

        let token = credential::resolve(self.token.as_deref())
            .context("Failed to get GitHub API key")?;
        let client = GraphQlClient::new(&self.api_url, token)
            .context("Failed to build GitHub client")?;
        info!(org = %self.org, endpoint = client.endpoint(), window_start = %boundary.start, "collecting statistics");

        let options = ReportOptions::from_flags(self.show_totals, self.csv);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        stats::exec(&client, &self.org, &boundary, options, true, &mut out)
    }
}

fn init_logging(verbose: bool) {
    let filter = log_filter(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

/// Directives from `RUST_LOG` when it is set, WARN otherwise. `--verbose`
/// raises the default level to DEBUG without dropping any target directives.
fn log_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    let default = if verbose { "debug" } else { "warn" };
    let filter = match directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(default))
        }
        None => EnvFilter::new(default),
    };
    if verbose {
        filter.add_directive(Level::DEBUG.into())
    } else {
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["orgstats", "--show-totals", "--csv", "acme"]).unwrap();
        assert_eq!(cli.org, "acme");
        assert!(cli.show_totals);
        assert!(cli.csv);
    }

    #[test]
    fn organization_is_required() {
        assert!(Cli::try_parse_from(["orgstats"]).is_err());
        assert!(Cli::try_parse_from(["orgstats", "a", "b"]).is_err());
    }

    #[test]
    fn rust_log_level_is_kept_without_verbose() {
        let filter = log_filter(false, Some("debug"));
        assert_eq!(filter.to_string(), "debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn default_level_follows_verbose_flag() {
        assert_eq!(log_filter(false, None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(false, Some("  ")).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(true, None).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn verbose_keeps_target_directives() {
        let filter = log_filter(true, Some("orgstats=trace"));
        assert!(filter.to_string().contains("orgstats=trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }
}
