mod config;
mod contrib;
mod github;
mod report;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use contrib::DiscoveryMode;
use report::OutputFormat;

/// contrib-report — summarize one user's GitHub contribution activity
/// (pull requests, reviews, comments, lines changed, busiest repositories)
/// over an optional date range.
///
/// Every option falls back to its GITHUB_* environment variable, then to
/// `.contrib-report.toml`.
#[derive(Parser, Debug)]
#[command(name = "contrib-report", version, about)]
struct Cli {
    /// GitHub login to report on [env: GITHUB_USERNAME]
    #[arg(short, long)]
    username: Option<String>,

    /// Personal access token [env: GITHUB_TOKEN]
    #[arg(long)]
    token: Option<String>,

    /// GitHub Enterprise host, e.g. https://github.example.com [env: GITHUB_ENTERPRISE_URL]
    #[arg(long)]
    enterprise_url: Option<String>,

    /// Talk to a GitHub Enterprise instance instead of github.com [env: GITHUB_IS_ENTERPRISE]
    #[arg(long)]
    enterprise: bool,

    /// Only count pull requests created on or after this date (YYYY-MM-DD) [env: GITHUB_START_DATE]
    #[arg(long)]
    since: Option<String>,

    /// Only count pull requests created on or before this date (YYYY-MM-DD) [env: GITHUB_END_DATE]
    #[arg(long)]
    until: Option<String>,

    /// Skip TLS certificate verification (self-signed Enterprise hosts) [env: GITHUB_VERIFY_SSL=false]
    #[arg(long)]
    no_verify_tls: bool,

    /// How to find repositories to scan
    #[arg(long, value_enum)]
    mode: Option<DiscoveryMode>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to ./.contrib-report.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            username: self.username.clone(),
            token: self.token.clone(),
            enterprise_url: self.enterprise_url.clone(),
            enterprise: self.enterprise,
            since: self.since.clone(),
            until: self.until.clone(),
            no_verify_tls: self.no_verify_tls,
            mode: self.mode,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let settings = config::Config::load(cli.config.as_deref())?
        .resolve(&cli.overrides(), |key| std::env::var(key).ok())?;
    debug!(?settings, "resolved configuration");

    let _main_span = info_span!(
        "contrib_report",
        user = %settings.credentials.username,
        base_url = %settings.credentials.base_url,
    )
    .entered();

    let client = github::HttpClient::new(&settings.credentials)?;

    info!(mode = %settings.mode, "collecting contributions");
    let built_report = contrib::collect(&client, &settings).await?;
    info!(
        reviewed = built_report.pull_requests_reviewed,
        comments = built_report.valid_comments,
        lines_modified = built_report.lines_modified,
        "collection complete"
    );

    info!(format = %cli.format, "generating report");
    report::output(&built_report, cli.format, cli.output.as_deref())?;
    info!("done");

    Ok(())
}
