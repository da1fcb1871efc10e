//! Command dispatch logic for repo-score

use super::Host;
use super::config::Config;
use crate::Result;
use crate::facts::Resolver;
use crate::facts::hosting::Client;
use crate::metrics::Pipeline;
use crate::reports::generate_ndjson;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, ValueEnum};
use std::io::Write;

const LOG_TARGET: &str = "       run";

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

#[derive(Parser, Debug)]
#[command(name = "repo-score", version, author, long_about = None)]
#[command(about = "Score the health of an open-source repository")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    /// GitHub repository URL, or npmjs.com package URL
    #[arg(value_name = "URL")]
    url: String,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Path to configuration file (default is `repo-score.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    log_level: LogLevel,

    /// Measure ramp-up even when the configuration leaves it disabled
    #[arg(long)]
    ramp_up: bool,
}

/// Score the repository named on the command line and print its NDJSON record
///
/// Metric failures never fail the run; they show up as zero scores. An error is returned
/// only when the configuration is invalid or the URL cannot be resolved to a repository.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.log_level);

    match score(host, &cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = writeln!(host.error(), "❌ {e}");
            host.exit(1);
            Err(e)
        }
    }
}

async fn score<H: Host>(host: &mut H, cli: &Cli) -> Result<()> {
    let mut config = Config::load(Utf8Path::new("."), cli.config.as_deref())?;
    if cli.ramp_up {
        config.ramp_up.enabled = true;
    }

    let repo = Resolver::new(&config.hosting.npm_registry_url)?.resolve(&cli.url).await?;
    log::debug!(target: LOG_TARGET, "'{}' resolved to '{repo}'", cli.url);

    let client = Client::new(cli.github_token.as_deref(), &config.hosting.api_base_url)?;
    if cli.github_token.as_deref().is_none_or(|t| t.trim().is_empty()) {
        log::warn!(target: LOG_TARGET, "No GitHub token provided, metrics that query GitHub will score 0");
    }

    let result = Pipeline::new(&client, &config, Utc::now()).run(&repo).await;

    let mut line = String::new();
    generate_ndjson(&cli.url, &result, &mut line)?;
    host.output().write_all(line.as_bytes())?;

    Ok(())
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A logger may already be installed when running in-process more than once
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "repo-score",
            "https://github.com/a/b",
            "--github-token",
            "abc",
            "--config",
            "custom.toml",
            "--log-level",
            "debug",
            "--ramp-up",
        ]);

        assert_eq!(cli.url, "https://github.com/a/b");
        assert_eq!(cli.github_token.as_deref(), Some("abc"));
        assert_eq!(cli.config.as_deref(), Some(Utf8Path::new("custom.toml")));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert!(cli.ramp_up);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["repo-score", "https://github.com/a/b", "--github-token", ""]).unwrap();

        assert_eq!(cli.log_level, LogLevel::None);
        assert!(cli.config.is_none());
        assert!(!cli.ramp_up);
    }

    #[test]
    fn test_cli_requires_url() {
        let _ = Cli::try_parse_from(["repo-score"]).unwrap_err();
    }

    #[tokio::test]
    async fn test_unresolvable_url_fails() {
        let mut host = TestHost::default();
        let result = run(&mut host, ["repo-score", "https://gitlab.com/a/b", "--github-token", ""]).await;

        let _ = result.unwrap_err();
        assert_eq!(host.exit_code, Some(1));
        assert!(host.output_buf.is_empty());
        assert!(!host.error_buf.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[weights]\nlicense = 2.0\nramp_up = 0.0\ncorrectness = 0.0\nresponsiveness = 0.0\n").unwrap();

        let mut host = TestHost::default();
        let result = run(
            &mut host,
            ["repo-score", "https://github.com/a/b", "--github-token", "", "--config", path.to_str().unwrap()],
        )
        .await;

        let _ = result.unwrap_err();
        assert_eq!(host.exit_code, Some(1));
        assert!(host.output_buf.is_empty());
    }
}
