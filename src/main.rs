//! delve - Interactive client for graph query streams
//!
//! CLI entry point for the interactive interpreter.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use delve::config::DelveConfig;
use delve::history::HistoryLog;
use delve::proto::Client;
use delve::render::{Printer, RenderOpts, Renderer};
use delve::repl::Repl;

/// Interactive query interpreter
///
/// Connects to a delve query server and renders result streams as they
/// arrive: nodes with their properties and tags, edit progress, warnings,
/// and errors.
#[derive(Parser, Debug)]
#[command(name = "delve", version, about)]
struct Cli {
    /// Server address as host:port (overrides any configured profile)
    url: Option<String>,

    /// Named profile from the configuration file
    #[arg(long)]
    profile: Option<String>,

    /// Path to the delve.toml configuration file
    #[arg(long, default_value = "delve.toml")]
    config: PathBuf,

    /// Directory for query history (.delve by default)
    #[arg(long, default_value = ".delve")]
    history_dir: PathBuf,

    /// Do not print property lines under nodes
    #[arg(long)]
    hide_props: bool,

    /// Do not print tag lines under nodes
    #[arg(long)]
    hide_tags: bool,

    /// Disable ANSI colors in output
    #[arg(long)]
    no_color: bool,
}

/// Where a session connects and how nodes are displayed there.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    addr: String,
    hide_props: bool,
    hide_tags: bool,
}

/// Pick the server: an explicit URL wins, then a named profile, then the
/// configuration's default profile. Profile display flags come along with
/// the address; an explicit URL carries none.
fn resolve_target(
    url: Option<&str>,
    profile: Option<&str>,
    config: &DelveConfig,
) -> Result<Target> {
    if let Some(url) = url {
        return Ok(Target {
            addr: url.to_string(),
            hide_props: false,
            hide_tags: false,
        });
    }

    let profile = if let Some(name) = profile {
        Some(config.profile(name).with_context(|| {
            format!(
                "Unknown profile '{name}'. Available profiles: {}",
                available_profile_names(config)
            )
        })?)
    } else {
        config.default_profile()
    };

    let Some(profile) = profile else {
        bail!("No server address: pass one as an argument or set a default profile in delve.toml");
    };

    Ok(Target {
        addr: profile.addr.clone(),
        hide_props: profile.hide_props,
        hide_tags: profile.hide_tags,
    })
}

/// Format available profile names for error messages.
fn available_profile_names(config: &DelveConfig) -> String {
    if config.profiles.is_empty() {
        return "none".to_string();
    }
    config
        .profiles
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // A missing config file at the default path just means no profiles.
    if !cli.config.exists() {
        log::debug!("config file {} not found", cli.config.display());
    }
    let config = DelveConfig::load(&cli.config, false)
        .with_context(|| format!("Failed to load config from '{}'", cli.config.display()))?;

    let target = resolve_target(cli.url.as_deref(), cli.profile.as_deref(), &config)?;

    let history =
        HistoryLog::new(&cli.history_dir).context("Failed to initialize query history")?;

    let opts = RenderOpts {
        hide_props: cli.hide_props || target.hide_props,
        hide_tags: cli.hide_tags || target.hide_tags,
    };
    let printer = Printer::new(std::io::stdout(), !cli.no_color);
    let renderer = Renderer::new(printer, opts);

    let client = Client::new(target.addr);
    log::info!("using server {}", client.addr());

    let mut repl = Repl::new(client, renderer, history);
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    repl.run(input).await
}
