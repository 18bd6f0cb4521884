//! CLI for docgrab.

mod commands;
mod notifier;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use docgrab_core::config::{self, DocgrabConfig};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{
    run_check, run_completions, run_config, run_fetch, run_filename, run_resolve, FetchOptions,
};

/// Top-level CLI for docgrab.
#[derive(Debug, Parser)]
#[command(name = "docgrab")]
#[command(about = "docgrab: find the document behind a StudyLib page and download it", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run discovery on a page and print the document URL. Exits 2 if none is found.
    Resolve {
        /// Page URL (also the page location when --html is given).
        page_url: String,
        /// Parse this saved HTML file instead of fetching the page.
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,
        /// Print the resolution as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Find the document behind a page and download it.
    Fetch {
        page_url: String,
        /// Download directory (default: config `download_dir`, else the current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Also act on pages outside the supported site family.
        #[arg(long)]
        any_site: bool,
        /// How long to wait for the viewer's download control.
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
        /// Delay between checks for the download control.
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
    },

    /// Show how a page is classified (supported site, viewer, auto-trigger).
    Check {
        page_url: String,
        /// Parse this saved HTML file instead of fetching the page.
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,
    },

    /// Print the filename a direct download URL would be saved as.
    Filename { url: String },

    /// Print the config file path and the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Resolve {
                page_url,
                html,
                json,
            } => return run_resolve(&load_config()?, &page_url, html, json).await,
            CliCommand::Fetch {
                page_url,
                dir,
                any_site,
                timeout_ms,
                interval_ms,
            } => {
                let opts = FetchOptions {
                    dir,
                    any_site,
                    timeout_ms,
                    interval_ms,
                };
                return run_fetch(load_config()?, &page_url, opts).await;
            }
            CliCommand::Check { page_url, html } => {
                run_check(&load_config()?, &page_url, html).await?
            }
            CliCommand::Filename { url } => run_filename(&load_config()?, &url),
            CliCommand::Config => run_config(&load_config()?)?,
            // No config needed (or created) just to print completions.
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn load_config() -> Result<DocgrabConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
