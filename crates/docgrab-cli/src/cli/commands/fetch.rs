//! `docgrab fetch <page-url>` – find the document behind a page and save it.

use anyhow::{Context, Result};
use docgrab_core::config::DocgrabConfig;
use docgrab_core::dispatch::Outcome;
use docgrab_core::host::http::HttpHost;
use docgrab_core::page::is_supported_site;
use docgrab_core::session::{Report, Session};
use std::path::PathBuf;
use std::process::ExitCode;

use super::load_page;
use super::resolve::NOT_FOUND_EXIT;
use crate::cli::notifier::TerminalNotifier;

/// Command-line overrides for one fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub dir: Option<PathBuf>,
    pub any_site: bool,
    pub timeout_ms: Option<u64>,
    pub interval_ms: Option<u64>,
}

impl FetchOptions {
    fn apply(&self, cfg: &mut DocgrabConfig) {
        if let Some(dir) = &self.dir {
            cfg.download_dir = Some(dir.clone());
        }
        if let Some(ms) = self.timeout_ms {
            cfg.poll.timeout_ms = ms;
        }
        if let Some(ms) = self.interval_ms {
            cfg.poll.interval_ms = ms;
        }
    }
}

pub async fn run_fetch(mut cfg: DocgrabConfig, page_url: &str, opts: FetchOptions) -> Result<ExitCode> {
    opts.apply(&mut cfg);
    if !opts.any_site && !is_supported_site(page_url, &cfg.markers.site_family) {
        anyhow::bail!(
            "{page_url} is not a {} page (pass --any-site to try anyway)",
            cfg.markers.site_family
        );
    }

    let report = tokio::task::spawn_blocking({
        let page_url = page_url.to_string();
        move || -> Result<Report> {
            let host = HttpHost::from_config(&cfg);
            let ctx = load_page(&host, &page_url, None)?;
            let session = Session::from_config(&cfg, host, TerminalNotifier);
            Ok(session.analyze(&ctx))
        }
    })
    .await
    .context("fetch task join")??;

    tracing::debug!(?report, "fetch finished");
    Ok(print_outcome(report.outcome))
}

/// Saved paths go to stdout; everything else has already been announced
/// on stderr by the notifier, or gets a hint here.
fn print_outcome(outcome: Option<Outcome>) -> ExitCode {
    match outcome {
        None => ExitCode::from(NOT_FOUND_EXIT),
        Some(Outcome::Saved(path)) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Some(Outcome::Activated(activation)) => {
            match activation.saved {
                Some(path) => println!("{}", path.display()),
                None => println!("{}", activation.target),
            }
            ExitCode::SUCCESS
        }
        Some(Outcome::ActivationTimedOut { url }) => {
            eprintln!("The viewer's download control did not appear. Open it manually: {url}");
            ExitCode::FAILURE
        }
        Some(Outcome::PopupBlocked { .. }) => ExitCode::FAILURE,
        Some(Outcome::SaveFailed { url, reason }) => {
            eprintln!("{url}: {reason}");
            ExitCode::FAILURE
        }
    }
}
