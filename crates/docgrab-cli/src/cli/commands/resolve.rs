//! `docgrab resolve <page-url>` – run discovery and print what was found.

use anyhow::{Context, Result};
use docgrab_core::config::DocgrabConfig;
use docgrab_core::host::http::HttpHost;
use docgrab_core::resolver::Resolution;
use std::path::PathBuf;
use std::process::ExitCode;

use super::load_page;

/// Exit status when no document URL was found.
pub const NOT_FOUND_EXIT: u8 = 2;

pub async fn run_resolve(
    cfg: &DocgrabConfig,
    page_url: &str,
    html: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode> {
    let resolution = tokio::task::spawn_blocking({
        let cfg = cfg.clone();
        let page_url = page_url.to_string();
        move || -> Result<Resolution> {
            let host = HttpHost::from_config(&cfg);
            let ctx = load_page(&host, &page_url, html.as_deref())?;
            Ok(cfg.resolver().resolve(&ctx))
        }
    })
    .await
    .context("resolve task join")??;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        match &resolution {
            Resolution::Found { url, strategy } => {
                println!("{:<10} {}", "STRATEGY", strategy);
                println!("{:<10} {}", "KIND", strategy.resource_kind());
                println!("{:<10} {}", "URL", url);
            }
            Resolution::NotFound => println!("No document URL found."),
        }
    }

    Ok(if resolution.is_found() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(NOT_FOUND_EXIT)
    })
}
