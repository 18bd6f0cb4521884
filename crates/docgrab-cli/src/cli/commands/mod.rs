//! CLI command handlers, one per file.

mod check;
mod completions;
mod config;
mod fetch;
mod filename;
mod resolve;

pub use check::run_check;
pub use completions::run_completions;
pub use config::run_config;
pub use fetch::{run_fetch, FetchOptions};
pub use filename::run_filename;
pub use resolve::run_resolve;

use anyhow::{Context, Result};
use docgrab_core::host::http::HttpHost;
use docgrab_core::page::PageContext;
use std::path::Path;

/// Page to analyze: a saved HTML file located at `page_url`, or the page
/// fetched live. Blocking; `PageContext` is not `Send`, so call this inside
/// the `spawn_blocking` task that also consumes it.
fn load_page(host: &HttpHost, page_url: &str, html: Option<&Path>) -> Result<PageContext> {
    match html {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read html: {}", path.display()))?;
            Ok(PageContext::parse(page_url, &text))
        }
        None => host
            .load(page_url)
            .with_context(|| format!("fetch page: {page_url}")),
    }
}
