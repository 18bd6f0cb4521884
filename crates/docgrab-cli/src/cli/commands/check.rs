//! `docgrab check <page-url>` – show how a page is classified.

use anyhow::{Context, Result};
use docgrab_core::config::DocgrabConfig;
use docgrab_core::host::http::HttpHost;
use docgrab_core::page::{classify, PageClass};
use std::path::PathBuf;

use super::load_page;

fn yes_no(v: bool) -> &'static str {
    if v {
        "yes"
    } else {
        "no"
    }
}

pub async fn run_check(cfg: &DocgrabConfig, page_url: &str, html: Option<PathBuf>) -> Result<()> {
    let (location, title, class) = tokio::task::spawn_blocking({
        let cfg = cfg.clone();
        let page_url = page_url.to_string();
        move || -> Result<(String, String, PageClass)> {
            let host = HttpHost::from_config(&cfg);
            let ctx = load_page(&host, &page_url, html.as_deref())?;
            let title = ctx.title();
            let class = classify(
                ctx.location(),
                &title,
                &cfg.markers.site_family,
                &cfg.markers.viewer_path,
            );
            Ok((ctx.location().to_string(), title, class))
        }
    })
    .await
    .context("check task join")??;

    println!("{:<24} {}", "location", location);
    println!("{:<24} {}", "title", title);
    println!("{:<24} {}", "supported site", yes_no(class.supported_site));
    println!("{:<24} {}", "viewer page", yes_no(class.viewer_page));
    println!("{:<24} {}", "auto-trigger", yes_no(class.auto_trigger));
    println!(
        "{:<24} {}",
        "download button",
        yes_no(class.offers_download_button)
    );
    Ok(())
}
