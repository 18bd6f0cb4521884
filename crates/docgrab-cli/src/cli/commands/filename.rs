//! `docgrab filename <url>` – name a direct download would be saved under.

use docgrab_core::config::DocgrabConfig;
use docgrab_core::url_model::direct_filename;

pub fn run_filename(cfg: &DocgrabConfig, url: &str) {
    println!("{}", direct_filename(url, &cfg.default_filename));
}
