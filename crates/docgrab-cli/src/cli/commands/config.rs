//! `docgrab config` – show where the config lives and what is in effect.

use anyhow::Result;
use docgrab_core::config::{self, DocgrabConfig};

pub fn run_config(cfg: &DocgrabConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", cfg.to_toml()?);
    Ok(())
}
