//! `layerclaw init` — write a default config and create the memory directory.

use super::{CliResult, load_config};
use layerclaw_config::AppConfig;

pub fn run() -> CliResult {
    let config_path = AppConfig::config_path();

    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("Wrote default config to {}", config_path.display());
    }

    let config = load_config()?;
    let dir = config.memory.dir();
    std::fs::create_dir_all(&dir)?;
    println!("Memory directory: {}", dir.display());
    tracing::debug!(dir = %dir.display(), "Memory directory ready");

    Ok(())
}
