//! Configuration command.

use anyhow::Context;
use std::path::Path;

use crate::config::{self, Config, ConfigError};

/// Print the config file location and the effective configuration
pub fn cmd_config(explicit: Option<&Path>, current: &Config, init: bool) -> anyhow::Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path().ok_or(ConfigError::NoConfigDir)?,
    };

    if init {
        if path.exists() {
            println!("Config file already exists: {:?}", path);
        } else {
            config::save(&Config::default(), &path)?;
            println!("Wrote default config to {:?}", path);
        }
    }

    if path.exists() {
        println!("Config file: {:?}", path);
    } else {
        println!("Config file: {:?} (not found, using defaults)", path);
    }
    let contents = toml::to_string_pretty(current).context("Failed to serialize config")?;
    println!("\n{}", contents);
    Ok(())
}
