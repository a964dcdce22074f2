//! Application configuration
//!
//! Loaded from an optional `werewolf.toml` next to the binary, overridden by
//! `WEREWOLF_*` environment variables. Rule settings live in `GameSettings`;
//! this only covers how the process itself runs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Optional JSON translation table merged over the built-in strings
    #[serde(default)]
    pub translations_path: Option<PathBuf>,

    /// Number of bots seated in the demo game
    pub demo_players: usize,
    /// Requested roles for the demo game, e.g. `Werewolf=2,Seer=1`
    pub demo_roles: String,
    /// Fixed seed for reproducible demo games
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Config::builder()
            .set_default("log_filter", "werewolf_engine=info")?
            .set_default("demo_players", 7_i64)?
            .set_default("demo_roles", "Werewolf=2,Seer=1,Hunter=1")?
            .add_source(File::with_name("werewolf").required(false))
            .add_source(Environment::with_prefix("WEREWOLF").try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Parse `demo_roles` into `(key, count)` pairs
    pub fn role_counts(&self) -> Result<Vec<(String, usize)>> {
        parse_role_list(&self.demo_roles)
    }
}

fn parse_role_list(list: &str) -> Result<Vec<(String, usize)>> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| -> Result<(String, usize)> {
            let (key, count) = item
                .split_once('=')
                .with_context(|| format!("Role entry '{}' must look like Key=Count", item))?;
            let count = count
                .trim()
                .parse()
                .with_context(|| format!("Role count in '{}' must be a number", item))?;
            Ok((key.trim().to_string(), count))
        })
        .collect()
}
