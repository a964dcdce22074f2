//! Game settings value object
//!
//! Rule parameters that the host process may tune per deployment. They are
//! read once when a game is created and stay fixed for its lifetime.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// All configurable rule settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSettings {
    // Roster
    pub min_players: usize,
    pub max_players: usize,

    // Voting
    /// Seconds a player has to answer a choice before it counts as an abstain
    pub vote_timeout_secs: u64,

    // Presentation
    pub locale: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            min_players: 4,
            max_players: 20,
            vote_timeout_secs: 120,
            locale: "ja".to_string(),
        }
    }
}

impl GameSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_players: env_or("WEREWOLF_MIN_PLAYERS", defaults.min_players),
            max_players: env_or("WEREWOLF_MAX_PLAYERS", defaults.max_players),
            vote_timeout_secs: env_or("WEREWOLF_VOTE_TIMEOUT_SECS", defaults.vote_timeout_secs),
            locale: env_or("WEREWOLF_LOCALE", defaults.locale),
        }
    }

    pub fn vote_timeout(&self) -> Duration {
        Duration::from_secs(self.vote_timeout_secs)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
