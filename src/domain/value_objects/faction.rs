//! Factions and player statuses
//!
//! Both carry an opaque localization key; the engine never renders them.

use serde::{Deserialize, Serialize};

/// The side a role wins with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Defending majority
    Villager,
    /// Attacking faction
    Werewolf,
    /// Independent trickster whose survival overrides both main factions
    Fox,
    /// Independent that wins by getting executed
    Teruteru,
}

impl Faction {
    pub fn key(&self) -> &'static str {
        match self {
            Faction::Villager => "TeamVillager",
            Faction::Werewolf => "TeamWerewolf",
            Faction::Fox => "TeamFox",
            Faction::Teruteru => "TeamTeruteru",
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Faction::Fox | Faction::Teruteru)
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Life status of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    Alive,
    /// Died to the night attack
    Killed,
    /// Removed by the day vote
    Executed,
    /// Died from being divined (Fox)
    Cursed,
    /// Taken down by a revenge ability
    Revenged,
}

impl PlayerStatus {
    pub fn key(&self) -> &'static str {
        match self {
            PlayerStatus::Alive => "Alive",
            PlayerStatus::Killed => "Killed",
            PlayerStatus::Executed => "Executed",
            PlayerStatus::Cursed => "Cursed",
            PlayerStatus::Revenged => "Revenged",
        }
    }
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
