//! Roles - The closed set of roles a player can be dealt
//!
//! `Role` is a plain tagged value: it carries the static attributes of a role
//! (faction, fortune result, localization keys) and hands out the matching
//! `RoleBehavior` for the hooks. Each behavior type only overrides the hooks
//! it cares about; everything else falls through to the no-op defaults.

mod neutral;
mod villager_team;
mod werewolf_team;

use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::Game;
use crate::domain::errors::GameError;
use crate::domain::value_objects::{Faction, PlayerId, PlayerStatus};

pub use neutral::{Fox, Teruteru};
pub use villager_team::{Bakery, Hunter, Medium, Nekomata, Seer, Villager};
pub use werewolf_team::{BlackCat, Madmate, Werewolf};

/// Night abilities a role performs. Declaration order is resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NightAction {
    /// Shield a living player from the attack for this cycle
    Guard,
    /// Learn a living player's fortune result
    Divine,
    /// Learn the fortune result of the player executed the previous day
    Medium,
}

/// What a night ability did, told privately to the player who used it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightReport {
    Guarded { target: PlayerId },
    Divined { target: PlayerId, revealed: Faction },
    MediumRead { target: PlayerId, revealed: Faction },
}

/// State a hook may act on
pub struct HookContext<'a> {
    pub game: &'a mut Game,
    /// The player whose role owns the hook
    pub subject: PlayerId,
    /// The player whose action triggered the hook, if any
    pub actor: Option<PlayerId>,
    pub rng: &'a mut dyn RngCore,
}

/// Capability interface shared by every role
pub trait RoleBehavior: Send + Sync {
    /// Target selection this role performs each night
    fn night_action(&self) -> Option<NightAction> {
        None
    }

    /// Carry out the night action. `target` is the owner's pick, `None` when
    /// they chose nothing in time.
    fn on_night_action(
        &self,
        _ctx: &mut HookContext<'_>,
        _target: Option<PlayerId>,
    ) -> Result<Option<NightReport>, GameError> {
        Ok(None)
    }

    /// Called after a clairvoyant looked at the subject
    fn on_fortune_checked(&self, _ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        Ok(())
    }

    /// Called after the night attack killed the subject
    fn on_killed(&self, _ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        Ok(())
    }

    /// Called after the day vote executed the subject
    fn on_executed(&self, _ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        Ok(())
    }
}

/// Take one random other survivor down with the subject
fn take_revenge(ctx: &mut HookContext<'_>) -> Result<(), GameError> {
    let candidates: Vec<PlayerId> = ctx
        .game
        .alive_player_ids()
        .into_iter()
        .filter(|id| *id != ctx.subject)
        .collect();

    match candidates.choose(&mut *ctx.rng) {
        Some(&target) => ctx.game.ability_kill(ctx.subject, target, PlayerStatus::Revenged),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Villager,
    Werewolf,
    Seer,
    Hunter,
    Medium,
    Bakery,
    Nekomata,
    Madmate,
    BlackCat,
    Fox,
    Teruteru,
}

impl Role {
    pub const ALL: [Role; 11] = [
        Role::Villager,
        Role::Werewolf,
        Role::Seer,
        Role::Hunter,
        Role::Medium,
        Role::Bakery,
        Role::Nekomata,
        Role::Madmate,
        Role::BlackCat,
        Role::Fox,
        Role::Teruteru,
    ];

    /// Unique key, also the localization key of the role name
    pub fn key(&self) -> &'static str {
        match self {
            Role::Villager => "Villager",
            Role::Werewolf => "Werewolf",
            Role::Seer => "Seer",
            Role::Hunter => "Hunter",
            Role::Medium => "Medium",
            Role::Bakery => "Bakery",
            Role::Nekomata => "Nekomata",
            Role::Madmate => "Madmate",
            Role::BlackCat => "BlackCat",
            Role::Fox => "Fox",
            Role::Teruteru => "Teruteru",
        }
    }

    /// The faction this role wins with
    pub fn faction(&self) -> Faction {
        match self {
            Role::Villager
            | Role::Seer
            | Role::Hunter
            | Role::Medium
            | Role::Bakery
            | Role::Nekomata => Faction::Villager,
            Role::Werewolf | Role::Madmate | Role::BlackCat => Faction::Werewolf,
            Role::Fox => Faction::Fox,
            Role::Teruteru => Faction::Teruteru,
        }
    }

    /// The faction a fortune check reports. Only real werewolves show up as such.
    pub fn fortune_result(&self) -> Faction {
        match self {
            Role::Werewolf => Faction::Werewolf,
            _ => Faction::Villager,
        }
    }

    pub fn description_key(&self) -> String {
        format!("{}Description", self.key())
    }

    pub fn win_condition_key(&self) -> &'static str {
        match self {
            Role::Madmate | Role::BlackCat => "MadmateWinCondition",
            _ => match self.faction() {
                Faction::Villager => "VillagerWinCondition",
                Faction::Werewolf => "WerewolfWinCondition",
                Faction::Fox => "FoxWinCondition",
                Faction::Teruteru => "TeruteruWinCondition",
            },
        }
    }

    /// Whether this role votes in the night attack and counts toward the
    /// attacking majority
    pub fn is_attacker(&self) -> bool {
        matches!(self, Role::Werewolf)
    }

    /// Whether the night attack can never kill this role
    pub fn is_kill_protected(&self) -> bool {
        matches!(self, Role::Fox)
    }

    /// Whether this role's survival overrides a main-faction win
    pub fn is_trickster(&self) -> bool {
        matches!(self, Role::Fox)
    }

    pub fn behavior(&self) -> &'static dyn RoleBehavior {
        match self {
            Role::Villager => &Villager,
            Role::Werewolf => &Werewolf,
            Role::Seer => &Seer,
            Role::Hunter => &Hunter,
            Role::Medium => &Medium,
            Role::Bakery => &Bakery,
            Role::Nekomata => &Nekomata,
            Role::Madmate => &Madmate,
            Role::BlackCat => &BlackCat,
            Role::Fox => &Fox,
            Role::Teruteru => &Teruteru,
        }
    }

    pub fn night_action(&self) -> Option<NightAction> {
        self.behavior().night_action()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Role {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_keys() {
        assert_eq!("Seer".parse::<Role>().unwrap(), Role::Seer);
        assert_eq!(" blackcat ".parse::<Role>().unwrap(), Role::BlackCat);
        assert_eq!(
            "Vampire".parse::<Role>(),
            Err(GameError::UnknownRole("Vampire".to_string()))
        );
    }

    #[test]
    fn test_disguised_roles_read_as_villagers() {
        for role in [Role::Madmate, Role::BlackCat, Role::Fox, Role::Teruteru] {
            assert_eq!(role.fortune_result(), Faction::Villager, "{}", role);
        }
        assert_eq!(Role::Werewolf.fortune_result(), Faction::Werewolf);
        assert_eq!(Role::Madmate.faction(), Faction::Werewolf);
    }

    #[test]
    fn test_only_werewolf_attacks() {
        let attackers: Vec<Role> = Role::ALL.iter().copied().filter(Role::is_attacker).collect();
        assert_eq!(attackers, vec![Role::Werewolf]);
    }

    #[test]
    fn test_night_actions() {
        assert_eq!(Role::Seer.night_action(), Some(NightAction::Divine));
        assert_eq!(Role::Hunter.night_action(), Some(NightAction::Guard));
        assert_eq!(Role::Medium.night_action(), Some(NightAction::Medium));
        assert_eq!(Role::Villager.night_action(), None);
        assert_eq!(Role::Werewolf.night_action(), None);
        assert!(NightAction::Guard < NightAction::Divine);
        assert!(NightAction::Divine < NightAction::Medium);
    }

    #[test]
    fn test_localization_keys() {
        assert_eq!(Role::Fox.description_key(), "FoxDescription");
        assert_eq!(Role::BlackCat.win_condition_key(), "MadmateWinCondition");
        assert_eq!(Role::Nekomata.win_condition_key(), "VillagerWinCondition");
    }
}
