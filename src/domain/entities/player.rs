//! Player entity - A participant in one game

use serde::{Deserialize, Serialize};

use crate::domain::entities::Role;
use crate::domain::errors::GameError;
use crate::domain::value_objects::{PlayerId, PlayerStatus};

/// A participant and everything the rules track about them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    alive: bool,
    status: PlayerStatus,
    /// Personal shield from the night attack, cleared at the end of each day
    kill_protected: bool,
    role: Option<Role>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            alive: true,
            status: PlayerStatus::Alive,
            kill_protected: false,
            role: None,
        }
    }

    /// Hand the player a role. A role can only be handed out once.
    pub fn assign_role(&mut self, role: Role) -> Result<(), GameError> {
        if self.role.is_some() {
            return Err(GameError::RolesAlreadyAssigned);
        }
        self.role = Some(role);
        Ok(())
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_attacker(&self) -> bool {
        self.role.map(|r| r.is_attacker()).unwrap_or(false)
    }

    /// Personal shield or an inherently unkillable role
    pub fn is_kill_protected(&self) -> bool {
        self.kill_protected || self.role.map(|r| r.is_kill_protected()).unwrap_or(false)
    }

    pub fn protect(&mut self) {
        self.kill_protected = true;
    }

    pub fn clear_protection(&mut self) {
        self.kill_protected = false;
    }

    /// Apply the night attack. Returns whether the player died.
    pub fn kill(&mut self) -> bool {
        if self.is_kill_protected() {
            return false;
        }
        self.die(PlayerStatus::Killed);
        true
    }

    pub fn execute(&mut self) {
        self.die(PlayerStatus::Executed);
    }

    /// Death caused by a role ability; ignores protection
    pub fn ability_kill(&mut self, status: PlayerStatus) {
        self.die(status);
    }

    fn die(&mut self, status: PlayerStatus) {
        self.alive = false;
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_assigned_once() {
        let mut player = Player::new(PlayerId::new(1), "alice");
        player.assign_role(Role::Seer).unwrap();
        assert_eq!(player.assign_role(Role::Werewolf), Err(GameError::RolesAlreadyAssigned));
        assert_eq!(player.role(), Some(Role::Seer));
    }

    #[test]
    fn test_protected_player_survives_kill() {
        let mut player = Player::new(PlayerId::new(1), "alice");
        player.assign_role(Role::Villager).unwrap();
        player.protect();

        assert!(!player.kill());
        assert!(player.is_alive());
        assert_eq!(player.status(), PlayerStatus::Alive);

        player.clear_protection();
        assert!(player.kill());
        assert_eq!(player.status(), PlayerStatus::Killed);
    }

    #[test]
    fn test_fox_cannot_be_killed_but_can_be_cursed() {
        let mut player = Player::new(PlayerId::new(1), "fox");
        player.assign_role(Role::Fox).unwrap();

        assert!(!player.kill());
        assert!(player.is_alive());

        player.ability_kill(PlayerStatus::Cursed);
        assert!(!player.is_alive());
        assert_eq!(player.status(), PlayerStatus::Cursed);
    }
}
