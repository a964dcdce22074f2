//! Game Aggregate - The root aggregate for one running game
//!
//! All liveness changes go through this aggregate so that the derived
//! alive-player list is always recomputed from the roster, never patched.
//! Role hooks receive the aggregate through a `HookContext` and mutate it
//! through the same methods.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{HookContext, NightReport, Player, Role};
use crate::domain::errors::GameError;
use crate::domain::events::{DomainEvent, EventMetadata};
use crate::domain::value_objects::{Faction, GameId, PlayerId, PlayerStatus};

/// Where the game loop currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Night,
    Day,
    Finished,
}

/// Terminal result of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub faction: Faction,
    pub winners: Vec<PlayerId>,
}

/// The Game Aggregate Root
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    host_id: PlayerId,
    /// Full roster in join order, fixed once created
    players: Vec<Player>,
    /// Derived: roster members that are alive
    alive_players: Vec<PlayerId>,
    /// Alive players at the start of the current night
    last_alive_players: Vec<PlayerId>,
    /// Completed nights
    turn: u32,
    requested_roles: Vec<(Role, usize)>,
    assigned_roles: Vec<Role>,
    phase: GamePhase,
    outcome: Option<GameOutcome>,
    /// Player executed on the most recent day
    last_executed: Option<PlayerId>,
    events: Vec<DomainEvent>,
}

impl Game {
    /// Create a game from a finalized roster
    pub fn new(
        id: GameId,
        host_id: PlayerId,
        players: Vec<Player>,
        requested_roles: Vec<(Role, usize)>,
    ) -> Self {
        let mut game = Self {
            id,
            host_id,
            players,
            alive_players: Vec::new(),
            last_alive_players: Vec::new(),
            turn: 0,
            requested_roles,
            assigned_roles: Vec::new(),
            phase: GamePhase::Night,
            outcome: None,
            last_executed: None,
            events: Vec::new(),
        };
        game.refresh_alive_players();
        game.snapshot_last_alive();
        game
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn host_id(&self) -> PlayerId {
        self.host_id
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn requested_roles(&self) -> &[(Role, usize)] {
        &self.requested_roles
    }

    pub fn assigned_roles(&self) -> &[Role] {
        &self.assigned_roles
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn last_executed(&self) -> Option<PlayerId> {
        self.last_executed
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    // ========================================================================
    // Finders
    // ========================================================================

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Look up a player the engine already knows must exist
    pub fn require_player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.player(id).ok_or_else(|| {
            tracing::error!(game_id = %self.id, player_id = %id, "Player lookup failed");
            GameError::PlayerNotFound(id)
        })
    }

    fn require_player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        let game_id = self.id;
        self.players.iter_mut().find(|p| p.id == id).ok_or_else(|| {
            tracing::error!(game_id = %game_id, player_id = %id, "Player lookup failed");
            GameError::PlayerNotFound(id)
        })
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.alive_players.iter().filter_map(move |id| self.player(*id))
    }

    pub fn alive_player_ids(&self) -> Vec<PlayerId> {
        self.alive_players.clone()
    }

    pub fn last_alive_player_ids(&self) -> &[PlayerId] {
        &self.last_alive_players
    }

    pub fn alive_attackers(&self) -> impl Iterator<Item = &Player> {
        self.alive_players().filter(|p| p.is_attacker())
    }

    /// Players alive at the start of the night who are dead now
    pub fn died_since_snapshot(&self) -> Vec<PlayerId> {
        self.last_alive_players
            .iter()
            .copied()
            .filter(|id| !self.alive_players.contains(id))
            .collect()
    }

    pub fn has_assigned(&self, role: Role) -> bool {
        self.assigned_roles.contains(&role)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Hand out roles positionally. Only allowed once per game.
    pub fn assign_roles(&mut self, roles: Vec<Role>) -> Result<(), GameError> {
        if !self.assigned_roles.is_empty() {
            return Err(GameError::RolesAlreadyAssigned);
        }
        if roles.len() != self.players.len() {
            return Err(GameError::RoleCountMismatch {
                roles: roles.len(),
                players: self.players.len(),
            });
        }

        for (player, role) in self.players.iter_mut().zip(roles.iter()) {
            player.assign_role(*role)?;
            tracing::info!(game_id = %self.id, player_id = %player.id, role = %role, "Role assigned");
        }
        self.assigned_roles = roles;

        let assignments: Vec<(PlayerId, Role)> = self
            .players
            .iter()
            .filter_map(|p| p.role().map(|r| (p.id, r)))
            .collect();
        for (player_id, role) in assignments {
            self.record(|metadata| DomainEvent::RoleAssigned {
                metadata,
                player_id,
                role: role.key().to_string(),
            });
        }
        Ok(())
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.is_finished() {
            return;
        }
        self.phase = phase;
    }

    pub fn advance_turn(&mut self) {
        self.turn += 1;
    }

    pub fn refresh_alive_players(&mut self) {
        self.alive_players = self
            .players
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| p.id)
            .collect();
    }

    /// Remember who is alive going into the next night
    pub fn snapshot_last_alive(&mut self) {
        self.last_alive_players = self.alive_players.clone();
    }

    pub fn record(&mut self, build: impl FnOnce(EventMetadata) -> DomainEvent) {
        let event = build(EventMetadata::at_turn(self.turn));
        self.events.push(event);
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    pub fn protect(&mut self, protector_id: PlayerId, target_id: PlayerId) -> Result<(), GameError> {
        self.require_player_mut(target_id)?.protect();
        self.record(|metadata| DomainEvent::PlayerProtected {
            metadata,
            protector_id,
            target_id,
        });
        Ok(())
    }

    pub fn reset_protections(&mut self) {
        for player in &mut self.players {
            player.clear_protection();
        }
    }

    /// Run a fortune check and the target's reaction to it.
    /// Returns the faction the check reveals.
    pub fn fortune_check(
        &mut self,
        seer_id: PlayerId,
        target_id: PlayerId,
        rng: &mut dyn RngCore,
    ) -> Result<Faction, GameError> {
        let role = self.require_player(target_id)?.role();
        let revealed = role.map(|r| r.fortune_result()).unwrap_or(Faction::Villager);
        self.record(|metadata| DomainEvent::FortuneChecked {
            metadata,
            seer_id,
            target_id,
            revealed,
        });

        if let Some(role) = role {
            role.behavior().on_fortune_checked(&mut HookContext {
                game: self,
                subject: target_id,
                actor: Some(seer_id),
                rng,
            })?;
        }
        Ok(revealed)
    }

    /// Let the actor's role carry out its night ability on `target`
    pub fn perform_night_action(
        &mut self,
        actor_id: PlayerId,
        target: Option<PlayerId>,
        rng: &mut dyn RngCore,
    ) -> Result<Option<NightReport>, GameError> {
        let Some(role) = self.require_player(actor_id)?.role() else {
            return Ok(None);
        };
        role.behavior().on_night_action(
            &mut HookContext {
                game: self,
                subject: actor_id,
                actor: Some(actor_id),
                rng,
            },
            target,
        )
    }

    /// Reveal the previous day's executed player to a medium.
    /// `None` when nobody was executed.
    pub fn read_last_executed(&mut self, medium_id: PlayerId) -> Result<Option<(PlayerId, Faction)>, GameError> {
        let Some(target_id) = self.last_executed else {
            return Ok(None);
        };
        let revealed = self
            .require_player(target_id)?
            .role()
            .map(|r| r.fortune_result())
            .unwrap_or(Faction::Villager);

        self.record(|metadata| DomainEvent::MediumRevealed {
            metadata,
            medium_id,
            target_id,
            revealed,
        });
        Ok(Some((target_id, revealed)))
    }

    /// Apply the night attack. Returns whether the target died; a protected
    /// target is left untouched.
    pub fn attack(&mut self, target_id: PlayerId, rng: &mut dyn RngCore) -> Result<bool, GameError> {
        let player = self.require_player_mut(target_id)?;
        let killed = player.kill();
        let role = player.role();

        if !killed {
            tracing::info!(game_id = %self.id, player_id = %target_id, "Attack blocked by protection");
            self.record(|metadata| DomainEvent::AttackBlocked { metadata, target_id });
            return Ok(false);
        }

        self.refresh_alive_players();
        self.record(|metadata| DomainEvent::PlayerKilled { metadata, target_id });

        if let Some(role) = role {
            role.behavior().on_killed(&mut HookContext {
                game: self,
                subject: target_id,
                actor: None,
                rng,
            })?;
        }
        Ok(true)
    }

    /// Execute a player by day vote and run their reaction to it
    pub fn execute(&mut self, target_id: PlayerId, rng: &mut dyn RngCore) -> Result<(), GameError> {
        let player = self.require_player_mut(target_id)?;
        player.execute();
        let role = player.role();

        self.last_executed = Some(target_id);
        self.refresh_alive_players();
        self.record(|metadata| DomainEvent::PlayerExecuted { metadata, target_id });

        if let Some(role) = role {
            role.behavior().on_executed(&mut HookContext {
                game: self,
                subject: target_id,
                actor: None,
                rng,
            })?;
        }
        Ok(())
    }

    pub fn record_no_execution(&mut self) {
        self.last_executed = None;
        self.record(|metadata| DomainEvent::NoExecution { metadata });
    }

    /// A death caused by a role ability. Ignores protection and does not
    /// trigger the victim's own hooks.
    pub fn ability_kill(
        &mut self,
        source_id: PlayerId,
        target_id: PlayerId,
        status: PlayerStatus,
    ) -> Result<(), GameError> {
        self.require_player_mut(target_id)?.ability_kill(status);
        self.refresh_alive_players();
        tracing::info!(
            game_id = %self.id,
            source_id = %source_id,
            player_id = %target_id,
            status = %status,
            "Player died to an ability"
        );
        self.record(|metadata| DomainEvent::AbilityDeath {
            metadata,
            source_id,
            target_id,
            status,
        });
        Ok(())
    }

    /// Mark the game terminal. The first declared outcome stands.
    pub fn declare_winner(&mut self, faction: Faction, winners: Vec<PlayerId>) {
        if self.is_finished() {
            return;
        }
        tracing::info!(game_id = %self.id, faction = %faction, winners = ?winners, "Game decided");
        self.record(|metadata| DomainEvent::GameEnded {
            metadata,
            winning_faction: faction,
            winners: winners.clone(),
        });
        self.outcome = Some(GameOutcome { faction, winners });
        self.phase = GamePhase::Finished;
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::game_with_roles;
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn id(n: u64) -> PlayerId {
        PlayerId::new(n)
    }

    #[test]
    fn test_alive_players_recomputed_after_death() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Villager, Role::Villager]);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(game.attack(id(2), &mut rng).unwrap());
        assert_eq!(game.alive_player_ids(), vec![id(1), id(3)]);
        assert_eq!(game.died_since_snapshot(), vec![id(2)]);

        game.snapshot_last_alive();
        assert!(game.died_since_snapshot().is_empty());
    }

    #[test]
    fn test_roles_cannot_be_reassigned() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Villager]);
        let result = game.assign_roles(vec![Role::Villager, Role::Villager]);
        assert_eq!(result, Err(GameError::RolesAlreadyAssigned));
        assert_eq!(game.players()[0].role(), Some(Role::Werewolf));
    }

    #[test]
    fn test_night_action_runs_the_role_ability() {
        let mut game = game_with_roles(&[Role::Hunter, Role::Seer, Role::Werewolf, Role::Medium]);
        let mut rng = StdRng::seed_from_u64(1);

        let guarded = game.perform_night_action(id(1), Some(id(2)), &mut rng).unwrap();
        assert_eq!(guarded, Some(NightReport::Guarded { target: id(2) }));
        assert!(game.player(id(2)).unwrap().is_kill_protected());

        let divined = game.perform_night_action(id(2), Some(id(3)), &mut rng).unwrap();
        assert_eq!(
            divined,
            Some(NightReport::Divined {
                target: id(3),
                revealed: Faction::Werewolf
            })
        );

        // No execution yet, so the medium learns nothing
        assert_eq!(game.perform_night_action(id(4), None, &mut rng).unwrap(), None);
        // Roles without an ability ignore the call
        assert_eq!(game.perform_night_action(id(3), Some(id(1)), &mut rng).unwrap(), None);
    }

    #[test]
    fn test_role_list_must_cover_every_player() {
        let players = (1..=3)
            .map(|n| Player::new(id(n), format!("p{}", n)))
            .collect();
        let mut game = Game::new(GameId::new(), id(1), players, Vec::new());

        let result = game.assign_roles(vec![Role::Werewolf, Role::Villager]);
        assert_eq!(result, Err(GameError::RoleCountMismatch { roles: 2, players: 3 }));
        assert!(game.players().iter().all(|p| p.role().is_none()));
        assert!(game.assigned_roles().is_empty());
    }

    #[test]
    fn test_protected_target_survives_attack() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Hunter, Role::Villager]);
        let mut rng = StdRng::seed_from_u64(1);

        game.protect(id(2), id(3)).unwrap();
        assert!(!game.attack(id(3), &mut rng).unwrap());

        let target = game.player(id(3)).unwrap();
        assert!(target.is_alive());
        assert_eq!(target.status(), PlayerStatus::Alive);
        assert!(matches!(game.events().last(), Some(DomainEvent::AttackBlocked { .. })));
    }

    #[test]
    fn test_divining_fox_curses_it() {
        let mut game = game_with_roles(&[Role::Seer, Role::Fox, Role::Werewolf, Role::Villager]);
        let mut rng = StdRng::seed_from_u64(1);

        let revealed = game.fortune_check(id(1), id(2), &mut rng).unwrap();
        assert_eq!(revealed, Faction::Villager);

        let fox = game.player(id(2)).unwrap();
        assert!(!fox.is_alive());
        assert_eq!(fox.status(), PlayerStatus::Cursed);
    }

    #[test]
    fn test_divining_werewolf_reveals_werewolf() {
        let mut game = game_with_roles(&[Role::Seer, Role::Werewolf, Role::Madmate]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(game.fortune_check(id(1), id(2), &mut rng).unwrap(), Faction::Werewolf);
        assert_eq!(game.fortune_check(id(1), id(3), &mut rng).unwrap(), Faction::Villager);
        assert!(game.player(id(2)).unwrap().is_alive());
    }

    #[test]
    fn test_executing_nekomata_takes_another_player() {
        let mut game = game_with_roles(&[
            Role::Nekomata,
            Role::Werewolf,
            Role::Villager,
            Role::Villager,
        ]);
        let mut rng = StdRng::seed_from_u64(7);

        game.execute(id(1), &mut rng).unwrap();

        assert_eq!(game.player(id(1)).unwrap().status(), PlayerStatus::Executed);
        assert_eq!(game.last_executed(), Some(id(1)));
        assert_eq!(game.alive_player_ids().len(), 2);
        let revenged: Vec<&Player> = game
            .players()
            .iter()
            .filter(|p| p.status() == PlayerStatus::Revenged)
            .collect();
        assert_eq!(revenged.len(), 1);
        assert_ne!(revenged[0].id, id(1));
    }

    #[test]
    fn test_black_cat_alone_has_nobody_to_take() {
        let mut game = game_with_roles(&[Role::BlackCat]);
        let mut rng = StdRng::seed_from_u64(7);

        game.execute(id(1), &mut rng).unwrap();
        assert!(game.alive_player_ids().is_empty());
    }

    #[test]
    fn test_executing_teruteru_ends_game() {
        let mut game = game_with_roles(&[
            Role::Teruteru,
            Role::Teruteru,
            Role::Werewolf,
            Role::Villager,
        ]);
        let mut rng = StdRng::seed_from_u64(1);

        game.execute(id(1), &mut rng).unwrap();

        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.faction, Faction::Teruteru);
        assert_eq!(outcome.winners, vec![id(1)]);
        assert_eq!(game.phase(), GamePhase::Finished);
    }

    #[test]
    fn test_first_declared_outcome_stands() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Villager]);
        game.declare_winner(Faction::Teruteru, vec![id(2)]);
        game.declare_winner(Faction::Werewolf, vec![id(1)]);

        assert_eq!(game.outcome().unwrap().faction, Faction::Teruteru);
        game.set_phase(GamePhase::Night);
        assert_eq!(game.phase(), GamePhase::Finished);
    }

    #[test]
    fn test_missing_player_is_reported() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Villager]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(game.attack(id(42), &mut rng), Err(GameError::PlayerNotFound(id(42))));
    }
}
