//! End-of-game report and roster DTOs

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::Game;
use crate::domain::entities::Role;
use crate::domain::errors::GameError;
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{Faction, GameId, PlayerId, PlayerStatus};

/// One recruited participant, as handed over by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub name: String,
}

impl RosterEntry {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerReport {
    pub id: PlayerId,
    pub name: String,
    pub status: PlayerStatus,
    pub role: Option<Role>,
    pub winner: bool,
}

/// Final state of a finished game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReport {
    pub game_id: GameId,
    /// Completed nights
    pub turns: u32,
    pub winning_faction: Faction,
    pub winners: Vec<PlayerId>,
    pub players: Vec<PlayerReport>,
    pub events: Vec<DomainEvent>,
}

impl GameReport {
    pub fn from_game(game: &Game) -> Result<Self, GameError> {
        let outcome = game.outcome().ok_or(GameError::GameNotFinished(game.id()))?;

        let players = game
            .players()
            .iter()
            .map(|p| PlayerReport {
                id: p.id,
                name: p.name.clone(),
                status: p.status(),
                role: p.role(),
                winner: outcome.winners.contains(&p.id),
            })
            .collect();

        Ok(Self {
            game_id: game.id(),
            turns: game.turn(),
            winning_faction: outcome.faction,
            winners: outcome.winners.clone(),
            players,
            events: game.events().to_vec(),
        })
    }
}
