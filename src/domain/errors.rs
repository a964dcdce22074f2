//! Error types for game operations

use crate::domain::aggregates::GamePhase;
use crate::domain::value_objects::{GameId, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    // Configuration: fatal to the creation attempt only
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Not enough players: {actual} joined, at least {required} required")]
    NotEnoughPlayers { required: usize, actual: usize },

    #[error("Too many players: {actual} joined, at most {allowed} allowed")]
    TooManyPlayers { allowed: usize, actual: usize },

    #[error("Player {0} appears more than once in the roster")]
    DuplicatePlayer(PlayerId),

    #[error("Roles have already been assigned")]
    RolesAlreadyAssigned,

    #[error("Got {roles} roles for {players} players")]
    RoleCountMismatch { roles: usize, players: usize },

    // Internal invariant failure
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    // Lifecycle
    #[error("Invalid phase: expected {expected:?}, game is in {actual:?}")]
    InvalidPhase {
        expected: GamePhase,
        actual: GamePhase,
    },

    #[error("Game {0} has not finished yet")]
    GameNotFinished(GameId),

    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error("Game was cancelled")]
    Cancelled,
}
