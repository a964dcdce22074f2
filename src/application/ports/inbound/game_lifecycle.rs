//! Game lifecycle use case - What an orchestrator can do with a game
//!
//! A chat-command front end drives the loop through this trait: it creates a
//! game once recruitment closes, advances night and day, checks for a winner
//! after each phase and collects the report at the end.

use async_trait::async_trait;

use crate::application::dto::{GameReport, RosterEntry};
use crate::domain::errors::GameError;
use crate::domain::value_objects::{GameId, PlayerId};

#[async_trait]
pub trait GameLifecycleUseCase: Send + Sync {
    /// Create a game, deal roles and tell every player their role
    async fn start_game(
        &self,
        roster: Vec<RosterEntry>,
        host_id: PlayerId,
        role_counts: Vec<(String, usize)>,
    ) -> Result<GameId, GameError>;

    /// Run one night. The game must be in the night phase.
    async fn advance_night(&self, game_id: GameId) -> Result<(), GameError>;

    /// Run one day. The game must be in the day phase.
    async fn advance_day(&self, game_id: GameId) -> Result<(), GameError>;

    /// Evaluate win conditions, returning whether the game is over
    async fn check_win(&self, game_id: GameId) -> Result<bool, GameError>;

    /// Announce the result and tear the game down
    async fn finalize(&self, game_id: GameId) -> Result<GameReport, GameError>;

    /// Cancel a game mid-phase and tear it down without a result
    async fn abort(&self, game_id: GameId) -> Result<(), GameError>;

    /// Alternate night and day until a faction wins, then finalize
    async fn run_to_completion(&self, game_id: GameId) -> Result<GameReport, GameError>;
}
