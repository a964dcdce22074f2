//! Game lifecycle service - Keyed registry of running games
//!
//! The orchestrator addresses games by `GameId`; this service owns one engine
//! per id and removes it again once the game is finalized or aborted. Each
//! engine sits behind its own mutex so phases of different games run
//! independently, while the cancellation token is kept outside the mutex so
//! that an abort can reach a game whose phase is still in flight.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::application::dto::{GameReport, RosterEntry};
use crate::application::ports::inbound::GameLifecycleUseCase;
use crate::application::ports::outbound::MessagingPort;
use crate::application::services::game_engine::GameEngine;
use crate::domain::aggregates::Game;
use crate::domain::entities::Player;
use crate::domain::errors::GameError;
use crate::domain::services::parse_role_counts;
use crate::domain::value_objects::{GameId, GameSettings, PlayerId};

struct ManagedGame {
    engine: Arc<Mutex<GameEngine>>,
    cancel: CancellationToken,
}

pub struct GameLifecycleService {
    games: RwLock<HashMap<GameId, ManagedGame>>,
    messenger: Arc<dyn MessagingPort>,
    settings: GameSettings,
    /// Fixed seed for every game's random source, for reproducible runs
    seed: Option<u64>,
}

impl GameLifecycleService {
    pub fn new(messenger: Arc<dyn MessagingPort>, settings: GameSettings) -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
            messenger,
            settings,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub async fn active_games(&self) -> Vec<GameId> {
        self.games.read().await.keys().copied().collect()
    }

    fn validate_roster(&self, roster: &[RosterEntry], host_id: PlayerId) -> Result<(), GameError> {
        if roster.len() < self.settings.min_players {
            return Err(GameError::NotEnoughPlayers {
                required: self.settings.min_players,
                actual: roster.len(),
            });
        }
        if roster.len() > self.settings.max_players {
            return Err(GameError::TooManyPlayers {
                allowed: self.settings.max_players,
                actual: roster.len(),
            });
        }

        let mut seen = HashSet::new();
        for entry in roster {
            if !seen.insert(entry.id) {
                return Err(GameError::DuplicatePlayer(entry.id));
            }
        }
        if !seen.contains(&host_id) {
            return Err(GameError::PlayerNotFound(host_id));
        }
        Ok(())
    }

    fn new_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    async fn engine(&self, game_id: GameId) -> Result<Arc<Mutex<GameEngine>>, GameError> {
        self.games
            .read()
            .await
            .get(&game_id)
            .map(|managed| managed.engine.clone())
            .ok_or(GameError::GameNotFound(game_id))
    }

    async fn remove(&self, game_id: GameId) -> Option<ManagedGame> {
        self.games.write().await.remove(&game_id)
    }
}

#[async_trait]
impl GameLifecycleUseCase for GameLifecycleService {
    async fn start_game(
        &self,
        roster: Vec<RosterEntry>,
        host_id: PlayerId,
        role_counts: Vec<(String, usize)>,
    ) -> Result<GameId, GameError> {
        self.validate_roster(&roster, host_id)?;
        let requested = parse_role_counts(&role_counts)?;

        // The host always takes the first seat
        let (host, others): (Vec<RosterEntry>, Vec<RosterEntry>) =
            roster.into_iter().partition(|entry| entry.id == host_id);
        let players = host
            .into_iter()
            .chain(others)
            .map(|entry| Player::new(entry.id, entry.name))
            .collect();

        let game_id = GameId::new();
        let game = Game::new(game_id, host_id, players, requested);
        let cancel = CancellationToken::new();
        let mut engine = GameEngine::new(
            game,
            self.messenger.clone(),
            self.settings.clone(),
            self.new_rng(),
            cancel.clone(),
        );
        engine.start().await?;

        self.games.write().await.insert(
            game_id,
            ManagedGame {
                engine: Arc::new(Mutex::new(engine)),
                cancel,
            },
        );
        tracing::info!(game_id = %game_id, host_id = %host_id, "Game registered");
        Ok(game_id)
    }

    async fn advance_night(&self, game_id: GameId) -> Result<(), GameError> {
        let engine = self.engine(game_id).await?;
        let mut engine = engine.lock().await;
        engine.advance_night().await
    }

    async fn advance_day(&self, game_id: GameId) -> Result<(), GameError> {
        let engine = self.engine(game_id).await?;
        let mut engine = engine.lock().await;
        engine.advance_day().await
    }

    async fn check_win(&self, game_id: GameId) -> Result<bool, GameError> {
        let engine = self.engine(game_id).await?;
        let mut engine = engine.lock().await;
        Ok(engine.check_win())
    }

    async fn finalize(&self, game_id: GameId) -> Result<GameReport, GameError> {
        let engine = self.engine(game_id).await?;
        let report = engine.lock().await.finalize().await?;
        self.remove(game_id).await;
        Ok(report)
    }

    async fn abort(&self, game_id: GameId) -> Result<(), GameError> {
        let managed = self
            .remove(game_id)
            .await
            .ok_or(GameError::GameNotFound(game_id))?;
        managed.cancel.cancel();
        tracing::info!(game_id = %game_id, "Game aborted");
        Ok(())
    }

    async fn run_to_completion(&self, game_id: GameId) -> Result<GameReport, GameError> {
        let engine = self.engine(game_id).await?;
        let report = engine.lock().await.run().await?;
        self.remove(game_id).await;
        Ok(report)
    }
}
