//! Game engine - The night/day state machine for one game
//!
//! Owns the game aggregate, its random source and its cancellation token.
//! Each `advance_*` call runs exactly one phase; `run` alternates them until
//! the win evaluator declares a result.

use std::sync::Arc;

use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;

use crate::application::dto::{GameReport, Notice};
use crate::application::ports::outbound::MessagingPort;
use crate::application::services::day_phase::DayPhase;
use crate::application::services::night_phase::NightPhase;
use crate::application::services::phase_messenger::PhaseMessenger;
use crate::domain::aggregates::{Game, GamePhase};
use crate::domain::errors::GameError;
use crate::domain::services::{assign_roles, win_evaluator};
use crate::domain::value_objects::GameSettings;

pub struct GameEngine {
    game: Game,
    messenger: Arc<dyn MessagingPort>,
    settings: GameSettings,
    rng: StdRng,
    cancel: CancellationToken,
}

impl GameEngine {
    pub fn new(
        game: Game,
        messenger: Arc<dyn MessagingPort>,
        settings: GameSettings,
        rng: StdRng,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            game,
            messenger,
            settings,
            rng,
            cancel,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Deal roles and tell every player what they got
    pub async fn start(&mut self) -> Result<(), GameError> {
        assign_roles(&mut self.game, &mut self.rng)?;
        tracing::info!(
            game_id = %self.game.id(),
            players = self.game.players().len(),
            "Game started"
        );

        let messenger = self.phase_messenger();
        for player in self.game.players() {
            if let Some(role) = player.role() {
                messenger.direct(player.id, Notice::RoleReveal { role }).await;
            }
        }
        Ok(())
    }

    pub async fn advance_night(&mut self) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::Night)?;

        let messenger = PhaseMessenger::new(&*self.messenger, self.settings.vote_timeout(), &self.cancel);
        NightPhase::new(&mut self.game, &messenger, &mut self.rng).run().await?;

        self.game.set_phase(GamePhase::Day);
        Ok(())
    }

    pub async fn advance_day(&mut self) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::Day)?;

        let messenger = PhaseMessenger::new(&*self.messenger, self.settings.vote_timeout(), &self.cancel);
        DayPhase::new(&mut self.game, &messenger, &mut self.rng).run().await?;

        self.game.set_phase(GamePhase::Night);
        Ok(())
    }

    /// Evaluate win conditions. Returns whether the game is over.
    pub fn check_win(&mut self) -> bool {
        win_evaluator::check_win(&mut self.game)
    }

    /// Announce the winners and every player's final state, then build the report
    pub async fn finalize(&mut self) -> Result<GameReport, GameError> {
        let report = GameReport::from_game(&self.game)?;
        let messenger = self.phase_messenger();

        let winners = report
            .players
            .iter()
            .filter(|p| p.winner)
            .map(|p| p.name.clone())
            .collect();
        messenger
            .channel(Notice::GameOver {
                faction: report.winning_faction,
                winners,
            })
            .await;

        for player in &report.players {
            messenger
                .channel(Notice::FinalResult {
                    player: player.name.clone(),
                    status: player.status,
                    role: player.role,
                })
                .await;
        }

        tracing::info!(
            game_id = %report.game_id,
            faction = %report.winning_faction,
            turns = report.turns,
            "Game finished"
        );
        Ok(report)
    }

    /// Alternate night and day until a faction wins
    pub async fn run(&mut self) -> Result<GameReport, GameError> {
        loop {
            match self.game.phase() {
                GamePhase::Night => self.advance_night().await?,
                GamePhase::Day => self.advance_day().await?,
                GamePhase::Finished => break,
            }
            if self.check_win() {
                break;
            }
        }
        self.finalize().await
    }

    fn ensure_phase(&self, expected: GamePhase) -> Result<(), GameError> {
        if self.cancel.is_cancelled() {
            return Err(GameError::Cancelled);
        }
        let actual = self.game.phase();
        if actual != expected {
            return Err(GameError::InvalidPhase { expected, actual });
        }
        Ok(())
    }

    fn phase_messenger(&self) -> PhaseMessenger<'_> {
        PhaseMessenger::new(&*self.messenger, self.settings.vote_timeout(), &self.cancel)
    }
}
