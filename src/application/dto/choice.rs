//! Choice requests - What a player is asked to pick

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::Game;
use crate::domain::entities::Player;
use crate::domain::value_objects::{GameId, PlayerId};

/// Why a player is being asked for a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoicePurpose {
    Divine,
    Guard,
    Attack,
    Execute,
}

impl ChoicePurpose {
    /// Localization key of the prompt shown with the candidates
    pub fn key(&self) -> &'static str {
        match self {
            ChoicePurpose::Divine => "ChooseDivineTarget",
            ChoicePurpose::Guard => "ChooseGuardTarget",
            ChoicePurpose::Attack => "ChooseAttackTarget",
            ChoicePurpose::Execute => "ChooseExecuteTarget",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRequest {
    pub game_id: GameId,
    pub purpose: ChoicePurpose,
    pub candidates: Vec<Candidate>,
    pub allow_skip: bool,
}

impl ChoiceRequest {
    /// Offer every living player that passes `filter`
    pub fn among_alive(
        game: &Game,
        purpose: ChoicePurpose,
        allow_skip: bool,
        filter: impl Fn(&Player) -> bool,
    ) -> Self {
        let candidates = game
            .alive_players()
            .filter(|p| filter(p))
            .map(|p| Candidate {
                id: p.id,
                name: p.name.clone(),
            })
            .collect();
        Self {
            game_id: game.id(),
            purpose,
            candidates,
            allow_skip,
        }
    }

    pub fn candidate_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.candidates.iter().map(|c| c.id)
    }
}
