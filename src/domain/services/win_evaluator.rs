//! Win evaluation - Decide whether the game is over after a phase
//!
//! Checks run in a fixed order: attacking majority, then attackers wiped out,
//! then the trickster override on top of whichever of the two fired. Outcomes
//! declared directly by a role hook are final and never re-evaluated.

use crate::domain::aggregates::{Game, GameOutcome};
use crate::domain::value_objects::{Faction, PlayerId};

/// Work out the outcome the current state implies, without touching the game
pub fn evaluate_win(game: &Game) -> Option<GameOutcome> {
    if let Some(outcome) = game.outcome() {
        return Some(outcome.clone());
    }

    let alive = game.alive_players().count();
    let attackers = game.alive_attackers().count();

    let main_faction = if attackers * 2 >= alive {
        Faction::Werewolf
    } else if attackers == 0 {
        Faction::Villager
    } else {
        return None;
    };

    let trickster_alive = game
        .alive_players()
        .any(|p| p.role().map(|r| r.is_trickster()).unwrap_or(false));
    let faction = if trickster_alive { Faction::Fox } else { main_faction };

    Some(GameOutcome {
        faction,
        winners: faction_members(game, faction),
    })
}

/// Evaluate and record the outcome. Returns whether the game is over.
///
/// Once the game is terminal this is a no-op.
pub fn check_win(game: &mut Game) -> bool {
    if game.is_finished() {
        return true;
    }
    match evaluate_win(game) {
        Some(outcome) => {
            game.declare_winner(outcome.faction, outcome.winners);
            true
        }
        None => false,
    }
}

/// Every roster member whose actual faction is `faction`, dead or alive
fn faction_members(game: &Game, faction: Faction) -> Vec<PlayerId> {
    game.players()
        .iter()
        .filter(|p| p.role().map(|r| r.faction()) == Some(faction))
        .map(|p| p.id)
        .collect()
}
