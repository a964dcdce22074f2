use crate::domain::errors::GameError;
use crate::domain::value_objects::{Faction, PlayerStatus};

use super::{HookContext, RoleBehavior};

/// Immune to the night attack, but dies when divined. Wins if alive when
/// either main faction would.
pub struct Fox;

impl RoleBehavior for Fox {
    fn on_fortune_checked(&self, ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        let source = ctx.actor.unwrap_or(ctx.subject);
        ctx.game.ability_kill(source, ctx.subject, PlayerStatus::Cursed)
    }
}

/// Wins alone by getting executed
pub struct Teruteru;

impl RoleBehavior for Teruteru {
    fn on_executed(&self, ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        ctx.game.declare_winner(Faction::Teruteru, vec![ctx.subject]);
        Ok(())
    }
}
