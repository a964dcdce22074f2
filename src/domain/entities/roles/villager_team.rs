use crate::domain::errors::GameError;
use crate::domain::value_objects::PlayerId;

use super::{take_revenge, HookContext, NightAction, NightReport, RoleBehavior};

/// Ordinary villager, also the padding role for short requests
pub struct Villager;

impl RoleBehavior for Villager {}

/// Clairvoyant: divines one living player each night
pub struct Seer;

impl RoleBehavior for Seer {
    fn night_action(&self) -> Option<NightAction> {
        Some(NightAction::Divine)
    }

    fn on_night_action(
        &self,
        ctx: &mut HookContext<'_>,
        target: Option<PlayerId>,
    ) -> Result<Option<NightReport>, GameError> {
        let Some(target) = target else {
            return Ok(None);
        };
        let revealed = ctx.game.fortune_check(ctx.subject, target, &mut *ctx.rng)?;
        Ok(Some(NightReport::Divined { target, revealed }))
    }
}

/// Protector: shields one living player each night
pub struct Hunter;

impl RoleBehavior for Hunter {
    fn night_action(&self) -> Option<NightAction> {
        Some(NightAction::Guard)
    }

    fn on_night_action(
        &self,
        ctx: &mut HookContext<'_>,
        target: Option<PlayerId>,
    ) -> Result<Option<NightReport>, GameError> {
        let Some(target) = target else {
            return Ok(None);
        };
        ctx.game.protect(ctx.subject, target)?;
        Ok(Some(NightReport::Guarded { target }))
    }
}

/// Mind-reader: learns what the last executed player was
pub struct Medium;

impl RoleBehavior for Medium {
    fn night_action(&self) -> Option<NightAction> {
        Some(NightAction::Medium)
    }

    fn on_night_action(
        &self,
        ctx: &mut HookContext<'_>,
        _target: Option<PlayerId>,
    ) -> Result<Option<NightReport>, GameError> {
        let reading = ctx.game.read_last_executed(ctx.subject)?;
        Ok(reading.map(|(target, revealed)| NightReport::MediumRead { target, revealed }))
    }
}

/// Announces fresh bread every morning while alive
pub struct Bakery;

impl RoleBehavior for Bakery {}

/// Villager that drags a random survivor along when executed
pub struct Nekomata;

impl RoleBehavior for Nekomata {
    fn on_executed(&self, ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        take_revenge(ctx)
    }
}
