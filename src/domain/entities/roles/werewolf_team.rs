use crate::domain::errors::GameError;

use super::{take_revenge, HookContext, RoleBehavior};

/// The attacker. Its night behavior is the collective kill vote, which the
/// night phase runs for all werewolves together.
pub struct Werewolf;

impl RoleBehavior for Werewolf {}

/// Human sympathizer of the werewolves
pub struct Madmate;

impl RoleBehavior for Madmate {}

/// Sympathizer that takes a random survivor down when executed
pub struct BlackCat;

impl RoleBehavior for BlackCat {
    fn on_executed(&self, ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        take_revenge(ctx)
    }
}
