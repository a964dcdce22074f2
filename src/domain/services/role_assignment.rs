//! Role assignment - Turn the requested role counts into one role per player

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::aggregates::Game;
use crate::domain::entities::Role;
use crate::domain::errors::GameError;

/// Resolve `(key, count)` pairs into roles, rejecting unknown keys
pub fn parse_role_counts<S: AsRef<str>>(counts: &[(S, usize)]) -> Result<Vec<(Role, usize)>, GameError> {
    counts
        .iter()
        .map(|(key, count)| Ok((key.as_ref().parse::<Role>()?, *count)))
        .collect()
}

/// Expand the requested multiset to exactly `roster_size` roles and shuffle it.
///
/// Short requests are padded with villagers; oversized requests are cut down
/// to the roster size, dropping the roles listed last.
pub fn build_role_list<R: Rng + ?Sized>(
    requested: &[(Role, usize)],
    roster_size: usize,
    rng: &mut R,
) -> Vec<Role> {
    let requested_total = requested
        .iter()
        .fold(0usize, |total, (_, count)| total.saturating_add(*count));
    if requested_total > roster_size {
        tracing::warn!(
            requested = requested_total,
            roster_size,
            "More roles requested than players, dropping the excess"
        );
    }

    let mut roles: Vec<Role> = requested
        .iter()
        .flat_map(|(role, count)| std::iter::repeat(*role).take(*count))
        .take(roster_size)
        .collect();
    roles.resize(roster_size, Role::Villager);
    roles.shuffle(rng);
    roles
}

/// Deal the game's requested roles to its roster
pub fn assign_roles<R: Rng + ?Sized>(game: &mut Game, rng: &mut R) -> Result<(), GameError> {
    let roles = build_role_list(game.requested_roles(), game.players().len(), rng);
    game.assign_roles(roles)
}
