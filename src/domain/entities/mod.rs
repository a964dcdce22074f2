//! Domain entities - Core business objects with identity

mod player;
mod roles;

pub use player::Player;
pub use roles::{HookContext, NightAction, NightReport, Role, RoleBehavior};
