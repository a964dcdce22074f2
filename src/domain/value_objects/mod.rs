//! Value objects - Immutable objects defined by their attributes

mod ballot;
mod faction;
mod ids;
mod settings;

pub use ballot::{BallotBox, BallotChoice, BallotError};
pub use faction::{Faction, PlayerStatus};
pub use ids::*;
pub use settings::GameSettings;
