//! Domain layer - Core game rules with no I/O
//!
//! This layer contains:
//! - Entities: Player and the closed set of roles
//! - Value Objects: ids, factions, statuses, ballots, settings
//! - Aggregates: Game aggregate root
//! - Domain Events: the per-game timeline
//! - Domain Services: role assignment, vote tally, win evaluation

pub mod aggregates;
pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;
