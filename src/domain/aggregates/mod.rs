//! Aggregates - Cluster of domain objects treated as a single unit

pub mod game;

pub use game::{Game, GameOutcome, GamePhase};
