//! Werewolf Engine - Rule engine for a werewolf social-deduction game
//!
//! The engine:
//! - Deals hidden roles to a recruited roster
//! - Runs night abilities and the werewolf attack
//! - Runs the day execution vote
//! - Decides when a faction has won

pub mod application;
pub mod domain;
pub mod infrastructure;
