//! Data Transfer Objects - What crosses the port boundaries
//!
//! Notices and choice requests flow out to the messaging collaborator; the
//! report flows back to the orchestrator once a game is over.

mod choice;
mod notice;
mod report;

pub use choice::{Candidate, ChoicePurpose, ChoiceRequest};
pub use notice::Notice;
pub use report::{GameReport, PlayerReport, RosterEntry};
