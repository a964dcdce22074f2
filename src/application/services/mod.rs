//! Application services - Use case implementations
//!
//! The engine composes the night and day phases into the game loop; the
//! lifecycle service keeps one engine per running game and implements the
//! inbound use case on top of them.

pub mod day_phase;
pub mod game_engine;
pub mod lifecycle_service;
pub mod night_phase;
pub mod phase_messenger;

pub use day_phase::DayPhase;
pub use game_engine::GameEngine;
pub use lifecycle_service::GameLifecycleService;
pub use night_phase::NightPhase;
pub use phase_messenger::PhaseMessenger;
