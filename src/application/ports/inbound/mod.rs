//! Inbound ports - Interfaces that the application exposes to the outside world

mod game_lifecycle;

pub use game_lifecycle::GameLifecycleUseCase;
