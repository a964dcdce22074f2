//! Messaging port - Interface to the chat transport
//!
//! The engine never talks to a chat platform directly. Every notice and every
//! target selection goes through this port so that the transport (a Discord
//! bot, a test harness, the in-process bots) stays outside the core.

use async_trait::async_trait;

use crate::application::dto::{ChoiceRequest, Notice};
use crate::domain::value_objects::{BallotChoice, PlayerId};

/// Delivery failures reported by the transport
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessagingError {
    #[error("Player {0} cannot be reached")]
    Unreachable(PlayerId),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Port for sending notices to players and asking them for a choice
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send a private notice to one player
    async fn send_direct(&self, player: PlayerId, notice: Notice) -> Result<(), MessagingError>;

    /// Send a public notice to the game channel
    async fn send_channel(&self, notice: Notice) -> Result<(), MessagingError>;

    /// Present a list of candidates to a player and wait for their selection.
    ///
    /// May never resolve if the player does not answer; callers impose their
    /// own deadline.
    async fn present_choice(
        &self,
        player: PlayerId,
        request: ChoiceRequest,
    ) -> Result<BallotChoice, MessagingError>;
}
