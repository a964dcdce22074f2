//! Domain events - Notifications of significant state changes
//!
//! Every resolution step the engine applies to a game is appended to the
//! game's timeline as a `DomainEvent`. The timeline feeds the end-of-game
//! report and gives operators an audit trail independent of log output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Faction, PlayerId, PlayerStatus};

/// Base data for all events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// Turn counter at the time of the event
    pub turn: u32,
}

impl EventMetadata {
    pub fn at_turn(turn: u32) -> Self {
        Self {
            timestamp: Utc::now(),
            turn,
        }
    }
}

/// All domain events in a game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    // ========================================================================
    // Setup
    // ========================================================================

    /// A role was handed to a player
    RoleAssigned {
        metadata: EventMetadata,
        player_id: PlayerId,
        role: String,
    },

    // ========================================================================
    // Night
    // ========================================================================

    NightStarted { metadata: EventMetadata },

    /// A protector shielded a player for this cycle
    PlayerProtected {
        metadata: EventMetadata,
        protector_id: PlayerId,
        target_id: PlayerId,
    },

    /// A clairvoyant looked at a player
    FortuneChecked {
        metadata: EventMetadata,
        seer_id: PlayerId,
        target_id: PlayerId,
        revealed: Faction,
    },

    /// A medium learned the faction of the last executed player
    MediumRevealed {
        metadata: EventMetadata,
        medium_id: PlayerId,
        target_id: PlayerId,
        revealed: Faction,
    },

    /// The night attack landed
    PlayerKilled {
        metadata: EventMetadata,
        target_id: PlayerId,
    },

    /// The night attack hit a protected player
    AttackBlocked {
        metadata: EventMetadata,
        target_id: PlayerId,
    },

    /// Attackers produced no target
    NoAttack { metadata: EventMetadata },

    NightEnded { metadata: EventMetadata },

    // ========================================================================
    // Day
    // ========================================================================

    PlayerExecuted {
        metadata: EventMetadata,
        target_id: PlayerId,
    },

    NoExecution { metadata: EventMetadata },

    /// A death caused by a role ability rather than a vote or attack
    AbilityDeath {
        metadata: EventMetadata,
        source_id: PlayerId,
        target_id: PlayerId,
        status: PlayerStatus,
    },

    // ========================================================================
    // End
    // ========================================================================

    GameEnded {
        metadata: EventMetadata,
        winning_faction: Faction,
        winners: Vec<PlayerId>,
    },
}

impl DomainEvent {
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            DomainEvent::RoleAssigned { metadata, .. }
            | DomainEvent::NightStarted { metadata }
            | DomainEvent::PlayerProtected { metadata, .. }
            | DomainEvent::FortuneChecked { metadata, .. }
            | DomainEvent::MediumRevealed { metadata, .. }
            | DomainEvent::PlayerKilled { metadata, .. }
            | DomainEvent::AttackBlocked { metadata, .. }
            | DomainEvent::NoAttack { metadata }
            | DomainEvent::NightEnded { metadata }
            | DomainEvent::PlayerExecuted { metadata, .. }
            | DomainEvent::NoExecution { metadata }
            | DomainEvent::AbilityDeath { metadata, .. }
            | DomainEvent::GameEnded { metadata, .. } => metadata,
        }
    }
}
