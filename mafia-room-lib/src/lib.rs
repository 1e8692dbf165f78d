//! Data shared by the Room and anything that renders or transports its state.
//!
//! Everything here is a plain, serializable projection: the types in this crate never carry
//! behavior, only the shape a viewer is allowed to see.

use std::sync::Arc;

/// Which special role, if any, a player has been assigned.
///
/// `Unknown` is the value every player starts at before role assignment, and the value a viewer
/// sees for another player whose role they are not allowed to know.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub enum Role {
    Unknown,
    Civilian,
    Mafia,
    Sheriff,
}

impl Role {
    /// Human-readable label used in the canonical role-notification event text.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Unknown => "???",
            Role::Civilian => "Civilian",
            Role::Mafia => "Mafia",
            Role::Sheriff => "Sheriff",
        }
    }
}

/// Life status of a player.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub enum LifeStatus {
    Unknown,
    Alive,
    Dead,
}

/// The Room's top-level phase.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub enum RoomStatus {
    WaitingForPlayers,
    ChatPhase,
    VotePhase,
    NightPhase,
    MafiaWon,
    MafiaLost,
}

impl RoomStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoomStatus::MafiaWon | RoomStatus::MafiaLost)
    }
}

/// Immutable rules a Room is configured with at construction.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct GameRules {
    pub active_players_number: u32,
    pub mafia_number: u32,
    pub sheriff_number: u32,
}

/// Per-viewer projection of a single player.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct PlayerView {
    pub username: Arc<str>,
    pub role: Role,
    pub status: LifeStatus,
    pub color: Arc<str>,
    pub exposed: bool,
}

/// A single chat line, as it appears in the raw day-phase chat buffer.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct ChatMessageView {
    pub author: Arc<str>,
    pub text: Arc<str>,
}

/// Per-viewer projection of a Voting tally, in construction order.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct VotingView {
    pub votes: Vec<(Arc<str>, u32)>,
}

/// A single entry of the event log, as visible to one viewer.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct EventView {
    pub index: u64,
    pub message: Arc<str>,
}

/// Full per-viewer projection of a Room, suitable for sending over a transport.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct RoomView {
    pub room_id: Arc<str>,
    pub status: RoomStatus,
    pub rules: GameRules,
    pub day_number: u32,
    pub players: Vec<PlayerView>,
    pub chat: Option<Vec<ChatMessageView>>,
    pub voting: Option<VotingView>,
    pub events: Vec<EventView>,
}
