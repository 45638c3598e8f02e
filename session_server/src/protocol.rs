//! Wire messages exchanged with clients.
//!
//! Every frame is a JSON object tagged by `"type"`. State updates are
//! relayed to peers as the exact text the sender wrote, so only the fields
//! the coordinator reads are modelled here.

use crate::types::{AvatarState, MazeId, Player, Point3, Quaternion, Slot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    Observer,
}

/// Client → coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for a slot (players) or for a maze to watch (observers).
    Join {
        role: Role,
        #[serde(default)]
        maze_id: Option<MazeId>,
    },
    StateUpdate(StateUpdate),
    /// Observers only: switch to watching another maze.
    View { maze_id: MazeId },
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub maze_id: MazeId,
    pub slot: Slot,
    pub state: AvatarState,
    pub position: Point3,
    #[serde(default)]
    pub quaternion: Option<Quaternion>,
}

/// Sent to a player each time it is placed in a maze.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub maze_id: MazeId,
    pub maze: String,
    pub slot: Slot,
    pub state: AvatarState,
    pub position: Point3,
}

impl From<&Player> for Identity {
    fn from(player: &Player) -> Self {
        Self {
            maze_id: player.maze_id,
            maze: player.maze.clone(),
            slot: player.slot,
            state: player.state,
            position: player.position,
        }
    }
}

/// Every slot label of a maze with its occupant, or null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RosterSnapshot(pub BTreeMap<Slot, Option<Player>>);

impl RosterSnapshot {
    pub fn get(&self, slot: Slot) -> Option<&Player> {
        self.0.get(&slot).and_then(Option::as_ref)
    }
}

/// Coordinator → client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Observers learn how many mazes they can pick from.
    InstanceCount { count: usize },
    Identity(Identity),
    /// Observers learn which maze they are now watching.
    Viewing { maze_id: MazeId, maze: String },
    Roster { roster: RosterSnapshot },
}

impl ServerMessage {
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
