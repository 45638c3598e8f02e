// types.rs - Shared type definitions for maze instances and players
use serde::{Deserialize, Serialize};
use std::fmt;

pub use maze_generator::{GridPoint, START_POINT_COUNT};

/// Index of a maze instance in the registry, equal to its creation order.
pub type MazeId = usize;

/// Every maze is generated with these dimensions.
pub const MAZE_WIDTH: u32 = 21;
pub const MAZE_HEIGHT: u32 = 21;

/// Entering this grid cell moves the player on to another maze.
pub const EXIT_CELL: GridPoint = GridPoint::new(MAZE_WIDTH as i32 - 1, MAZE_HEIGHT as i32 - 1);

/// World units per grid cell.
const CELL_SIZE: f64 = 3.0;
const GRID_OFFSET: f64 = 30.0;
/// Offset of the cell boundary from the origin when mapping back to the grid.
const CELL_EDGE_OFFSET: f64 = 31.5;

/// Name of the layout asset clients load for a maze.
pub fn maze_asset_name(maze_id: MazeId) -> String {
    format!("maze_{}.glb", maze_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Orientation as reported by the client. three.js objects serialize their
/// components with a leading underscore, so both spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    #[serde(alias = "_x")]
    pub x: f64,
    #[serde(alias = "_y")]
    pub y: f64,
    #[serde(alias = "_z")]
    pub z: f64,
    #[serde(alias = "_w")]
    pub w: f64,
}

/// Animation state of an avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarState {
    #[default]
    Idle,
    WalkForward,
    WalkBackward,
}

/// One of the six fixed occupancy positions of a maze. Clients pick the
/// avatar model by its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Gold,
    Green,
    Pink,
    Red,
    Silver,
    Yellow,
}

impl Slot {
    /// Scan order for slot assignment.
    pub const ALL: [Slot; START_POINT_COUNT] = [
        Slot::Gold,
        Slot::Green,
        Slot::Pink,
        Slot::Red,
        Slot::Silver,
        Slot::Yellow,
    ];

    /// A freshly created maze is always entered through this slot.
    pub const FIRST: Slot = Slot::Gold;

    /// Position in `ALL`, also the index into a maze's start points.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::Gold => "gold",
            Slot::Green => "green",
            Slot::Pink => "pink",
            Slot::Red => "red",
            Slot::Silver => "silver",
            Slot::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A connected client occupying a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub maze_id: MazeId,
    pub maze: String,
    pub slot: Slot,
    pub state: AvatarState,
    pub position: Point3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quaternion: Option<Quaternion>,
}

impl Player {
    /// A player standing idle on the start cell of its slot.
    pub fn spawn(maze_id: MazeId, slot: Slot, start: GridPoint) -> Self {
        Self {
            maze_id,
            maze: maze_asset_name(maze_id),
            slot,
            state: AvatarState::Idle,
            position: grid_to_world(start),
            quaternion: None,
        }
    }
}

/// Centre of a grid cell in world coordinates.
pub fn grid_to_world(cell: GridPoint) -> Point3 {
    Point3 {
        x: cell.x as f64 * CELL_SIZE - GRID_OFFSET,
        y: 0.0,
        z: GRID_OFFSET - cell.y as f64 * CELL_SIZE,
    }
}

/// Grid cell containing a world position.
pub fn world_to_grid(position: &Point3) -> GridPoint {
    GridPoint::new(
        ((CELL_EDGE_OFFSET + position.x) / CELL_SIZE).floor() as i32,
        ((CELL_EDGE_OFFSET - position.z) / CELL_SIZE).floor() as i32,
    )
}

pub fn is_exit(position: &Point3) -> bool {
    world_to_grid(position) == EXIT_CELL
}
