// maze_instance.rs - A live maze: six slots and the players in them

use crate::error_handling::Result;
use crate::protocol::{RosterSnapshot, ServerMessage};
use crate::record_store::MazeRecord;
use crate::transport::Transport;
use crate::types::{maze_asset_name, GridPoint, MazeId, Player, Slot, START_POINT_COUNT};

#[derive(Debug, Clone)]
pub struct MazeInstance {
    maze_id: MazeId,
    start_points: [GridPoint; START_POINT_COUNT],
    // Indexed by Slot::index
    roster: [Option<Player>; START_POINT_COUNT],
}

impl MazeInstance {
    pub fn new(maze_id: MazeId, start_points: [GridPoint; START_POINT_COUNT]) -> Self {
        Self {
            maze_id,
            start_points,
            roster: Default::default(),
        }
    }

    pub fn from_record(record: &MazeRecord) -> Self {
        Self::new(record.maze_id, record.start_points)
    }

    pub fn id(&self) -> MazeId {
        self.maze_id
    }

    pub fn asset_name(&self) -> String {
        maze_asset_name(self.maze_id)
    }

    pub fn start_point(&self, slot: Slot) -> GridPoint {
        self.start_points[slot.index()]
    }

    /// Seat `player` in `slot`. The caller has checked the slot is free.
    pub fn add(&mut self, slot: Slot, player: Player) {
        debug_assert!(
            self.roster[slot.index()].is_none(),
            "slot {} of maze {} is taken",
            slot,
            self.maze_id
        );
        self.roster[slot.index()] = Some(player);
    }

    /// Empty `slot`, returning whoever was in it.
    pub fn remove(&mut self, slot: Slot) -> Option<Player> {
        self.roster[slot.index()].take()
    }

    pub fn player(&self, slot: Slot) -> Option<&Player> {
        self.roster[slot.index()].as_ref()
    }

    pub fn player_mut(&mut self, slot: Slot) -> Option<&mut Player> {
        self.roster[slot.index()].as_mut()
    }

    pub fn first_free_slot(&self) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| self.roster[slot.index()].is_none())
    }

    pub fn occupancy(&self) -> usize {
        self.roster.iter().filter(|p| p.is_some()).count()
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot(
            Slot::ALL
                .into_iter()
                .map(|slot| (slot, self.roster[slot.index()].clone()))
                .collect(),
        )
    }

    /// Push the full roster to everyone in this maze's group.
    pub fn broadcast(&self, transport: &Transport) -> Result<usize> {
        let text = ServerMessage::Roster {
            roster: self.snapshot(),
        }
        .to_text()?;
        let delivered = transport.send_to_group(self.maze_id, &text, None);
        log::debug!(
            "Roster of maze {} ({} players) sent to {} connections",
            self.maze_id,
            self.occupancy(),
            delivered
        );
        Ok(delivered)
    }
}
