//! The ordered list of maze instances and the slot assignment algorithm.
//!
//! Instances are only ever appended; a maze's id is its index. The registry
//! is the single owner of the list and is always used under the
//! coordinator's lock.

use crate::error_handling::{CoordinatorError, Result};
use crate::maze_instance::MazeInstance;
use crate::record_store::{MazeRecord, RecordStore};
use crate::types::{
    maze_asset_name, GridPoint, MazeId, Player, Slot, MAZE_HEIGHT, MAZE_WIDTH, START_POINT_COUNT,
};
use maze_generator::GeneratorError;

/// Produces the start points of a new layout.
pub trait MazeGenerator: Send + Sync {
    fn generate(
        &self,
        asset_name: &str,
        width: u32,
        height: u32,
    ) -> std::result::Result<[GridPoint; START_POINT_COUNT], GeneratorError>;
}

/// Randomized layouts from the `maze_generator` crate.
pub struct LayoutGenerator;

impl MazeGenerator for LayoutGenerator {
    fn generate(
        &self,
        asset_name: &str,
        width: u32,
        height: u32,
    ) -> std::result::Result<[GridPoint; START_POINT_COUNT], GeneratorError> {
        log::debug!("Generating {}x{} layout for {}", width, height, asset_name);
        maze_generator::generate_start_points(width, height, &mut rand::rng())
    }
}

pub struct MazeRegistry {
    instances: Vec<MazeInstance>,
    generator: Box<dyn MazeGenerator>,
    store: RecordStore,
}

impl MazeRegistry {
    /// Rebuild instances from stored records. Records are registered in
    /// file order so ids stay dense.
    pub fn from_records(
        records: &[MazeRecord],
        generator: Box<dyn MazeGenerator>,
        store: RecordStore,
    ) -> Self {
        let instances = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                if record.maze_id != index {
                    log::warn!(
                        "Record for maze {} is stored at position {}, registering it as maze {}",
                        record.maze_id,
                        index,
                        index
                    );
                }
                MazeInstance::new(index, record.start_points)
            })
            .collect();

        Self {
            instances,
            generator,
            store,
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instance(&self, maze_id: MazeId) -> Result<&MazeInstance> {
        self.instances
            .get(maze_id)
            .ok_or(CoordinatorError::UnknownMaze { maze_id })
    }

    pub fn instance_mut(&mut self, maze_id: MazeId) -> Result<&mut MazeInstance> {
        self.instances
            .get_mut(maze_id)
            .ok_or(CoordinatorError::UnknownMaze { maze_id })
    }

    pub fn instances(&self) -> impl Iterator<Item = &MazeInstance> {
        self.instances.iter()
    }

    pub fn player_count(&self) -> usize {
        self.instances.iter().map(MazeInstance::occupancy).sum()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Seat a new player in the first free slot of the lowest maze.
    pub fn find_and_join(&mut self) -> Option<Player> {
        self.find_and_join_from(0)
    }

    /// Like `find_and_join`, but mazes below `start_index` are not considered.
    pub fn find_and_join_from(&mut self, start_index: usize) -> Option<Player> {
        self.instances
            .iter_mut()
            .skip(start_index)
            .find_map(|instance| {
                let slot = instance.first_free_slot()?;
                Some(seat(instance, slot))
            })
    }

    /// Generate, persist and register a new maze. Nothing is registered or
    /// persisted if generation fails.
    pub fn create_new(&mut self) -> Result<MazeId> {
        let maze_id = self.instances.len();
        let asset_name = maze_asset_name(maze_id);
        let start_points = self
            .generator
            .generate(&asset_name, MAZE_WIDTH, MAZE_HEIGHT)?;

        let record = MazeRecord {
            maze_id,
            start_points,
        };
        self.instances.push(MazeInstance::from_record(&record));
        // Not awaited: the player is admitted before the file is written.
        drop(self.store.append(record));

        log::info!("Created maze {} ({})", maze_id, asset_name);
        Ok(maze_id)
    }

    /// Find a slot at or after `start_index`, creating one new maze if every
    /// candidate is full. A new maze is always entered through its first slot.
    pub fn assign(&mut self, start_index: usize) -> Result<Player> {
        if let Some(player) = self.find_and_join_from(start_index) {
            return Ok(player);
        }
        let maze_id = self.create_new()?;
        let instance = self.instance_mut(maze_id)?;
        Ok(seat(instance, Slot::FIRST))
    }
}

fn seat(instance: &mut MazeInstance, slot: Slot) -> Player {
    let player = Player::spawn(instance.id(), slot, instance.start_point(slot));
    instance.add(slot, player.clone());
    player
}
