use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Number of start cells handed out per maze, one per player slot.
pub const START_POINT_COUNT: usize = 6;

/// A cell on the maze grid. `x` grows east, `y` grows south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("a {width}x{height} maze has fewer than {required} cells")]
    TooSmall {
        width: u32,
        height: u32,
        required: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    West,
    East,
    North,
    South,
}

impl Direction {
    /// Neighbour expansion order used by the distance search.
    pub const ALL: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];
}

// --------------------------------------------
// Walls and regions
// --------------------------------------------

/// An interior wall. `Vertical` separates (x, y) from (x + 1, y),
/// `Horizontal` separates (x, y) from (x, y + 1).
#[derive(Debug, Clone, Copy)]
enum Wall {
    Vertical { x: u32, y: u32 },
    Horizontal { x: u32, y: u32 },
}

impl Wall {
    fn cells(self, width: u32) -> (usize, usize) {
        let w = width as usize;
        match self {
            Wall::Vertical { x, y } => {
                let a = x as usize + y as usize * w;
                (a, a + 1)
            }
            Wall::Horizontal { x, y } => {
                let a = x as usize + y as usize * w;
                (a, a + w)
            }
        }
    }
}

/// Disjoint sets of connected cells.
struct Regions {
    parent: Vec<usize>,
}

impl Regions {
    fn new(count: usize) -> Self {
        Regions {
            parent: (0..count).collect(),
        }
    }

    fn find(&mut self, mut id: usize) -> usize {
        while self.parent[id] != id {
            self.parent[id] = self.parent[self.parent[id]];
            id = self.parent[id];
        }
        id
    }

    /// Merge the regions of `a` and `b`. Returns false if they were already one.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[high] = low;
        true
    }
}

// --------------------------------------------
// Maze
// --------------------------------------------

/// A perfect maze: exactly one path between any two cells.
#[derive(Debug, Clone)]
pub struct Maze {
    width: u32,
    height: u32,
    // x_walls[x + y * (width - 1)] closes (x, y) -> (x + 1, y)
    x_walls: Vec<bool>,
    // y_walls[x + y * width] closes (x, y) -> (x, y + 1)
    y_walls: Vec<bool>,
}

impl Maze {
    /// Carve a maze with randomized Kruskal: every wall starts closed and
    /// walls are visited in random order, opening each one that joins two
    /// still separate regions.
    pub fn generate<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Self {
        let w = width as usize;
        let h = height as usize;
        let mut maze = Maze {
            width,
            height,
            x_walls: vec![true; w.saturating_sub(1) * h],
            y_walls: vec![true; w * h.saturating_sub(1)],
        };

        let mut walls = Vec::with_capacity(maze.x_walls.len() + maze.y_walls.len());
        for y in 0..height {
            for x in 0..width.saturating_sub(1) {
                walls.push(Wall::Vertical { x, y });
            }
        }
        for y in 0..height.saturating_sub(1) {
            for x in 0..width {
                walls.push(Wall::Horizontal { x, y });
            }
        }
        walls.shuffle(rng);

        let mut regions = Regions::new(w * h);
        for wall in walls {
            let (a, b) = wall.cells(width);
            if regions.union(a, b) {
                maze.open(wall);
            }
        }

        maze
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The cell every start point is measured against: the south-east corner.
    pub fn exit(&self) -> GridPoint {
        GridPoint::new(self.width as i32 - 1, self.height as i32 - 1)
    }

    fn open(&mut self, wall: Wall) {
        match wall {
            Wall::Vertical { x, y } => {
                let idx = x as usize + y as usize * (self.width as usize - 1);
                self.x_walls[idx] = false;
            }
            Wall::Horizontal { x, y } => {
                let idx = x as usize + y as usize * self.width as usize;
                self.y_walls[idx] = false;
            }
        }
    }

    pub fn contains(&self, cell: GridPoint) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Whether a passage leads from `cell` in `direction`.
    pub fn is_open(&self, cell: GridPoint, direction: Direction) -> bool {
        if !self.contains(cell) {
            return false;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        let w = self.width as usize;
        let h = self.height as usize;
        match direction {
            Direction::West => x > 0 && !self.x_walls[x - 1 + y * (w - 1)],
            Direction::East => x + 1 < w && !self.x_walls[x + y * (w - 1)],
            Direction::North => y > 0 && !self.y_walls[x + (y - 1) * w],
            Direction::South => y + 1 < h && !self.y_walls[x + y * w],
        }
    }

    pub fn neighbor(&self, cell: GridPoint, direction: Direction) -> Option<GridPoint> {
        if !self.is_open(cell, direction) {
            return None;
        }
        let next = match direction {
            Direction::West => GridPoint::new(cell.x - 1, cell.y),
            Direction::East => GridPoint::new(cell.x + 1, cell.y),
            Direction::North => GridPoint::new(cell.x, cell.y - 1),
            Direction::South => GridPoint::new(cell.x, cell.y + 1),
        };
        Some(next)
    }

    /// Number of opened walls. A perfect maze has `width * height - 1`.
    pub fn passage_count(&self) -> usize {
        self.x_walls.iter().chain(self.y_walls.iter()).filter(|closed| !**closed).count()
    }

    /// Cells grouped by their step distance to the exit, nearest first.
    /// Within a group cells keep breadth-first discovery order.
    pub fn distance_classes(&self) -> Vec<Vec<GridPoint>> {
        let mut classes: Vec<Vec<GridPoint>> = Vec::new();
        if self.width == 0 || self.height == 0 {
            return classes;
        }

        let w = self.width as usize;
        let index = |cell: GridPoint| cell.x as usize + cell.y as usize * w;
        let mut seen = vec![false; w * self.height as usize];

        let exit = self.exit();
        seen[index(exit)] = true;
        let mut queue = VecDeque::from([(exit, 0usize)]);

        while let Some((cell, steps)) = queue.pop_front() {
            if classes.len() <= steps {
                classes.resize_with(steps + 1, Vec::new);
            }
            classes[steps].push(cell);

            for direction in Direction::ALL {
                if let Some(next) = self.neighbor(cell, direction) {
                    let idx = index(next);
                    if !seen[idx] {
                        seen[idx] = true;
                        queue.push_back((next, steps + 1));
                    }
                }
            }
        }

        classes
    }

    /// The `count` cells farthest (by walking distance) from the exit,
    /// farthest first.
    pub fn farthest_cells(&self, count: usize) -> Vec<GridPoint> {
        self.distance_classes()
            .into_iter()
            .rev()
            .flatten()
            .take(count)
            .collect()
    }
}

/// Generate a fresh layout and return its start points, one per slot.
pub fn generate_start_points<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    rng: &mut R,
) -> Result<[GridPoint; START_POINT_COUNT], GeneratorError> {
    let too_small = GeneratorError::TooSmall {
        width,
        height,
        required: START_POINT_COUNT,
    };
    if (width as usize) * (height as usize) < START_POINT_COUNT {
        return Err(too_small);
    }

    let maze = Maze::generate(width, height, rng);
    maze.farthest_cells(START_POINT_COUNT)
        .try_into()
        .map_err(|_| too_small)
}
