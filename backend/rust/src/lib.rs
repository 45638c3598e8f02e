//! Procedural maze layouts for the session server.
//!
//! A layout is a perfect maze on a rectangular grid. The server only needs
//! the start cells it yields, one per player slot, ordered from the cell
//! farthest from the exit corner.

mod maze_generator;

pub use maze_generator::{
    generate_start_points, Direction, GeneratorError, GridPoint, Maze, START_POINT_COUNT,
};
