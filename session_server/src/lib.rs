// lib.rs - Library exports for maze-session-server
// Shared maze instances, slot assignment and state relay for multiplayer maze clients

pub mod coordinator;
pub mod error_handling;
pub mod http_server;
pub mod maze_instance;
pub mod protocol;
pub mod record_store;
pub mod registry;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use coordinator::{Coordinator, MazeSummary, Session, SessionState, Stats};
pub use error_handling::{CoordinatorError, StoreError};
pub use http_server::{start_server, ServerConfig};
pub use registry::{LayoutGenerator, MazeGenerator, MazeRegistry};
pub use types::{MazeId, Player, Slot};
