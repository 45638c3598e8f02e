//! Per-connection session logic on top of the shared maze registry.
//!
//! One `Coordinator` lives for the whole process and is shared by every
//! connection handler. Each event (join, state update, view, disconnect)
//! runs to completion under a single lock that covers the registry and the
//! transport, so checking a slot and taking it can never interleave with
//! another connection.

use crate::error_handling::Result;
use crate::maze_instance::MazeInstance;
use crate::protocol::{ClientMessage, Identity, Role, RosterSnapshot, ServerMessage, StateUpdate};
use crate::record_store::{self, RecordStore};
use crate::registry::{MazeGenerator, MazeRegistry};
use crate::transport::{ConnectionId, Outbox, Transport};
use crate::types::{is_exit, MazeId, Player, Slot};
use serde::Serialize;
use std::path::Path;
use tokio::sync::Mutex;

/// Where a connection stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, no slot yet (also after a failed migration).
    Connecting,
    Assigned { maze_id: MazeId, slot: Slot },
    /// Watching a maze without occupying a slot.
    Observing { maze_id: Option<MazeId> },
}

/// The handler-side view of one connection. Owned by that connection's task.
#[derive(Debug)]
pub struct Session {
    id: ConnectionId,
    state: SessionState,
}

impl Session {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub instances: usize,
    pub players: usize,
    pub connections: usize,
}

/// One line of the maze listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MazeSummary {
    pub maze_id: MazeId,
    pub maze: String,
    pub players: usize,
}

struct Hub {
    registry: MazeRegistry,
    transport: Transport,
}

pub struct Coordinator {
    hub: Mutex<Hub>,
}

impl Coordinator {
    pub fn new(registry: MazeRegistry) -> Self {
        Self {
            hub: Mutex::new(Hub {
                registry,
                transport: Transport::new(),
            }),
        }
    }

    /// Load stored mazes from `records_path` and start its writer.
    pub async fn open(records_path: &Path, generator: Box<dyn MazeGenerator>) -> Self {
        let records = record_store::load(records_path).await;
        let registry = MazeRegistry::from_records(&records, generator, RecordStore::spawn(records_path, records.clone()));
        Self::new(registry)
    }

    pub async fn connect(&self, outbox: Outbox) -> Session {
        let mut hub = self.hub.lock().await;
        let id = hub.transport.register(outbox);
        log::info!("{} connected", id);
        Session {
            id,
            state: SessionState::Connecting,
        }
    }

    /// Parse one inbound frame and act on it. Unreadable frames are dropped.
    pub async fn handle_text(&self, session: &mut Session, text: &str) -> Result<()> {
        let message = match ClientMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                log::debug!("Dropping unreadable frame from {}: {}", session.id, e);
                return Ok(());
            }
        };

        match message {
            ClientMessage::Join { role, maze_id } => self.join(session, role, maze_id).await,
            ClientMessage::StateUpdate(update) => self.state_update(session, text, &update).await,
            ClientMessage::View { maze_id } => self.view(session, maze_id).await,
        }
    }

    pub async fn join(&self, session: &mut Session, role: Role, desired: Option<MazeId>) -> Result<()> {
        if session.state != SessionState::Connecting {
            log::debug!("Ignoring repeated join from {}", session.id);
            return Ok(());
        }

        let mut hub = self.hub.lock().await;
        let Hub { registry, transport } = &mut *hub;

        match role {
            Role::Player => {
                let player = registry.assign(0)?;
                admit(registry, transport, session, player)
            }
            Role::Observer => {
                session.state = SessionState::Observing { maze_id: None };
                let count = ServerMessage::InstanceCount {
                    count: registry.len(),
                }
                .to_text()?;
                transport.send_to(session.id, &count);
                watch(registry, transport, session, desired.unwrap_or(0))
            }
        }
    }

    /// Apply a player's reported state. Updates naming another maze or slot
    /// come from a client that has not caught up yet and are dropped.
    pub async fn state_update(&self, session: &mut Session, raw: &str, update: &StateUpdate) -> Result<()> {
        let SessionState::Assigned { maze_id, slot } = session.state else {
            log::debug!("Dropping state update from unassigned {}", session.id);
            return Ok(());
        };
        if update.maze_id != maze_id || update.slot != slot {
            log::debug!(
                "Dropping stale update from {} for maze {} slot {} (now maze {} slot {})",
                session.id,
                update.maze_id,
                update.slot,
                maze_id,
                slot
            );
            return Ok(());
        }

        let mut hub = self.hub.lock().await;
        let Hub { registry, transport } = &mut *hub;

        if is_exit(&update.position) {
            log::info!("{} reached the exit of maze {}", session.id, maze_id);
            let instance = registry.instance_mut(maze_id)?;
            instance.remove(slot);
            instance.broadcast(transport)?;
            transport.leave(session.id, maze_id);
            session.state = SessionState::Connecting;

            // Mazes at or below the one just left are not back-filled.
            let player = registry.assign(maze_id + 1)?;
            return admit(registry, transport, session, player);
        }

        if let Some(player) = registry.instance_mut(maze_id)?.player_mut(slot) {
            player.state = update.state;
            player.position = update.position;
            if update.quaternion.is_some() {
                player.quaternion = update.quaternion;
            }
        }
        transport.send_to_group(maze_id, raw, Some(session.id));
        Ok(())
    }

    /// Switch an observer to another maze. Out of range ids are clamped.
    pub async fn view(&self, session: &mut Session, maze_id: MazeId) -> Result<()> {
        if !matches!(session.state, SessionState::Observing { .. }) {
            log::debug!("Ignoring view request from non-observer {}", session.id);
            return Ok(());
        }
        let mut hub = self.hub.lock().await;
        let Hub { registry, transport } = &mut *hub;
        watch(registry, transport, session, maze_id)
    }

    /// Release everything the connection holds. Called once its reader has
    /// stopped, so no other event for it can still be running.
    pub async fn disconnect(&self, session: Session) {
        let mut hub = self.hub.lock().await;
        let Hub { registry, transport } = &mut *hub;

        if let SessionState::Assigned { maze_id, slot } = session.state {
            transport.leave(session.id, maze_id);
            match registry.instance_mut(maze_id) {
                Ok(instance) => {
                    instance.remove(slot);
                    if let Err(e) = instance.broadcast(transport) {
                        log::error!("Failed to broadcast roster of maze {}: {}", maze_id, e);
                    }
                }
                Err(e) => log::error!("{} held a slot in a missing maze: {}", session.id, e),
            }
        }

        transport.unregister(session.id);
        log::info!("{} disconnected", session.id);
    }

    pub async fn stats(&self) -> Stats {
        let hub = self.hub.lock().await;
        Stats {
            instances: hub.registry.len(),
            players: hub.registry.player_count(),
            connections: hub.transport.connection_count(),
        }
    }

    pub async fn mazes(&self) -> Vec<MazeSummary> {
        let hub = self.hub.lock().await;
        hub.registry
            .instances()
            .map(|instance| MazeSummary {
                maze_id: instance.id(),
                maze: instance.asset_name(),
                players: instance.occupancy(),
            })
            .collect()
    }

    pub async fn roster(&self, maze_id: MazeId) -> Result<RosterSnapshot> {
        let hub = self.hub.lock().await;
        Ok(hub.registry.instance(maze_id)?.snapshot())
    }

    /// Close every connection and wait for pending record writes.
    pub async fn shutdown(&self) {
        let mut hub = self.hub.lock().await;
        hub.transport.close_all();
        hub.registry.store().flush().await;
        log::info!("Coordinator shut down with {} mazes", hub.registry.len());
    }
}

/// Deliver a freshly seated player's identity and announce it to the maze.
fn admit(
    registry: &MazeRegistry,
    transport: &mut Transport,
    session: &mut Session,
    player: Player,
) -> Result<()> {
    session.state = SessionState::Assigned {
        maze_id: player.maze_id,
        slot: player.slot,
    };
    log::info!("{} joined maze {} as {}", session.id, player.maze_id, player.slot);

    let identity = ServerMessage::Identity(Identity::from(&player)).to_text()?;
    transport.send_to(session.id, &identity);
    transport.join(session.id, player.maze_id);
    registry.instance(player.maze_id)?.broadcast(transport)?;
    Ok(())
}

fn watch(
    registry: &MazeRegistry,
    transport: &mut Transport,
    session: &mut Session,
    maze_id: MazeId,
) -> Result<()> {
    if registry.is_empty() {
        log::debug!("{} has no maze to watch yet", session.id);
        return Ok(());
    }
    let target = maze_id.min(registry.len() - 1);

    if let SessionState::Observing { maze_id: Some(current) } = session.state {
        transport.leave(session.id, current);
    }
    transport.join(session.id, target);
    session.state = SessionState::Observing {
        maze_id: Some(target),
    };

    let instance: &MazeInstance = registry.instance(target)?;
    let viewing = ServerMessage::Viewing {
        maze_id: target,
        maze: instance.asset_name(),
    }
    .to_text()?;
    let roster = ServerMessage::Roster {
        roster: instance.snapshot(),
    }
    .to_text()?;
    transport.send_to(session.id, &viewing);
    transport.send_to(session.id, &roster);
    log::debug!("{} is watching maze {}", session.id, target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::CoordinatorError;
    use crate::record_store::MazeRecord;
    use crate::registry::tests::{FailingGenerator, FixedGenerator, FIXED_POINTS};
    use crate::types::{grid_to_world, EXIT_CELL};
    use serde_json::Value;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    struct Client {
        session: Session,
        rx: mpsc::UnboundedReceiver<String>,
    }

    impl Client {
        async fn connect(coordinator: &Coordinator) -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            let session = coordinator.connect(tx).await;
            Self { session, rx }
        }

        async fn join_as_player(coordinator: &Coordinator) -> Self {
            let mut client = Self::connect(coordinator).await;
            coordinator
                .join(&mut client.session, Role::Player, None)
                .await
                .unwrap();
            client
        }

        fn raw(&mut self) -> Vec<String> {
            let mut frames = Vec::new();
            while let Ok(frame) = self.rx.try_recv() {
                frames.push(frame);
            }
            frames
        }

        fn drain(&mut self) -> Vec<Value> {
            self.raw()
                .iter()
                .map(|f| serde_json::from_str(f).unwrap())
                .collect()
        }

        fn identities(&mut self) -> Vec<Value> {
            self.drain()
                .into_iter()
                .filter(|m| m["type"] == "identity")
                .collect()
        }
    }

    fn update_text(maze_id: MazeId, slot: Slot, x: f64, z: f64) -> String {
        format!(
            r#"{{"type":"state_update","maze_id":{},"slot":"{}","state":"walk_forward","position":{{"x":{},"y":0,"z":{}}},"quaternion":{{"_x":0,"_y":1,"_z":0,"_w":0}}}}"#,
            maze_id, slot, x, z
        )
    }

    fn exit_text(maze_id: MazeId, slot: Slot) -> String {
        let p = grid_to_world(EXIT_CELL);
        update_text(maze_id, slot, p.x, p.z)
    }

    async fn coordinator_with(records: usize) -> (Coordinator, PathBuf, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mazes.json");
        let records: Vec<MazeRecord> = (0..records)
            .map(|maze_id| MazeRecord {
                maze_id,
                start_points: FIXED_POINTS,
            })
            .collect();
        std::fs::write(&path, serde_json::to_vec(&records).unwrap()).unwrap();
        let coordinator = Coordinator::open(&path, Box::new(FixedGenerator::default())).await;
        (coordinator, path, dir)
    }

    #[tokio::test]
    async fn test_six_joins_fill_slots_in_order_then_overflow() {
        let (coordinator, path, _dir) = coordinator_with(1).await;

        let mut clients = Vec::new();
        for slot in Slot::ALL {
            let mut client = Client::join_as_player(&coordinator).await;
            let identity = client.identities().remove(0);
            assert_eq!(identity["maze_id"], 0);
            assert_eq!(identity["slot"], slot.label());
            assert_eq!(identity["state"], "idle");
            clients.push(client);
        }

        let mut seventh = Client::join_as_player(&coordinator).await;
        let identity = seventh.identities().remove(0);
        assert_eq!(identity["maze_id"], 1);
        assert_eq!(identity["slot"], "gold");
        assert_eq!(identity["maze"], "maze_1.glb");

        let stats = coordinator.stats().await;
        assert_eq!(stats, Stats { instances: 2, players: 7, connections: 7 });

        coordinator.shutdown().await;
        let on_disk = record_store::load(&path).await;
        assert_eq!(on_disk.len(), 2);
        assert_eq!(on_disk[1].maze_id, 1);
    }

    #[tokio::test]
    async fn test_join_broadcasts_roster_to_maze() {
        let (coordinator, _path, _dir) = coordinator_with(1).await;
        let mut first = Client::join_as_player(&coordinator).await;
        first.drain();

        let _second = Client::join_as_player(&coordinator).await;
        let frames = first.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "roster");
        assert_eq!(frames[0]["roster"]["green"]["slot"], "green");
        assert_eq!(
            frames[0]["roster"]["green"]["position"]["x"],
            grid_to_world(FIXED_POINTS[1]).x
        );
    }

    #[tokio::test]
    async fn test_relay_skips_sender() {
        let (coordinator, _path, _dir) = coordinator_with(1).await;
        let mut a = Client::join_as_player(&coordinator).await;
        let mut b = Client::join_as_player(&coordinator).await;
        let mut elsewhere = Client::connect(&coordinator).await;
        a.drain();
        b.drain();

        let text = update_text(0, Slot::Gold, 1.25, 2.5);
        coordinator.handle_text(&mut a.session, &text).await.unwrap();

        assert_eq!(b.raw(), vec![text]);
        assert!(a.raw().is_empty());
        assert!(elsewhere.raw().is_empty());

        let hub = coordinator.hub.lock().await;
        let player = hub.registry.instance(0).unwrap().player(Slot::Gold).unwrap().clone();
        assert_eq!(player.position.x, 1.25);
        assert_eq!(player.state, crate::types::AvatarState::WalkForward);
        assert_eq!(player.quaternion.unwrap().y, 1.0);
    }

    #[tokio::test]
    async fn test_stale_updates_are_dropped() {
        let (coordinator, _path, _dir) = coordinator_with(2).await;
        let mut a = Client::join_as_player(&coordinator).await;
        let mut b = Client::join_as_player(&coordinator).await;
        a.drain();
        b.drain();

        // Wrong maze, then wrong slot
        let wrong_maze = update_text(1, Slot::Gold, 5.0, 5.0);
        coordinator.handle_text(&mut a.session, &wrong_maze).await.unwrap();
        let wrong_slot = update_text(0, Slot::Green, 5.0, 5.0);
        coordinator.handle_text(&mut a.session, &wrong_slot).await.unwrap();

        assert!(b.raw().is_empty());
        assert!(a.raw().is_empty());
        let hub = coordinator.hub.lock().await;
        let gold = hub.registry.instance(0).unwrap().player(Slot::Gold).unwrap();
        assert_eq!(gold.position, grid_to_world(FIXED_POINTS[0]));
    }

    #[tokio::test]
    async fn test_exit_migrates_once() {
        let (coordinator, _path, _dir) = coordinator_with(1).await;
        let mut runner = Client::join_as_player(&coordinator).await;
        let mut peer = Client::join_as_player(&coordinator).await;
        runner.drain();
        peer.drain();

        let exit = exit_text(0, Slot::Gold);
        coordinator.handle_text(&mut runner.session, &exit).await.unwrap();

        // The peer sees the vacancy but not the exit update itself
        let frames = peer.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "roster");
        assert!(frames[0]["roster"]["gold"].is_null());

        let identity = runner.identities().remove(0);
        assert_eq!(identity["maze_id"], 1);
        assert_eq!(identity["slot"], "gold");
        assert_eq!(
            runner.session.state(),
            SessionState::Assigned { maze_id: 1, slot: Slot::Gold }
        );

        // A late report from the old maze changes nothing
        coordinator.handle_text(&mut runner.session, &exit).await.unwrap();
        assert!(runner.raw().is_empty());
        assert!(peer.raw().is_empty());

        let stats = coordinator.stats().await;
        assert_eq!(stats.instances, 2);
        assert_eq!(stats.players, 2);
    }

    #[tokio::test]
    async fn test_position_short_of_exit_stays_in_maze() {
        let (coordinator, _path, _dir) = coordinator_with(1).await;
        let mut player = Client::join_as_player(&coordinator).await;
        player.drain();

        let text = update_text(0, Slot::Gold, 28.4999999, -30.0);
        coordinator.handle_text(&mut player.session, &text).await.unwrap();
        assert_eq!(
            player.session.state(),
            SessionState::Assigned { maze_id: 0, slot: Slot::Gold }
        );
        assert!(player.raw().is_empty());

        let text = update_text(0, Slot::Gold, 1.123456789012, -30.0);
        coordinator.handle_text(&mut player.session, &text).await.unwrap();

        let hub = coordinator.hub.lock().await;
        let gold = hub.registry.instance(0).unwrap().player(Slot::Gold).unwrap();
        assert_eq!(gold.position.x, 1.123456789012);
        assert_eq!(hub.registry.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_never_share_a_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mazes.json");
        let generator = FixedGenerator::default();
        let calls = Arc::clone(&generator.calls);
        let coordinator = Arc::new(Coordinator::open(&path, Box::new(generator)).await);

        let joins: Vec<_> = (0..13)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move {
                    let mut client = Client::connect(&coordinator).await;
                    coordinator
                        .join(&mut client.session, Role::Player, None)
                        .await
                        .unwrap();
                    client
                })
            })
            .collect();

        let mut seats = HashSet::new();
        let mut clients = Vec::new();
        for join in joins {
            let client = join.await.unwrap();
            let SessionState::Assigned { maze_id, slot } = client.session.state() else {
                panic!("{} was not seated", client.session.id());
            };
            assert!(seats.insert((maze_id, slot)), "maze {} slot {} handed out twice", maze_id, slot);
            clients.push(client);
        }
        assert_eq!(seats.len(), 13);

        let occupancy: Vec<usize> = coordinator.mazes().await.iter().map(|m| m.players).collect();
        assert_eq!(occupancy, vec![6, 6, 1]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        coordinator.shutdown().await;
        assert_eq!(record_store::load(&path).await.len(), 3);
    }

    #[tokio::test]
    async fn test_exit_does_not_backfill_earlier_mazes() {
        let (coordinator, _path, _dir) = coordinator_with(3).await;
        // Fill maze 0 and put one player in maze 1
        let mut players = Vec::new();
        for _ in 0..7 {
            players.push(Client::join_as_player(&coordinator).await);
        }
        let runner = players.last_mut().unwrap();
        assert_eq!(
            runner.session.state(),
            SessionState::Assigned { maze_id: 1, slot: Slot::Gold }
        );

        // Free a slot in maze 0; the runner must still move forward
        let leaver = players.remove(0);
        coordinator.disconnect(leaver.session).await;

        let runner = players.last_mut().unwrap();
        runner.drain();
        coordinator
            .handle_text(&mut runner.session, &exit_text(1, Slot::Gold))
            .await
            .unwrap();
        assert_eq!(
            runner.session.state(),
            SessionState::Assigned { maze_id: 2, slot: Slot::Gold }
        );
        assert_eq!(coordinator.stats().await.instances, 3);
    }

    #[tokio::test]
    async fn test_disconnect_frees_slot() {
        let (coordinator, _path, _dir) = coordinator_with(1).await;
        let leaver = Client::join_as_player(&coordinator).await;
        let mut stayer = Client::join_as_player(&coordinator).await;
        stayer.drain();

        coordinator.disconnect(leaver.session).await;
        let frames = stayer.drain();
        assert_eq!(frames.len(), 1);
        assert!(frames[0]["roster"]["gold"].is_null());
        assert_eq!(frames[0]["roster"]["green"]["slot"], "green");

        // The freed slot is handed out again
        let mut next = Client::join_as_player(&coordinator).await;
        assert_eq!(next.identities().remove(0)["slot"], "gold");
        assert_eq!(coordinator.stats().await.connections, 2);
    }

    #[tokio::test]
    async fn test_observer_watches_without_a_slot() {
        let (coordinator, _path, _dir) = coordinator_with(2).await;
        let mut player = Client::join_as_player(&coordinator).await;
        player.drain();

        let mut observer = Client::connect(&coordinator).await;
        coordinator
            .handle_text(&mut observer.session, r#"{"type":"join","role":"observer","maze_id":9}"#)
            .await
            .unwrap();
        let frames = observer.drain();
        assert_eq!(frames[0], serde_json::json!({"type": "instance_count", "count": 2}));
        // Clamped to the last maze
        assert_eq!(frames[1]["type"], "viewing");
        assert_eq!(frames[1]["maze_id"], 1);
        assert_eq!(frames[2]["type"], "roster");

        coordinator
            .handle_text(&mut observer.session, r#"{"type":"view","maze_id":0}"#)
            .await
            .unwrap();
        let frames = observer.drain();
        assert_eq!(frames[0]["maze_id"], 0);
        assert_eq!(frames[1]["roster"]["gold"]["slot"], "gold");

        let text = update_text(0, Slot::Gold, 3.0, 3.0);
        coordinator.handle_text(&mut player.session, &text).await.unwrap();
        assert_eq!(observer.raw(), vec![text]);
        assert_eq!(coordinator.stats().await.players, 1);
    }

    #[tokio::test]
    async fn test_generator_failure_leaves_session_unassigned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mazes.json");
        let coordinator = Coordinator::open(&path, Box::new(FailingGenerator)).await;

        let mut client = Client::connect(&coordinator).await;
        let err = coordinator
            .join(&mut client.session, Role::Player, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::Generator(_)));
        assert_eq!(client.session.state(), SessionState::Connecting);
        assert!(client.raw().is_empty());

        coordinator.shutdown().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_malformed_and_repeated_frames_are_ignored() {
        let (coordinator, _path, _dir) = coordinator_with(1).await;
        let mut client = Client::join_as_player(&coordinator).await;
        client.drain();

        coordinator.handle_text(&mut client.session, "{oops").await.unwrap();
        coordinator
            .handle_text(&mut client.session, r#"{"type":"join","role":"player"}"#)
            .await
            .unwrap();
        coordinator
            .handle_text(&mut client.session, r#"{"type":"view","maze_id":0}"#)
            .await
            .unwrap();

        assert!(client.raw().is_empty());
        assert_eq!(coordinator.stats().await.players, 1);
    }

    #[tokio::test]
    async fn test_listing_and_roster_lookup() {
        let (coordinator, _path, _dir) = coordinator_with(2).await;
        let _a = Client::join_as_player(&coordinator).await;
        let _b = Client::join_as_player(&coordinator).await;

        let mazes = coordinator.mazes().await;
        assert_eq!(
            mazes,
            vec![
                MazeSummary { maze_id: 0, maze: "maze_0.glb".into(), players: 2 },
                MazeSummary { maze_id: 1, maze: "maze_1.glb".into(), players: 0 },
            ]
        );

        let roster = coordinator.roster(0).await.unwrap();
        assert_eq!(roster.get(Slot::Green).unwrap().slot, Slot::Green);
        assert!(roster.get(Slot::Pink).is_none());
        assert!(matches!(
            coordinator.roster(5).await,
            Err(CoordinatorError::UnknownMaze { maze_id: 5 })
        ));
    }

    #[tokio::test]
    async fn test_shutdown_closes_outboxes() {
        let (coordinator, _path, _dir) = coordinator_with(1).await;
        let mut client = Client::join_as_player(&coordinator).await;
        client.drain();

        coordinator.shutdown().await;
        assert_eq!(client.rx.recv().await, None);
    }
}
