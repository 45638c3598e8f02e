// transport.rs - Per-connection outboxes and per-maze multicast groups

use crate::types::MazeId;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tokio::sync::mpsc;

/// Text frames queued for one client. The WebSocket writer task drains it.
pub type Outbox = mpsc::UnboundedSender<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Who is connected and which maze groups they listen to.
#[derive(Default)]
pub struct Transport {
    outboxes: HashMap<ConnectionId, Outbox>,
    groups: HashMap<MazeId, BTreeSet<ConnectionId>>,
    next_id: u64,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, outbox: Outbox) -> ConnectionId {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.outboxes.insert(id, outbox);
        id
    }

    /// Forget a connection and drop its outbox, which ends its writer task.
    pub fn unregister(&mut self, id: ConnectionId) {
        self.outboxes.remove(&id);
        for members in self.groups.values_mut() {
            members.remove(&id);
        }
    }

    pub fn join(&mut self, id: ConnectionId, group: MazeId) {
        self.groups.entry(group).or_default().insert(id);
    }

    pub fn leave(&mut self, id: ConnectionId, group: MazeId) {
        if let Some(members) = self.groups.get_mut(&group) {
            members.remove(&id);
        }
    }

    pub fn is_member(&self, id: ConnectionId, group: MazeId) -> bool {
        self.groups.get(&group).is_some_and(|m| m.contains(&id))
    }

    pub fn members(&self, group: MazeId) -> impl Iterator<Item = ConnectionId> + '_ {
        self.groups.get(&group).into_iter().flatten().copied()
    }

    pub fn connection_count(&self) -> usize {
        self.outboxes.len()
    }

    /// Queue a frame for one connection. Returns false if it is gone.
    pub fn send_to(&self, id: ConnectionId, text: &str) -> bool {
        match self.outboxes.get(&id) {
            Some(outbox) => {
                if outbox.send(text.to_owned()).is_err() {
                    log::debug!("Outbox of {} is closed", id);
                    return false;
                }
                true
            }
            None => false,
        }
    }

    /// Queue a frame for every member of `group` except `except`.
    /// Returns how many connections it was queued for.
    pub fn send_to_group(&self, group: MazeId, text: &str, except: Option<ConnectionId>) -> usize {
        self.members(group)
            .filter(|id| Some(*id) != except)
            .filter(|id| self.send_to(*id, text))
            .count()
    }

    /// Drop every outbox and group.
    pub fn close_all(&mut self) {
        self.outboxes.clear();
        self.groups.clear();
    }
}
