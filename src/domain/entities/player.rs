use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle of a live network session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A connection as reported by the host
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: String,
    pub name: String,
    /// The host's own player on a listen server
    pub is_local: bool,
}

impl Session {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            user_id: user_id.into(),
            name: name.into(),
            is_local: false,
        }
    }

    pub fn with_local(mut self, is_local: bool) -> Self {
        self.is_local = is_local;
        self
    }
}

/// Durable form of a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
}

/// Everything the store persists, keyed by player id
pub type PlayerRecords = BTreeMap<String, PlayerRecord>;

/// A player's identity, connected or not.
///
/// Never mutated: a rename produces a new `Player`, so a held `Arc<Player>`
/// may be stale and should be re-resolved by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: String,
    name: String,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

impl From<&PlayerRecord> for Player {
    fn from(record: &PlayerRecord) -> Self {
        Self::new(record.id.clone(), record.name.clone())
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player[{}, {}]", self.id, self.name)
    }
}

/// A player bound to the session it is currently connected through
#[derive(Debug, Clone)]
pub struct LivePlayer {
    player: Arc<Player>,
    session: SessionId,
    connected_at: DateTime<Utc>,
}

impl LivePlayer {
    pub fn new(player: Arc<Player>, session: SessionId) -> Self {
        Self {
            player,
            session,
            connected_at: Utc::now(),
        }
    }

    /// Same connection, new identity object
    pub fn with_player(mut self, player: Arc<Player>) -> Self {
        self.player = player;
        self
    }

    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }

    pub fn id(&self) -> &str {
        self.player.id()
    }

    pub fn name(&self) -> &str {
        self.player.name()
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }
}
