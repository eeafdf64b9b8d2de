//! Player directory - Known and connected players

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::application::errors::StorageError;
use crate::application::services::PlayerStore;
use crate::domain::entities::{LivePlayer, Player, Session, SessionId};

/// Lookup over every known player plus the ones connected right now.
///
/// Every connected player also has an entry in the known set.
pub struct PlayerDirectory {
    store: PlayerStore,
    all: BTreeMap<String, Arc<Player>>,
    connected: BTreeMap<String, LivePlayer>,
}

impl PlayerDirectory {
    pub fn new(store: PlayerStore) -> Self {
        let all = store
            .records()
            .values()
            .map(|record| (record.id.clone(), Arc::new(Player::from(record))))
            .collect();

        Self {
            store,
            all,
            connected: BTreeMap::new(),
        }
    }

    /// Every known player, connected or not
    pub fn all(&self) -> impl Iterator<Item = &Arc<Player>> {
        self.all.values()
    }

    /// Only players with a live session
    pub fn connected(&self) -> impl Iterator<Item = &Arc<Player>> {
        self.connected.values().map(LivePlayer::player)
    }

    pub fn live_players(&self) -> impl Iterator<Item = &LivePlayer> {
        self.connected.values()
    }

    /// A player identified themselves; remember their current name
    pub fn on_join(&mut self, id: &str, name: &str) -> Arc<Player> {
        let player = self.store.merge(id, name);
        self.all.insert(id.to_string(), player.clone());

        if let Some(live) = self.connected.remove(id) {
            self.connected
                .insert(id.to_string(), live.with_player(player.clone()));
        }
        player
    }

    /// Bind the session's player to the session
    pub fn on_connect(&mut self, session: &Session) -> &LivePlayer {
        let player = match self.all.get(&session.user_id) {
            Some(player) => player.clone(),
            None => self.on_join(&session.user_id, &session.name),
        };

        debug!("{} connected on session {}", player, session.id);
        let live = LivePlayer::new(player, session.id);
        self.connected
            .entry(session.user_id.clone())
            .and_modify(|existing| *existing = live.clone())
            .or_insert(live)
    }

    /// Drop the session's player from the connected set. The known entry
    /// stays. Ignored if the player has since reconnected on another session.
    pub fn on_disconnect(&mut self, session: &Session) -> Option<LivePlayer> {
        match self.connected.get(&session.user_id) {
            Some(live) if live.session() == session.id => self.connected.remove(&session.user_id),
            _ => None,
        }
    }

    /// Record a new display name seen for a known player
    pub fn rename(&mut self, id: &str, name: &str) -> Option<Arc<Player>> {
        if !self.all.contains_key(id) {
            return None;
        }
        Some(self.on_join(id, name))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Arc<Player>> {
        self.all.get(id)
    }

    pub fn find_connected(&self, id: &str) -> Option<&LivePlayer> {
        self.connected.get(id)
    }

    pub fn find_by_session(&self, session: SessionId) -> Option<&LivePlayer> {
        self.connected.values().find(|live| live.session() == session)
    }

    /// The single player whose name contains `partial` (case-insensitive) or
    /// whose id is exactly `partial`. `None` when zero or several match.
    pub fn find(&self, partial: &str) -> Option<&Arc<Player>> {
        let mut matches = self.find_all(partial);
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// Every player [`find`](Self::find) would consider
    pub fn find_all(&self, partial: &str) -> impl Iterator<Item = &Arc<Player>> + '_ {
        let id = partial.to_string();
        let needle = partial.to_lowercase();
        self.all
            .values()
            .filter(move |p| p.name().to_lowercase().contains(&needle) || p.id() == id)
    }

    pub fn save(&self) -> Result<(), StorageError> {
        self.store.save()
    }

    pub fn store(&self) -> &PlayerStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PlayerRecord;
    use crate::domain::traits::RecordStorage;
    use crate::infrastructure::storage::MemoryStorage;

    fn directory() -> PlayerDirectory {
        PlayerDirectory::new(PlayerStore::load(Box::new(MemoryStorage::new())))
    }

    #[test]
    fn test_loads_known_players() {
        let storage = MemoryStorage::new();
        let mut records = crate::domain::entities::PlayerRecords::new();
        records.insert(
            "7".to_string(),
            PlayerRecord {
                id: "7".to_string(),
                name: "Seven".to_string(),
            },
        );
        storage.save(&records).unwrap();

        let players = PlayerDirectory::new(PlayerStore::load(Box::new(storage)));
        assert_eq!(players.find_by_id("7").unwrap().name(), "Seven");
        assert_eq!(players.connected().count(), 0);
    }

    #[test]
    fn test_connect_and_disconnect() {
        let mut players = directory();
        let session = Session::new("1", "Alice");

        players.on_join("1", "Alice");
        players.on_connect(&session);
        assert_eq!(players.connected().count(), 1);
        assert_eq!(players.find_by_session(session.id).unwrap().name(), "Alice");

        assert!(players.on_disconnect(&session).is_some());
        assert_eq!(players.connected().count(), 0);
        assert!(players.find_by_session(session.id).is_none());
        assert!(players.find_by_id("1").is_some());
    }

    #[test]
    fn test_connect_without_join_keeps_subset() {
        let mut players = directory();
        let session = Session::new("9", "Nine");
        players.on_connect(&session);

        for player in players.connected() {
            assert!(players.find_by_id(player.id()).is_some());
        }
        assert_eq!(players.store().get("9").unwrap().name, "Nine");
    }

    #[test]
    fn test_stale_disconnect_is_ignored() {
        let mut players = directory();
        let old = Session::new("1", "Alice");
        let new = Session::new("1", "Alice");

        players.on_connect(&old);
        players.on_connect(&new);
        assert!(players.on_disconnect(&old).is_none());
        assert_eq!(players.find_connected("1").unwrap().session(), new.id);
    }

    #[test]
    fn test_join_replaces_identity() {
        let mut players = directory();
        let session = Session::new("1", "Alice");
        players.on_join("1", "Alice");
        let held = players.on_connect(&session).player().clone();

        players.rename("1", "Alicia").unwrap();
        assert_eq!(held.name(), "Alice");
        assert_eq!(players.find_by_id("1").unwrap().name(), "Alicia");
        assert_eq!(players.find_connected("1").unwrap().name(), "Alicia");
        assert!(players.rename("nobody", "x").is_none());
    }

    #[test]
    fn test_find_ambiguous() {
        let mut players = directory();
        players.on_join("1", "Al");
        players.on_join("2", "Alex");
        players.on_join("3", "Bob");

        assert!(players.find("Al").is_none());
        let all: Vec<&str> = players.find_all("al").map(|p| p.name()).collect();
        assert_eq!(all, vec!["Al", "Alex"]);

        assert_eq!(players.find("ALE").unwrap().id(), "2");
        assert_eq!(players.find("3").unwrap().name(), "Bob");
        assert!(players.find("zed").is_none());
    }

    #[test]
    fn test_lookup_outlives_query_string() {
        let mut players = directory();
        players.on_join("42", "Zed");

        let found = {
            let query = String::from("ze");
            players.find(&query)
        };
        assert_eq!(found.unwrap().id(), "42");

        let by_id = {
            let query = "42".to_string();
            players.find_all(&query)
        };
        assert_eq!(by_id.count(), 1);
    }
}
