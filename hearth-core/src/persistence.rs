//! SQLite memory store for NPC conversations and witnessed events.
//!
//! Every line an NPC should remember about a player is appended as one row:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS memories (
//!     id         INTEGER PRIMARY KEY AUTOINCREMENT,
//!     player     TEXT NOT NULL,
//!     npc        TEXT NOT NULL,
//!     memory     TEXT NOT NULL,
//!     created_at TEXT NOT NULL
//! );
//! ```
//!
//! Rows are never updated. Reads come back in insertion order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, info, warn};

use crate::config::PersistenceConfig;
use crate::error::Result;
use crate::events::MemorySink;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS memories (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        player     TEXT NOT NULL,
        npc        TEXT NOT NULL,
        memory     TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_memories_pair ON memories (npc, player, id);";

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Handle to an open SQLite database of NPC memories.
///
/// # Usage
///
/// ```no_run
/// # use hearth_core::persistence::MemoryStore;
/// # use hearth_core::config::PersistenceConfig;
/// let store = MemoryStore::open("npc_memory.db", &PersistenceConfig::default())?;
/// store.save("Carlos", "Player", "Player: Hello!")?;
/// let recent = store.load_recent("Carlos", "Player", 10)?;
/// # Ok::<(), hearth_core::HearthError>(())
/// ```
pub struct MemoryStore {
    conn: Connection,
    db_path: PathBuf,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Open (or create) an SQLite database at `path`.
    ///
    /// The schema is created if it does not exist. WAL mode is enabled when
    /// `config.wal_mode` is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HearthError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersistenceConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        info!(
            path = %db_path.display(),
            wal = config.wal_mode,
            "memory store opened"
        );

        Ok(Self { conn, db_path })
    }

    /// Open the database named by `config.database_path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HearthError::Database`] on SQLite failures.
    pub fn from_config(config: &PersistenceConfig) -> Result<Self> {
        Self::open(&config.database_path, config)
    }

    /// Open an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`crate::HearthError::Database`] on SQLite failures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            db_path: PathBuf::from(":memory:"),
        })
    }

    /// Wrap the store for sharing between the event sink and conversations.
    #[must_use]
    pub fn into_shared(self) -> SharedMemoryStore {
        Arc::new(Mutex::new(self))
    }

    // ------------------------------------------------------------------
    // Reads and writes
    // ------------------------------------------------------------------

    /// Append one memory line for the (`npc`, `player`) pair.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HearthError::Database`] on SQLite failures.
    pub fn save(&self, npc: &str, player: &str, memory: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO memories (player, npc, memory, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![player, npc, memory, now],
        )?;
        debug!(npc, player, bytes = memory.len(), "memory saved");
        Ok(())
    }

    /// Every memory for the pair, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HearthError::Database`] on SQLite failures.
    pub fn load(&self, npc: &str, player: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT memory FROM memories WHERE npc = ?1 AND player = ?2 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![npc, player], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<String>, _>>()?)
    }

    /// The last `limit` memories for the pair, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HearthError::Database`] on SQLite failures.
    pub fn load_recent(&self, npc: &str, player: &str, limit: usize) -> Result<Vec<String>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare_cached(
            "SELECT memory FROM (
                 SELECT id, memory FROM memories
                 WHERE npc = ?1 AND player = ?2
                 ORDER BY id DESC LIMIT ?3
             ) ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![npc, player, limit], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<String>, _>>()?)
    }

    /// Number of memories stored for the pair.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HearthError::Database`] on SQLite failures.
    pub fn count(&self, npc: &str, player: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM memories WHERE npc = ?1 AND player = ?2",
            params![npc, player],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Delete every memory for the pair. Returns how many rows went.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HearthError::Database`] on SQLite failures.
    pub fn forget(&self, npc: &str, player: &str) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM memories WHERE npc = ?1 AND player = ?2",
            params![npc, player],
        )?;
        info!(npc, player, deleted, "memories forgotten");
        Ok(deleted)
    }

    // ------------------------------------------------------------------
    // Utility
    // ------------------------------------------------------------------

    /// Path to the database file (or `:memory:`).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run SQLite's integrity check. `Ok(true)` when healthy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HearthError::Database`] if the check itself fails.
    pub fn integrity_check(&self) -> Result<bool> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        Ok(result == "ok")
    }
}

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

/// A store shared between the event sink and the conversation manager.
pub type SharedMemoryStore = Arc<Mutex<MemoryStore>>;

/// [`MemorySink`] that writes event lines to a shared store for one player.
///
/// Store failures are logged and dropped; the simulation never stalls on I/O.
#[derive(Debug, Clone)]
pub struct StoreSink {
    store: SharedMemoryStore,
    player: String,
}

impl StoreSink {
    /// Bind `store` to the player whose memories are being recorded.
    #[must_use]
    pub fn new(store: SharedMemoryStore, player: impl Into<String>) -> Self {
        Self {
            store,
            player: player.into(),
        }
    }

    /// The bound player name.
    #[must_use]
    pub fn player(&self) -> &str {
        &self.player
    }
}

impl MemorySink for StoreSink {
    fn save(&mut self, actor: &str, text: &str) {
        if let Err(e) = self.store.lock().save(actor, &self.player, text) {
            warn!(actor, player = %self.player, error = %e, "failed to persist memory");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::open_in_memory().expect("open")
    }

    #[test]
    fn save_then_load_in_order() {
        let store = store();
        store.save("Carlos", "Player", "Player: hi").expect("save");
        store.save("Carlos", "Player", "Carlos: hello").expect("save");
        let all = store.load("Carlos", "Player").expect("load");
        assert_eq!(all, ["Player: hi", "Carlos: hello"]);
    }

    #[test]
    fn pairs_are_isolated() {
        let store = store();
        store.save("Carlos", "Player", "a").expect("save");
        store.save("Lina", "Player", "b").expect("save");
        store.save("Carlos", "Ayla", "c").expect("save");
        assert_eq!(store.load("Carlos", "Player").expect("load"), ["a"]);
        assert_eq!(store.count("Lina", "Player").expect("count"), 1);
        assert_eq!(store.count("Lina", "Ayla").expect("count"), 0);
    }

    #[test]
    fn load_recent_keeps_latest_chronologically() {
        let store = store();
        for i in 0..5 {
            store.save("Eldar", "Player", &format!("m{i}")).expect("save");
        }
        let recent = store.load_recent("Eldar", "Player", 3).expect("load");
        assert_eq!(recent, ["m2", "m3", "m4"]);
        let all = store.load_recent("Eldar", "Player", 100).expect("load");
        assert_eq!(all.len(), 5);
        assert!(store.load_recent("Eldar", "Player", 0).expect("load").is_empty());
    }

    #[test]
    fn forget_removes_pair() {
        let store = store();
        store.save("Carlos", "Player", "a").expect("save");
        store.save("Carlos", "Player", "b").expect("save");
        assert_eq!(store.forget("Carlos", "Player").expect("forget"), 2);
        assert_eq!(store.count("Carlos", "Player").expect("count"), 0);
    }

    #[test]
    fn store_sink_binds_player() {
        let shared = store().into_shared();
        let mut sink = StoreSink::new(Arc::clone(&shared), "Ayla");
        sink.save("Lina", "[EVENT] fog -> grey morning");
        let rows = shared.lock().load("Lina", "Ayla").expect("load");
        assert_eq!(rows, ["[EVENT] fog -> grey morning"]);
    }

    #[test]
    fn file_backed_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("npc_memory.db");
        let config = PersistenceConfig::default();
        {
            let store = MemoryStore::open(&path, &config).expect("open");
            store.save("Carlos", "Player", "remember me").expect("save");
            assert!(store.integrity_check().expect("check"));
        }
        let reopened = MemoryStore::open(&path, &config).expect("reopen");
        assert_eq!(reopened.load("Carlos", "Player").expect("load"), ["remember me"]);
        assert_eq!(reopened.db_path(), path.as_path());
    }
}
